//! Check identifiers, results, and the ordered result log.

use crate::infra::error::{ValidationError, ValidationResult};
use serde::Serialize;
use std::fmt;

/// Identifier of every result a validation run can record.
///
/// The serialized names are part of the report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckId {
    #[serde(rename = "senha_pkcs12")]
    ContainerPassword,
    #[serde(rename = "par_chave_certificado")]
    KeyCertificatePair,
    #[serde(rename = "validade_temporal")]
    ValidityPeriod,
    #[serde(rename = "aviso_expiracao")]
    ExpirationWarning,
    #[serde(rename = "forca_chave")]
    KeyStrength,
    #[serde(rename = "algoritmo_assinatura")]
    SignatureAlgorithm,
    #[serde(rename = "key_usage")]
    KeyUsage,
    #[serde(rename = "titularidade")]
    Ownership,
    #[serde(rename = "politica_icp_brasil")]
    IcpBrasilPolicy,
    #[serde(rename = "cadeia_certificacao")]
    CertificationChain,
    #[serde(rename = "erro_geral")]
    GeneralError,
}

impl CheckId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CheckId::ContainerPassword => "senha_pkcs12",
            CheckId::KeyCertificatePair => "par_chave_certificado",
            CheckId::ValidityPeriod => "validade_temporal",
            CheckId::ExpirationWarning => "aviso_expiracao",
            CheckId::KeyStrength => "forca_chave",
            CheckId::SignatureAlgorithm => "algoritmo_assinatura",
            CheckId::KeyUsage => "key_usage",
            CheckId::Ownership => "titularidade",
            CheckId::IcpBrasilPolicy => "politica_icp_brasil",
            CheckId::CertificationChain => "cadeia_certificacao",
            CheckId::GeneralError => "erro_geral",
        }
    }

    /// Failures of warning-class checks downgrade the report to `warning`
    /// instead of `invalid`. Membership is by identifier only.
    #[must_use]
    pub const fn is_warning_class(self) -> bool {
        matches!(self, CheckId::ExpirationWarning)
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check-specific fields, flattened next to `name`/`ok`/`message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckDetails {
    Validity {
        not_before: String,
        not_after: String,
    },
    Expiration {
        days_remaining: i64,
    },
    KeyStrength {
        key_size: u32,
    },
    Algorithm {
        algorithm: String,
    },
    KeyUsage {
        digital_signature: bool,
        non_repudiation: bool,
    },
    Ownership {
        cnpj_certificado: String,
        cnpj_empresa: String,
    },
    Chain {
        issuer: String,
        subject: String,
    },
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: CheckId,
    pub ok: bool,
    pub message: String,
    #[serde(flatten)]
    pub details: Option<CheckDetails>,
}

impl CheckResult {
    #[must_use]
    pub fn new(name: CheckId, ok: bool, message: impl Into<String>) -> Self {
        Self {
            name,
            ok,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn pass(name: CheckId, message: impl Into<String>) -> Self {
        Self::new(name, true, message)
    }

    #[must_use]
    pub fn fail(name: CheckId, message: impl Into<String>) -> Self {
        Self::new(name, false, message)
    }

    #[must_use]
    pub fn with_details(mut self, details: CheckDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// Results in execution order. Each identifier may be recorded once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckLog {
    results: Vec<CheckResult>,
}

impl CheckLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log holding exactly one result.
    #[must_use]
    pub fn from_single(result: CheckResult) -> Self {
        Self {
            results: vec![result],
        }
    }

    /// Append a result; a second result for the same identifier is rejected.
    pub fn record(&mut self, result: CheckResult) -> ValidationResult<()> {
        if self.contains(result.name) {
            return Err(ValidationError::DuplicateCheck(result.name.as_str()));
        }
        if !result.ok {
            log::warn!("Check {} failed: {}", result.name, result.message);
        }
        self.results.push(result);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: CheckId) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: CheckId) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter()
    }

    /// Failed results, in execution order.
    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.ok)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
