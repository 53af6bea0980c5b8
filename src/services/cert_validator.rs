//! Certificate compliance checks.
//!
//! Every check is a pure function of a [`CheckContext`]. A check returns
//! `Ok(None)` when it does not apply to this certificate (it then leaves no
//! trace in the report) and `Err` only when it could not evaluate at all.

use crate::domain::certificate::{digits_only, CertificateProfile, PrivateKeyHandle};
use crate::domain::check::{CheckDetails, CheckId, CheckResult};
use crate::domain::constants::{MSG_KEY_USAGE_MISSING, MSG_POLICIES_MISSING};
use crate::infra::config::ValidationPolicy;
use crate::infra::error::ValidationResult;
use chrono::{DateTime, Utc};
use der::oid::AssociatedOid;
use der::Decode;
use x509_cert::ext::pkix::{CertificatePolicies, KeyUsage, KeyUsages};

/// Everything a check may look at.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub certificate: &'a CertificateProfile,
    pub key: &'a PrivateKeyHandle,
    pub policy: &'a ValidationPolicy,
    /// Tax id the certificate is expected to belong to, as typed by the caller
    pub expected_tax_id: Option<&'a str>,
    /// Evaluation instant, read once per run
    pub now: DateTime<Utc>,
}

/// Signature shared by every compliance check.
pub type CheckFn = fn(&CheckContext<'_>) -> ValidationResult<Option<CheckResult>>;

pub struct CertificateValidator;

impl CertificateValidator {
    /// not_before <= now <= not_after
    pub fn check_validity_period(ctx: &CheckContext<'_>) -> ValidationResult<Option<CheckResult>> {
        let cert = ctx.certificate;
        let ok = cert.not_before <= ctx.now && ctx.now <= cert.not_after;
        log::debug!(
            "Validity window {} .. {} (now {})",
            cert.not_before,
            cert.not_after,
            ctx.now
        );

        Ok(Some(
            CheckResult::new(
                CheckId::ValidityPeriod,
                ok,
                format!(
                    "Válido de {} até {}",
                    cert.not_before.format("%d/%m/%Y"),
                    cert.not_after.format("%d/%m/%Y")
                ),
            )
            .with_details(CheckDetails::Validity {
                not_before: cert.not_before.to_rfc3339(),
                not_after: cert.not_after.to_rfc3339(),
            }),
        ))
    }

    /// Present only while the certificate is inside the warning window.
    pub fn check_expiration_warning(
        ctx: &CheckContext<'_>,
    ) -> ValidationResult<Option<CheckResult>> {
        let days_remaining = (ctx.certificate.not_after - ctx.now).num_days();
        if days_remaining <= 0 || days_remaining > ctx.policy.expiry_warning_days {
            return Ok(None);
        }

        log::warn!("Certificate expires soon: {days_remaining} days");
        Ok(Some(
            CheckResult::fail(
                CheckId::ExpirationWarning,
                format!("Certificado expira em {days_remaining} dia(s)"),
            )
            .with_details(CheckDetails::Expiration { days_remaining }),
        ))
    }

    pub fn check_key_strength(ctx: &CheckContext<'_>) -> ValidationResult<Option<CheckResult>> {
        let key_size = ctx.key.bits().unwrap_or(0);
        let min = ctx.policy.min_key_bits;
        let ok = key_size >= min;
        let verdict = if ok {
            "adequada".to_string()
        } else {
            format!("fraca - mínimo {min} bits")
        };

        Ok(Some(
            CheckResult::new(
                CheckId::KeyStrength,
                ok,
                format!("Chave {key_size} bits ({verdict})"),
            )
            .with_details(CheckDetails::KeyStrength { key_size }),
        ))
    }

    pub fn check_signature_algorithm(
        ctx: &CheckContext<'_>,
    ) -> ValidationResult<Option<CheckResult>> {
        let algorithm = &ctx.certificate.signature_algorithm;
        let lowered = algorithm.to_lowercase();
        let ok = ctx
            .policy
            .accepted_digests
            .iter()
            .any(|digest| lowered.contains(&digest.to_lowercase()));
        let verdict = if ok {
            "seguro"
        } else {
            "inseguro - use SHA-256 ou superior"
        };

        Ok(Some(
            CheckResult::new(
                CheckId::SignatureAlgorithm,
                ok,
                format!("Algoritmo: {algorithm} ({verdict})"),
            )
            .with_details(CheckDetails::Algorithm {
                algorithm: algorithm.clone(),
            }),
        ))
    }

    /// digitalSignature or contentCommitment (non-repudiation) must be set.
    pub fn check_key_usage(ctx: &CheckContext<'_>) -> ValidationResult<Option<CheckResult>> {
        let Some(ext) = ctx.certificate.extension(&KeyUsage::OID.to_string()) else {
            return Ok(Some(CheckResult::fail(
                CheckId::KeyUsage,
                MSG_KEY_USAGE_MISSING,
            )));
        };

        let usage = KeyUsage::from_der(ext.as_der())?;
        let digital_signature = usage.0.contains(KeyUsages::DigitalSignature);
        let non_repudiation = usage.0.contains(KeyUsages::NonRepudiation);
        let ok = digital_signature || non_repudiation;

        Ok(Some(
            CheckResult::new(
                CheckId::KeyUsage,
                ok,
                format!(
                    "Uso da chave: {} (Digital Signature: {digital_signature}, Non-Repudiation: {non_repudiation})",
                    if ok { "adequado" } else { "inadequado" }
                ),
            )
            .with_details(CheckDetails::KeyUsage {
                digital_signature,
                non_repudiation,
            }),
        ))
    }

    /// Compares digit-only forms of the expected and embedded CNPJ.
    pub fn check_ownership(ctx: &CheckContext<'_>) -> ValidationResult<Option<CheckResult>> {
        let Some(expected) = ctx.expected_tax_id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let Some(embedded) = ctx
            .certificate
            .subject_attribute(&ctx.policy.cnpj_oid)
            .filter(|id| !id.is_empty())
        else {
            return Ok(None);
        };

        let ok = digits_only(expected) == digits_only(embedded);
        Ok(Some(
            CheckResult::new(
                CheckId::Ownership,
                ok,
                format!(
                    "CNPJ do certificado {} com a empresa",
                    if ok { "confere" } else { "não confere" }
                ),
            )
            .with_details(CheckDetails::Ownership {
                cnpj_certificado: embedded.to_string(),
                cnpj_empresa: expected.to_string(),
            }),
        ))
    }

    /// Some policy OID must fall under the national PKI arc.
    pub fn check_national_policy(
        ctx: &CheckContext<'_>,
    ) -> ValidationResult<Option<CheckResult>> {
        let Some(ext) = ctx
            .certificate
            .extension(&CertificatePolicies::OID.to_string())
        else {
            return Ok(Some(CheckResult::fail(
                CheckId::IcpBrasilPolicy,
                MSG_POLICIES_MISSING,
            )));
        };

        let policies = CertificatePolicies::from_der(ext.as_der())?;
        let arc = &ctx.policy.national_policy_arc;
        let ok = policies
            .0
            .iter()
            .any(|info| info.policy_identifier.to_string().contains(arc.as_str()));

        Ok(Some(CheckResult::new(
            CheckId::IcpBrasilPolicy,
            ok,
            format!(
                "Política ICP-Brasil: {}",
                if ok { "presente" } else { "ausente" }
            ),
        )))
    }

    /// Self-issued heuristic only; no signature or revocation checking.
    pub fn check_certification_chain(
        ctx: &CheckContext<'_>,
    ) -> ValidationResult<Option<CheckResult>> {
        let cert = ctx.certificate;
        let self_issued = cert.issuer == cert.subject;
        let message = if self_issued {
            "Certificado auto-assinado (inválido)"
        } else {
            "Certificado emitido por AC"
        };

        Ok(Some(
            CheckResult::new(CheckId::CertificationChain, !self_issued, message).with_details(
                CheckDetails::Chain {
                    issuer: cert.issuer.clone(),
                    subject: cert.subject.clone(),
                },
            ),
        ))
    }
}
