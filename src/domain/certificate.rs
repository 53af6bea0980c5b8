//! Decoded certificate and key views.
//!
//! These are plain data projections of what the container held; the checks
//! read them without touching OpenSSL. Extension payloads are kept as raw DER
//! and decoded by the check that needs them, so a malformed extension only
//! fails that one check.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A subject attribute as `(dotted OID, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttribute {
    pub oid: String,
    pub value: String,
}

impl SubjectAttribute {
    #[must_use]
    pub fn new(oid: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            value: value.into(),
        }
    }
}

/// Raw X.509 extension: identifier plus the DER inside `extnValue`.
#[derive(Clone, PartialEq, Eq)]
pub struct RawExtension {
    pub oid: String,
    pub critical: bool,
    der: Box<[u8]>,
}

impl RawExtension {
    #[must_use]
    pub fn new(oid: impl Into<String>, critical: bool, der: Vec<u8>) -> Self {
        Self {
            oid: oid.into(),
            critical,
            der: der.into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for RawExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawExtension(oid={}, critical={}, len={})",
            self.oid,
            self.critical,
            self.der.len()
        )
    }
}

/// The leaf certificate fields the compliance checks evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateProfile {
    /// Subject DN as an RFC 4514 string
    pub subject: String,
    /// Issuer DN as an RFC 4514 string
    pub issuer: String,
    pub serial_number: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Signature algorithm name (e.g. `sha256WithRSAEncryption`), or its dotted OID
    pub signature_algorithm: String,
    /// Subject attributes in encounter order
    pub subject_attributes: Vec<SubjectAttribute>,
    pub extensions: Vec<RawExtension>,
}

impl CertificateProfile {
    /// Find an extension by dotted OID.
    #[must_use]
    pub fn extension(&self, oid: &str) -> Option<&RawExtension> {
        self.extensions.iter().find(|ext| ext.oid == oid)
    }

    /// Value of the last subject attribute with this OID.
    #[must_use]
    pub fn subject_attribute(&self, oid: &str) -> Option<&str> {
        self.subject_attributes
            .iter()
            .rev()
            .find(|attr| attr.oid == oid)
            .map(|attr| attr.value.as_str())
    }

    /// Extract the CNPJ/CPF metadata under the given attribute OIDs.
    #[must_use]
    pub fn tax_identifiers(&self, cnpj_oid: &str, cpf_oid: &str) -> TaxIdentifiers {
        TaxIdentifiers {
            cnpj: self.subject_attribute(cnpj_oid).map(str::to_string),
            cpf: self.subject_attribute(cpf_oid).map(str::to_string),
        }
    }
}

/// Opaque private key view: only the algorithm label and size are exposed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKeyHandle {
    algorithm: String,
    bits: Option<u32>,
}

impl PrivateKeyHandle {
    #[must_use]
    pub fn new(algorithm: impl Into<String>, bits: Option<u32>) -> Self {
        Self {
            algorithm: algorithm.into(),
            bits,
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Key size in bits, when the key type defines one.
    #[must_use]
    pub fn bits(&self) -> Option<u32> {
        self.bits
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PrivateKeyHandle(algorithm={}, bits={:?})",
            self.algorithm, self.bits
        )
    }
}

/// National tax identifiers found in the certificate subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxIdentifiers {
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
}

/// Keep only ASCII digits, so formatted and bare identifiers compare equal.
#[must_use]
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
