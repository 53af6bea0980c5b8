//! A1 Certificate Validator Library
//!
//! Validates ICP-Brasil A1 signing certificates shipped as PKCS#12 (`.pfx`)
//! containers against the eSocial compliance policy and produces a
//! machine-readable report.
//!
//! ## Architecture
//!
//! - **adapters**: OpenSSL container decoding and `x509-cert` field projection
//! - **domain**: pure report types, check identifiers and the status rule table
//! - **services**: the individual compliance checks and the runner
//! - **pipelines**: the `ValidationWorkflow` facade
//! - **infra**: error types and policy configuration

pub mod adapters;
pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

pub use infra::{config, error};

pub use adapters::pkcs12::{ContainerDecoder, DecodedBundle, OpenSslPkcs12Decoder};
pub use domain::certificate::{
    digits_only, CertificateProfile, PrivateKeyHandle, RawExtension, SubjectAttribute,
    TaxIdentifiers,
};
pub use domain::check::{CheckDetails, CheckId, CheckLog, CheckResult};
pub use domain::report::{ReportBuilder, ValidationReport};
pub use domain::status::{aggregate, ValidationStatus, Verdict};
pub use infra::config::{PolicyManager, ValidationPolicy};
pub use infra::error::{ValidationError, ValidationResult};
pub use pipelines::validate::ValidationWorkflow;

/// Validate a PKCS#12 container with the default compliance policy.
///
/// Never fails: decoding problems and unexpected errors are reported inside
/// the returned [`ValidationReport`].
#[must_use]
pub fn validate_container(
    container: &[u8],
    password: &str,
    expected_tax_id: Option<&str>,
) -> ValidationReport {
    ValidationWorkflow::new().run(container, password, expected_tax_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_container_is_invalid() {
        let report = validate_container(b"not a container", "senha", None);
        assert_eq!(report.status, ValidationStatus::Invalid);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(
            report.summary,
            "Não foi possível abrir o arquivo. Verifique a senha do .pfx."
        );
    }
}
