//! Check runner: sequences the compliance checks over one certificate.
//!
//! Checks run in a fixed order and never short-circuit each other. A check
//! that cannot evaluate is recorded as a failure of that check alone; results
//! gathered before it are kept.

use crate::domain::check::{CheckId, CheckLog, CheckResult};
use crate::domain::constants::MSG_ERROR_PREFIX;
use crate::infra::error::ValidationResult;
use crate::services::cert_validator::{CertificateValidator, CheckContext, CheckFn};

/// Compliance checks in execution order.
pub static COMPLIANCE_CHECKS: [(CheckId, CheckFn); 8] = [
    (
        CheckId::ValidityPeriod,
        CertificateValidator::check_validity_period,
    ),
    (
        CheckId::ExpirationWarning,
        CertificateValidator::check_expiration_warning,
    ),
    (CheckId::KeyStrength, CertificateValidator::check_key_strength),
    (
        CheckId::SignatureAlgorithm,
        CertificateValidator::check_signature_algorithm,
    ),
    (CheckId::KeyUsage, CertificateValidator::check_key_usage),
    (CheckId::Ownership, CertificateValidator::check_ownership),
    (
        CheckId::IcpBrasilPolicy,
        CertificateValidator::check_national_policy,
    ),
    (
        CheckId::CertificationChain,
        CertificateValidator::check_certification_chain,
    ),
];

/// Runs a list of checks, isolating each one.
pub struct CheckRunner {
    checks: &'static [(CheckId, CheckFn)],
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            checks: &COMPLIANCE_CHECKS,
        }
    }

    #[must_use]
    pub fn with_checks(checks: &'static [(CheckId, CheckFn)]) -> Self {
        Self { checks }
    }

    /// Run every check, appending to `log`.
    ///
    /// Only bookkeeping errors (a check reporting under an identifier that is
    /// already in the log) are returned; check failures become results.
    pub fn run(&self, ctx: &CheckContext<'_>, log: &mut CheckLog) -> ValidationResult<()> {
        for (id, check) in self.checks {
            match check(ctx) {
                Ok(Some(result)) => log.record(result)?,
                Ok(None) => log::debug!("Check {id} not applicable"),
                Err(e) => {
                    log::warn!("Check {id} could not be evaluated: {e}");
                    log.record(CheckResult::fail(*id, format!("{MSG_ERROR_PREFIX}: {e}")))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::certificate::{CertificateProfile, PrivateKeyHandle};
    use crate::infra::config::ValidationPolicy;
    use crate::infra::error::ValidationError;
    use chrono::{Duration, TimeZone, Utc};

    fn profile() -> CertificateProfile {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        CertificateProfile {
            subject: "CN=Titular".to_string(),
            issuer: "CN=AC".to_string(),
            serial_number: "01".to_string(),
            not_before: now - Duration::days(10),
            not_after: now + Duration::days(10),
            signature_algorithm: "sha256WithRSAEncryption".to_string(),
            subject_attributes: Vec::new(),
            extensions: Vec::new(),
        }
    }

    fn exploding(_: &CheckContext<'_>) -> ValidationResult<Option<CheckResult>> {
        Err(ValidationError::Asn1Error("truncated extension".to_string()))
    }

    fn duplicate_strength(_: &CheckContext<'_>) -> ValidationResult<Option<CheckResult>> {
        Ok(Some(CheckResult::pass(CheckId::KeyStrength, "again")))
    }

    fn with_ctx<R>(f: impl FnOnce(&CheckContext<'_>) -> R) -> R {
        let cert = profile();
        let key = PrivateKeyHandle::new("RSA", Some(2048));
        let policy = ValidationPolicy::default();
        let ctx = CheckContext {
            certificate: &cert,
            key: &key,
            policy: &policy,
            expected_tax_id: None,
            now: Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap(),
        };
        f(&ctx)
    }

    #[test]
    fn default_order_with_warning_after_validity() {
        let log = with_ctx(|ctx| {
            let mut log = CheckLog::new();
            CheckRunner::new().run(ctx, &mut log).unwrap();
            log
        });
        let names: Vec<_> = log.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                CheckId::ValidityPeriod,
                CheckId::ExpirationWarning,
                CheckId::KeyStrength,
                CheckId::SignatureAlgorithm,
                CheckId::KeyUsage,
                CheckId::IcpBrasilPolicy,
                CheckId::CertificationChain,
            ]
        );
    }

    #[test]
    fn failing_check_is_isolated() {
        static CHECKS: [(CheckId, CheckFn); 3] = [
            (CheckId::KeyStrength, CertificateValidator::check_key_strength),
            (CheckId::KeyUsage, exploding),
            (
                CheckId::CertificationChain,
                CertificateValidator::check_certification_chain,
            ),
        ];
        let log = with_ctx(|ctx| {
            let mut log = CheckLog::new();
            CheckRunner::with_checks(&CHECKS).run(ctx, &mut log).unwrap();
            log
        });

        assert_eq!(log.len(), 3);
        assert!(log.get(CheckId::KeyStrength).unwrap().ok);
        let failed = log.get(CheckId::KeyUsage).unwrap();
        assert!(!failed.ok);
        assert_eq!(
            failed.message,
            "Erro durante validação: ASN.1 encoding/decoding error: truncated extension"
        );
        assert!(log.get(CheckId::CertificationChain).unwrap().ok);
    }

    #[test]
    fn duplicate_identifier_is_reported() {
        static CHECKS: [(CheckId, CheckFn); 2] = [
            (CheckId::KeyStrength, CertificateValidator::check_key_strength),
            (CheckId::SignatureAlgorithm, duplicate_strength),
        ];
        let result = with_ctx(|ctx| {
            let mut log = CheckLog::new();
            CheckRunner::with_checks(&CHECKS).run(ctx, &mut log)
        });
        assert!(matches!(
            result,
            Err(ValidationError::DuplicateCheck("forca_chave"))
        ));
    }
}
