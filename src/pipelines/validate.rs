//! `ValidationWorkflow`: high-level facade for validating a certificate container.
//!
//! Sequences container decoding, the compliance checks and status
//! aggregation. Never returns an error: every failure ends up inside the
//! returned [`ValidationReport`].

use crate::adapters::pkcs12::{ContainerDecoder, DecodedBundle, OpenSslPkcs12Decoder};
use crate::domain::check::{CheckId, CheckLog, CheckResult};
use crate::domain::constants::{
    MSG_CONTAINER_OPENED, MSG_CONTAINER_UNREADABLE, MSG_PAIR_MISSING, MSG_PAIR_PRESENT,
    SUMMARY_CONTAINER_UNREADABLE,
};
use crate::domain::report::{ReportBuilder, ValidationReport};
use crate::domain::status::ValidationStatus;
use crate::infra::config::ValidationPolicy;
use crate::infra::error::{ValidationError, ValidationResult};
use crate::services::cert_validator::CheckContext;
use crate::services::check_runner::CheckRunner;
use chrono::{DateTime, Utc};

/// Orchestrates one validation per call; holds no per-call state.
pub struct ValidationWorkflow<D = OpenSslPkcs12Decoder> {
    decoder: D,
    policy: ValidationPolicy,
    runner: CheckRunner,
}

impl Default for ValidationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationWorkflow {
    /// Workflow with the OpenSSL decoder and the default compliance policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_decoder(OpenSslPkcs12Decoder::new(), ValidationPolicy::default())
    }

    #[must_use]
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self::with_decoder(OpenSslPkcs12Decoder::new(), policy)
    }
}

impl<D: ContainerDecoder> ValidationWorkflow<D> {
    #[must_use]
    pub fn with_decoder(decoder: D, policy: ValidationPolicy) -> Self {
        Self {
            decoder,
            policy,
            runner: CheckRunner::new(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate a container against the current time.
    pub fn run(
        &self,
        container: &[u8],
        password: &str,
        expected_tax_id: Option<&str>,
    ) -> ValidationReport {
        self.run_at(container, password, expected_tax_id, Utc::now())
    }

    /// Validate a container as of `now`.
    pub fn run_at(
        &self,
        container: &[u8],
        password: &str,
        expected_tax_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> ValidationReport {
        log::info!("Starting certificate validation");
        match self.try_run(container, password, expected_tax_id, now) {
            Ok(report) => {
                log::info!("Validation finished with status '{}'", report.status);
                report
            }
            Err(e) => ValidationReport::from_failure(&e),
        }
    }

    fn try_run(
        &self,
        container: &[u8],
        password: &str,
        expected_tax_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> ValidationResult<ValidationReport> {
        let mut log = CheckLog::new();

        let bundle: DecodedBundle = match self.decoder.decode(container, password) {
            Ok(bundle) => bundle,
            Err(ValidationError::Decryption(reason)) => {
                log::debug!("Container could not be opened: {reason}");
                log.record(CheckResult::fail(
                    CheckId::ContainerPassword,
                    MSG_CONTAINER_UNREADABLE,
                ))?;
                return Ok(ReportBuilder::new(log)
                    .build_with(ValidationStatus::Invalid, SUMMARY_CONTAINER_UNREADABLE));
            }
            Err(ValidationError::MissingComponent(missing)) => {
                log::debug!("Container lacks: {missing}");
                log.record(CheckResult::pass(
                    CheckId::ContainerPassword,
                    MSG_CONTAINER_OPENED,
                ))?;
                log.record(CheckResult::fail(
                    CheckId::KeyCertificatePair,
                    MSG_PAIR_MISSING,
                ))?;
                return Ok(ReportBuilder::new(log).build());
            }
            Err(other) => return Err(other),
        };

        log.record(CheckResult::pass(
            CheckId::ContainerPassword,
            MSG_CONTAINER_OPENED,
        ))?;
        log.record(CheckResult::pass(
            CheckId::KeyCertificatePair,
            MSG_PAIR_PRESENT,
        ))?;

        let meta = bundle
            .certificate
            .tax_identifiers(&self.policy.cnpj_oid, &self.policy.cpf_oid);

        let ctx = CheckContext {
            certificate: &bundle.certificate,
            key: &bundle.key,
            policy: &self.policy,
            expected_tax_id,
            now,
        };
        self.runner.run(&ctx, &mut log)?;

        Ok(ReportBuilder::new(log).meta(meta).build())
    }
}
