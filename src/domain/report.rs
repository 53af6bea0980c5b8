//! Validation report and its builder.
//!
//! A report is created fresh per validation call and never mutated once
//! built. The JSON field names are fixed for compatibility with existing
//! consumers.

use crate::domain::check::{CheckId, CheckLog, CheckResult};
use crate::domain::certificate::TaxIdentifiers;
use crate::domain::constants::MSG_ERROR_PREFIX;
use crate::domain::status::{aggregate, ValidationStatus};
use crate::infra::error::ValidationError;
use serde::Serialize;

/// Final, serializable result of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub checks: CheckLog,
    pub meta: TaxIdentifiers,
    pub summary: String,
}

impl ValidationReport {
    /// Collapse a run into an `error` report with a single `erro_geral` result.
    #[must_use]
    pub fn from_failure(error: &ValidationError) -> Self {
        let message = format!("{MSG_ERROR_PREFIX}: {error}");
        log::error!("{message}");

        let checks =
            CheckLog::from_single(CheckResult::fail(CheckId::GeneralError, message.clone()));

        Self {
            status: ValidationStatus::Error,
            checks,
            meta: TaxIdentifiers::default(),
            summary: message,
        }
    }

    /// True when the certificate can be used (possibly with warnings).
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(
            self.status,
            ValidationStatus::Valid | ValidationStatus::Warning
        )
    }
}

/// Assembles a [`ValidationReport`] from the results gathered so far.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    checks: CheckLog,
    meta: TaxIdentifiers,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(checks: CheckLog) -> Self {
        Self {
            checks,
            meta: TaxIdentifiers::default(),
        }
    }

    #[must_use]
    pub fn meta(mut self, meta: TaxIdentifiers) -> Self {
        self.meta = meta;
        self
    }

    /// Finalize using the status rule table.
    #[must_use]
    pub fn build(self) -> ValidationReport {
        let verdict = aggregate(&self.checks);
        ValidationReport {
            status: verdict.status,
            checks: self.checks,
            meta: self.meta,
            summary: verdict.summary,
        }
    }

    /// Finalize with a fixed status and summary, bypassing aggregation.
    #[must_use]
    pub fn build_with(self, status: ValidationStatus, summary: impl Into<String>) -> ValidationReport {
        ValidationReport {
            status,
            checks: self.checks,
            meta: self.meta,
            summary: summary.into(),
        }
    }
}
