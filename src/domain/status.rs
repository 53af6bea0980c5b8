//! Overall report status and the aggregation rule table.
//!
//! The status of a run is decided once, over the complete [`CheckLog`], by
//! walking [`STATUS_RULES`] in order: the first rule whose predicate holds
//! supplies both the status and the summary.

use crate::domain::check::{CheckId, CheckLog, CheckResult};
use crate::domain::constants::{
    SUMMARY_INVALID_PREFIX, SUMMARY_MULTIPLE_ERRORS, SUMMARY_VALID, SUMMARY_WARNING_PREFIX,
};
use serde::Serialize;
use std::fmt;

/// Overall outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Invalid,
    Error,
}

impl ValidationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Warning => "warning",
            ValidationStatus::Invalid => "invalid",
            ValidationStatus::Error => "error",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus the human-readable summary that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: ValidationStatus,
    pub summary: String,
}

/// One row of the precedence table.
pub struct StatusRule {
    pub status: ValidationStatus,
    pub applies: fn(&CheckLog) -> bool,
    pub summarize: fn(&CheckLog) -> String,
}

/// Precedence: error > invalid > warning > valid. The last row always applies.
pub const STATUS_RULES: [StatusRule; 4] = [
    StatusRule {
        status: ValidationStatus::Error,
        applies: has_general_error,
        summarize: general_error_summary,
    },
    StatusRule {
        status: ValidationStatus::Invalid,
        applies: has_critical_failure,
        summarize: invalid_summary,
    },
    StatusRule {
        status: ValidationStatus::Warning,
        applies: has_warning,
        summarize: warning_summary,
    },
    StatusRule {
        status: ValidationStatus::Valid,
        applies: always,
        summarize: valid_summary,
    },
];

/// Evaluate the rule table over a complete result log.
#[must_use]
pub fn aggregate(log: &CheckLog) -> Verdict {
    let rule = STATUS_RULES
        .iter()
        .find(|rule| (rule.applies)(log))
        .unwrap_or(&STATUS_RULES[STATUS_RULES.len() - 1]);

    let verdict = Verdict {
        status: rule.status,
        summary: (rule.summarize)(log),
    };
    log::info!("Aggregated {} results into status '{}'", log.len(), verdict.status);
    verdict
}

fn is_critical(result: &CheckResult) -> bool {
    !result.ok && !result.name.is_warning_class()
}

fn has_general_error(log: &CheckLog) -> bool {
    log.contains(CheckId::GeneralError)
}

fn general_error_summary(log: &CheckLog) -> String {
    log.get(CheckId::GeneralError)
        .map(|r| r.message.clone())
        .unwrap_or_default()
}

fn has_critical_failure(log: &CheckLog) -> bool {
    log.failed().any(is_critical)
}

fn invalid_summary(log: &CheckLog) -> String {
    let reason = log
        .failed()
        .find(|r| is_critical(r))
        .map_or(SUMMARY_MULTIPLE_ERRORS, |r| r.message.as_str());
    format!("{SUMMARY_INVALID_PREFIX}: {reason}")
}

fn has_warning(log: &CheckLog) -> bool {
    log.failed().any(|r| r.name.is_warning_class())
}

fn warning_summary(log: &CheckLog) -> String {
    let warnings: Vec<&str> = log
        .failed()
        .filter(|r| r.name.is_warning_class())
        .map(|r| r.message.as_str())
        .collect();
    format!("{SUMMARY_WARNING_PREFIX}: {}", warnings.join(", "))
}

fn always(_: &CheckLog) -> bool {
    true
}

fn valid_summary(_: &CheckLog) -> String {
    SUMMARY_VALID.to_string()
}
