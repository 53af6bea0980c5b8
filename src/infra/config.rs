//! Validation policy configuration.
//!
//! The compliance thresholds used by the checks live in a single
//! [`ValidationPolicy`]. Its defaults are the fixed ICP-Brasil A1 policy; a
//! TOML file may override them for testing or for stricter deployments.

use crate::domain::constants::{
    CPF_OID, CNPJ_OID, DEFAULT_ACCEPTED_DIGESTS, DEFAULT_EXPIRY_WARNING_DAYS, DEFAULT_MIN_KEY_BITS,
    ICP_BRASIL_POLICY_ARC,
};
use crate::infra::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Thresholds and identifiers the compliance checks evaluate against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Minimum accepted key size in bits
    pub min_key_bits: u32,

    /// Emit an expiration warning when the certificate expires within this many days
    pub expiry_warning_days: i64,

    /// Digest names accepted inside the signature algorithm name (case-insensitive)
    pub accepted_digests: Vec<String>,

    /// Policy OID arc identifying the national PKI
    pub national_policy_arc: String,

    /// Subject attribute carrying the organization tax id (CNPJ)
    pub cnpj_oid: String,

    /// Subject attribute carrying the individual tax id (CPF)
    pub cpf_oid: String,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_key_bits: DEFAULT_MIN_KEY_BITS,
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
            accepted_digests: DEFAULT_ACCEPTED_DIGESTS
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
            national_policy_arc: ICP_BRASIL_POLICY_ARC.to_string(),
            cnpj_oid: CNPJ_OID.to_string(),
            cpf_oid: CPF_OID.to_string(),
        }
    }
}

impl ValidationPolicy {
    /// Parse a policy from TOML text. Missing keys fall back to the defaults.
    pub fn from_toml_str(content: &str) -> ValidationResult<Self> {
        let policy: ValidationPolicy = toml::from_str(content).map_err(|e| {
            ValidationError::ConfigurationError(format!("Failed to parse policy: {e}"))
        })?;
        policy.validate()?;
        Ok(policy)
    }

    /// Serialize the policy as pretty TOML.
    pub fn to_toml_string(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ValidationError::ConfigurationError(format!("Failed to serialize policy: {e}"))
        })
    }

    /// Validate policy values
    pub fn validate(&self) -> ValidationResult<()> {
        if self.min_key_bits == 0 {
            return Err(ValidationError::ConfigurationError(
                "min_key_bits must be greater than 0".to_string(),
            ));
        }

        if self.expiry_warning_days < 1 {
            return Err(ValidationError::ConfigurationError(format!(
                "expiry_warning_days must be at least 1, got {}",
                self.expiry_warning_days
            )));
        }

        if self.accepted_digests.is_empty()
            || self.accepted_digests.iter().any(|d| d.trim().is_empty())
        {
            return Err(ValidationError::ConfigurationError(
                "accepted_digests must list at least one non-empty digest name".to_string(),
            ));
        }

        for (key, value) in [
            ("national_policy_arc", &self.national_policy_arc),
            ("cnpj_oid", &self.cnpj_oid),
            ("cpf_oid", &self.cpf_oid),
        ] {
            if !is_dotted_oid(value) {
                return Err(ValidationError::ConfigurationError(format!(
                    "{key} is not a dotted OID: '{value}'"
                )));
            }
        }

        Ok(())
    }
}

/// Loads a [`ValidationPolicy`] from an explicit file path.
pub struct PolicyManager {
    policy_path: PathBuf,
}

impl PolicyManager {
    /// Create a policy manager for the given file
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            policy_path: path.as_ref().to_path_buf(),
        }
    }

    /// Load and validate the policy file
    pub fn load(&self) -> ValidationResult<ValidationPolicy> {
        log::info!("Loading validation policy from: {}", self.policy_path.display());

        let content = fs::read_to_string(&self.policy_path).map_err(|e| {
            ValidationError::ConfigurationError(format!(
                "Failed to read policy file {}: {}",
                self.policy_path.display(),
                e
            ))
        })?;

        ValidationPolicy::from_toml_str(&content)
    }

    /// Get the policy file path
    #[must_use]
    pub fn policy_path(&self) -> &Path {
        &self.policy_path
    }
}

fn is_dotted_oid(value: &str) -> bool {
    let mut arcs = 0;
    for arc in value.split('.') {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        arcs += 1;
    }
    arcs >= 2
}
