//! Service layer module root.
//! Contains the compliance checks and the runner that sequences them.

pub mod cert_validator;
pub mod check_runner;

pub use cert_validator::{CertificateValidator, CheckContext, CheckFn};
pub use check_runner::{CheckRunner, COMPLIANCE_CHECKS};
