//! Error types for certificate validation.
//! Error handling types and result definitions for the validation pipeline.

use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Error types raised while decoding or checking a certificate bundle.
///
/// `Decryption` and `MissingComponent` are the two classified fatal errors of
/// the container stage; the workflow turns them into dedicated check results.
/// Anything else that escapes to the workflow collapses the run into an
/// `error` report.
#[derive(Error, Debug, miette::Diagnostic)]
pub enum ValidationError {
    #[error("Container decryption failed: {0}")]
    Decryption(String),

    #[error("Missing container component: {0}")]
    MissingComponent(String),

    #[error("Certificate decode error: {0}")]
    CertificateDecode(String),

    #[error("ASN.1 encoding/decoding error: {0}")]
    Asn1Error(String),

    #[error("Cryptographic error: {0}")]
    CryptographicError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Check '{0}' recorded more than once")]
    DuplicateCheck(&'static str),
}

impl From<der::Error> for ValidationError {
    fn from(error: der::Error) -> Self {
        ValidationError::Asn1Error(error.to_string())
    }
}

impl From<openssl::error::ErrorStack> for ValidationError {
    fn from(error: openssl::error::ErrorStack) -> Self {
        ValidationError::CryptographicError(error.to_string())
    }
}

impl From<std::io::Error> for ValidationError {
    fn from(error: std::io::Error) -> Self {
        ValidationError::IoError(error.to_string())
    }
}
