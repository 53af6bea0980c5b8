//! PKCS#12 container decoding backed by OpenSSL.

use crate::adapters::x509::profile_from_der;
use crate::domain::certificate::{CertificateProfile, PrivateKeyHandle};
use crate::infra::error::{ValidationError, ValidationResult};
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{Id, PKey, Private};
use openssl::x509::X509Ref;

/// Key, leaf certificate and chain fragment extracted from a container.
#[derive(Debug, Clone)]
pub struct DecodedBundle {
    pub key: PrivateKeyHandle,
    pub certificate: CertificateProfile,
    /// Number of extra certificates shipped alongside the leaf
    pub additional_certificates: usize,
}

/// Unlocks a certificate container.
///
/// Implementations must report a wrong passphrase or a malformed container
/// as [`ValidationError::Decryption`], and a container lacking the key or
/// the leaf certificate as [`ValidationError::MissingComponent`]. Any other
/// error is treated as an unexpected failure by the workflow.
pub trait ContainerDecoder {
    fn decode(&self, container: &[u8], password: &str) -> ValidationResult<DecodedBundle>;
}

/// [`ContainerDecoder`] for PKCS#12 (`.pfx` / `.p12`) files.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSslPkcs12Decoder;

impl OpenSslPkcs12Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ContainerDecoder for OpenSslPkcs12Decoder {
    fn decode(&self, container: &[u8], password: &str) -> ValidationResult<DecodedBundle> {
        log::debug!("Decoding PKCS#12 container ({} bytes)", container.len());

        let parsed = Pkcs12::from_der(container)
            .and_then(|p12| p12.parse2(password))
            .map_err(|e| ValidationError::Decryption(e.to_string()))?;

        let (pkey, cert) = match (parsed.pkey, parsed.cert) {
            (Some(pkey), Some(cert)) => (pkey, cert),
            (pkey, cert) => {
                let loose_certificates = parsed.ca.as_ref().map_or(0, |ca| ca.len());
                let missing =
                    missing_component(pkey.is_some(), cert.is_some(), loose_certificates);
                return Err(ValidationError::MissingComponent(missing.to_string()));
            }
        };
        let additional_certificates = parsed.ca.as_ref().map_or(0, |ca| ca.len());

        let key = key_handle(&pkey);
        log::debug!("Private key: {key:?}");

        let der = cert.to_der()?;
        let certificate = profile_from_der(&der, signature_algorithm_name(&cert))?;

        log::info!(
            "Container opened: leaf certificate plus {additional_certificates} additional certificate(s)"
        );

        Ok(DecodedBundle {
            key,
            certificate,
            additional_certificates,
        })
    }
}

/// Name what a decoded container lacks.
///
/// Without a private key OpenSSL cannot tell the leaf apart from the chain
/// and returns every certificate as a loose one, so a keyless container
/// that still carries certificates is only missing its key.
fn missing_component(has_key: bool, has_cert: bool, loose_certificates: usize) -> &'static str {
    match (has_key, has_cert) {
        (false, false) if loose_certificates > 0 => "private key",
        (false, false) => "private key and certificate",
        (false, true) => "private key",
        _ => "certificate",
    }
}

fn key_handle(pkey: &PKey<Private>) -> PrivateKeyHandle {
    let id = pkey.id();
    let (algorithm, sized) = match id {
        Id::RSA => ("RSA", true),
        Id::DSA => ("DSA", true),
        Id::EC => ("EC", true),
        Id::DH => ("DH", true),
        Id::ED25519 => ("Ed25519", false),
        _ => ("unknown", false),
    };
    PrivateKeyHandle::new(algorithm, sized.then(|| pkey.bits()))
}

/// OpenSSL long name for the certificate's signature algorithm, if known.
fn signature_algorithm_name(cert: &X509Ref) -> Option<String> {
    let nid = cert.signature_algorithm().object().nid();
    if nid == Nid::UNDEF {
        return None;
    }
    nid.long_name().ok().map(str::to_string)
}
