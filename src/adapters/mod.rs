//! Adapter layer modules for external library integration.
//!
//! Provides adapters for:
//! - PKCS#12 container decryption via OpenSSL
//! - X.509 certificate field decoding via `x509-cert`

pub mod pkcs12;
pub mod x509;
