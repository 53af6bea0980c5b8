//! Projection of a DER certificate into a [`CertificateProfile`].
//!
//! Uses `x509-cert` for structure; the signature algorithm name is resolved
//! by the caller (OpenSSL knows the human names) and falls back to the OID.

use crate::domain::certificate::{CertificateProfile, RawExtension, SubjectAttribute};
use crate::infra::error::{ValidationError, ValidationResult};
use chrono::{DateTime, Utc};
use der::{Decode, Tag, Tagged};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::Name;
use x509_cert::time::Time;
use x509_cert::Certificate;

/// Decode `der` and project the fields the checks need.
pub fn profile_from_der(
    der: &[u8],
    signature_algorithm: Option<String>,
) -> ValidationResult<CertificateProfile> {
    let certificate = Certificate::from_der(der)
        .map_err(|e| ValidationError::CertificateDecode(format!("leaf certificate: {e}")))?;
    let tbs = &certificate.tbs_certificate;

    let subject = render_name(&tbs.subject);
    let issuer = render_name(&tbs.issuer);
    let serial_number = hex::encode(tbs.serial_number.as_bytes());
    log::debug!("Certificate subject: {subject}");
    log::debug!("Certificate issuer: {issuer}");
    log::debug!("Certificate serial: {serial_number}");

    let not_before = to_utc(&tbs.validity.not_before)?;
    let not_after = to_utc(&tbs.validity.not_after)?;

    let signature_algorithm =
        signature_algorithm.unwrap_or_else(|| certificate.signature_algorithm.oid.to_string());

    let mut subject_attributes = Vec::new();
    for rdn in tbs.subject.0.iter() {
        for atv in rdn.0.iter() {
            subject_attributes.push(SubjectAttribute::new(
                atv.oid.to_string(),
                attribute_value_to_string(atv.value.value(), atv.value.tag()),
            ));
        }
    }

    let extensions = tbs
        .extensions
        .as_ref()
        .map(|exts| {
            exts.iter()
                .map(|ext| {
                    RawExtension::new(
                        ext.extn_id.to_string(),
                        ext.critical,
                        ext.extn_value.as_bytes().to_vec(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(CertificateProfile {
        subject,
        issuer,
        serial_number,
        not_before,
        not_after,
        signature_algorithm,
        subject_attributes,
        extensions,
    })
}

fn to_utc(time: &Time) -> ValidationResult<DateTime<Utc>> {
    let secs = i64::try_from(time.to_unix_duration().as_secs()).map_err(|_| {
        ValidationError::CertificateDecode(format!("validity time out of range: {time:?}"))
    })?;
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
        ValidationError::CertificateDecode(format!("validity time out of range: {time:?}"))
    })
}

/// RFC 4514 string of a distinguished name, most specific RDN first.
///
/// `x509-cert` only prints values as text for attribute types it has a short
/// name for; string values of other types (such as the ICP-Brasil tax id
/// attributes) are written as text here instead of `#hex`.
fn render_name(name: &Name) -> String {
    name.0
        .iter()
        .rev()
        .map(|rdn| {
            rdn.0
                .iter()
                .map(render_attribute)
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn render_attribute(atv: &AttributeTypeAndValue) -> String {
    let rendered = atv.to_string();
    let oid = atv.oid.to_string();
    // a short name (CN, O, ...) means x509-cert already wrote the value as text
    if !rendered.starts_with(&format!("{oid}=")) {
        return rendered;
    }
    match attribute_text(atv.value.value(), atv.value.tag()) {
        Some(text) => format!("{oid}={}", escape_dn_value(&text)),
        None => rendered,
    }
}

fn escape_dn_value(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        let special = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';')
            || (i == 0 && matches!(c, '#' | ' '))
            || (i == last && c == ' ');
        if special {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn attribute_text(bytes: &[u8], tag: Tag) -> Option<String> {
    match tag {
        Tag::Utf8String
        | Tag::PrintableString
        | Tag::Ia5String
        | Tag::TeletexString
        | Tag::VisibleString => Some(
            String::from_utf8_lossy(bytes)
                .trim_matches('\0')
                .to_string(),
        ),
        Tag::BmpString => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            Some(String::from_utf16_lossy(&units))
        }
        _ => None,
    }
}

fn attribute_value_to_string(bytes: &[u8], tag: Tag) -> String {
    attribute_text(bytes, tag).unwrap_or_else(|| format!("#{}", hex::encode(bytes)))
}
