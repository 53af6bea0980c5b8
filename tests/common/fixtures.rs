//! PKCS#12 fixtures built with OpenSSL.
//!
//! Every container holds an RSA leaf certificate issued by a throwaway test
//! CA (unless `self_signed` is set) and, optionally, the CA certificate as
//! the chain fragment.

use chrono::{DateTime, Duration, TimeZone, Utc};
use der::asn1::ObjectIdentifier;
use der::Encode;
use openssl::asn1::{Asn1Object, Asn1OctetString, Asn1Time};
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::stack::Stack;
use openssl::x509::extension::KeyUsage;
use openssl::x509::{
    X509Builder, X509Extension, X509Name, X509NameBuilder, X509NameRef, X509,
};
use x509_cert::ext::pkix::certpolicy::PolicyInformation;
use x509_cert::ext::pkix::CertificatePolicies;

pub const PASSWORD: &str = "senha-teste-123";
pub const CNPJ: &str = "12345678000195";
pub const CPF: &str = "12345678909";
pub const ICP_POLICY: &str = "2.16.76.1.2.1.51";

/// Fixed evaluation instant used by most tests.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

/// Which KeyUsage bits to put in the certificate.
#[derive(Debug, Clone, Copy)]
pub enum KeyUsageSpec {
    DigitalSignature,
    NonRepudiation,
    /// keyEncipherment only
    EncipherOnly,
}

#[derive(Clone)]
pub struct CertificateSpec {
    pub common_name: String,
    pub cnpj: Option<String>,
    pub cpf: Option<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub key_bits: u32,
    pub digest: MessageDigest,
    pub key_usage: Option<KeyUsageSpec>,
    pub policies: Option<Vec<String>>,
    pub self_signed: bool,
    pub include_chain: bool,
}

impl CertificateSpec {
    /// Satisfies every compliance check as of `now`.
    pub fn compliant(now: DateTime<Utc>) -> Self {
        Self {
            common_name: format!("EMPRESA TESTE LTDA:{CNPJ}"),
            cnpj: Some(CNPJ.to_string()),
            cpf: Some(CPF.to_string()),
            not_before: now - Duration::days(300),
            not_after: now + Duration::days(65),
            key_bits: 2048,
            digest: MessageDigest::sha256(),
            key_usage: Some(KeyUsageSpec::DigitalSignature),
            policies: Some(vec![ICP_POLICY.to_string()]),
            self_signed: false,
            include_chain: true,
        }
    }

    /// Compliant, but expiring exactly `days` after `now`.
    pub fn expiring_in(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            not_after: now + Duration::days(days),
            ..Self::compliant(now)
        }
    }

    /// Build a password-protected PKCS#12 container.
    pub fn to_pkcs12(&self, password: &str) -> Vec<u8> {
        let (cert, key, ca) = self.build();
        let mut builder = Pkcs12::builder();
        builder.name("certificado-a1").pkey(&key).cert(&cert);
        if let Some(ca) = ca {
            let mut chain = Stack::new().expect("Should create stack");
            chain.push(ca).expect("Should push CA");
            builder.ca(chain);
        }
        builder
            .build2(password)
            .expect("Should build PKCS#12")
            .to_der()
            .expect("Should encode PKCS#12")
    }

    /// Container holding only the certificate, no private key.
    pub fn to_pkcs12_without_key(&self, password: &str) -> Vec<u8> {
        let (cert, _, _) = self.build();
        let mut builder = Pkcs12::builder();
        builder.name("certificado-a1").cert(&cert);
        builder
            .build2(password)
            .expect("Should build PKCS#12")
            .to_der()
            .expect("Should encode PKCS#12")
    }

    fn build(&self) -> (X509, PKey<Private>, Option<X509>) {
        let key = generate_key(self.key_bits);
        let subject = self.subject_name();

        if self.self_signed {
            let cert = self.issue(&subject, &subject, &key, &key);
            return (cert, key, None);
        }

        let (ca_cert, ca_key) = test_ca();
        let cert = self.issue(&subject, ca_cert.subject_name(), &key, &ca_key);
        let chain = self.include_chain.then_some(ca_cert);
        (cert, key, chain)
    }

    fn subject_name(&self) -> X509Name {
        let mut name = X509NameBuilder::new().expect("Should create name builder");
        name.append_entry_by_text("C", "BR").expect("Should add C");
        name.append_entry_by_text("O", "ICP-Brasil")
            .expect("Should add O");
        name.append_entry_by_text("CN", &self.common_name)
            .expect("Should add CN");
        if let Some(cnpj) = &self.cnpj {
            name.append_entry_by_text("2.16.76.1.3.3", cnpj)
                .expect("Should add CNPJ attribute");
        }
        if let Some(cpf) = &self.cpf {
            name.append_entry_by_text("2.16.76.1.3.1", cpf)
                .expect("Should add CPF attribute");
        }
        name.build()
    }

    fn issue(
        &self,
        subject: &X509Name,
        issuer: &X509NameRef,
        key: &PKey<Private>,
        signing_key: &PKey<Private>,
    ) -> X509 {
        let mut builder = X509Builder::new().expect("Should create X509 builder");
        builder.set_version(2).expect("Should set version");
        let serial = BigNum::from_u32(0x1a2b)
            .expect("Should create serial")
            .to_asn1_integer()
            .expect("Should convert serial");
        builder
            .set_serial_number(&serial)
            .expect("Should set serial");
        builder.set_subject_name(subject).expect("Should set subject");
        builder
            .set_issuer_name(issuer)
            .expect("Should set issuer");
        builder
            .set_not_before(&asn1_time(self.not_before))
            .expect("Should set not_before");
        builder
            .set_not_after(&asn1_time(self.not_after))
            .expect("Should set not_after");
        builder.set_pubkey(key).expect("Should set pubkey");

        if let Some(spec) = self.key_usage {
            let mut usage = KeyUsage::new();
            usage.critical();
            match spec {
                KeyUsageSpec::DigitalSignature => {
                    usage.digital_signature().key_encipherment();
                }
                KeyUsageSpec::NonRepudiation => {
                    usage.non_repudiation();
                }
                KeyUsageSpec::EncipherOnly => {
                    usage.key_encipherment();
                }
            }
            builder
                .append_extension(usage.build().expect("Should build KeyUsage"))
                .expect("Should add KeyUsage");
        }

        if let Some(policies) = &self.policies {
            builder
                .append_extension(certificate_policies(policies))
                .expect("Should add CertificatePolicies");
        }

        builder
            .sign(signing_key, self.digest)
            .expect("Should sign certificate");
        builder.build()
    }
}

/// CertificatePolicies encoded with `x509-cert`; OpenSSL's text form needs a
/// config database.
fn certificate_policies(oids: &[String]) -> X509Extension {
    let policies = CertificatePolicies(
        oids.iter()
            .map(|oid| PolicyInformation {
                policy_identifier: ObjectIdentifier::new(oid).expect("Should parse policy OID"),
                policy_qualifiers: None,
            })
            .collect(),
    );
    let der = policies.to_der().expect("Should encode CertificatePolicies");
    let oid = Asn1Object::from_str("2.5.29.32").expect("Should create extension OID");
    let contents = Asn1OctetString::new_from_bytes(&der).expect("Should wrap extension value");
    X509Extension::new_from_der(&oid, false, &contents).expect("Should build CertificatePolicies")
}

fn generate_key(bits: u32) -> PKey<Private> {
    let rsa = Rsa::generate(bits).expect("Should generate RSA key");
    PKey::from_rsa(rsa).expect("Should create PKey")
}

fn asn1_time(at: DateTime<Utc>) -> Asn1Time {
    Asn1Time::from_unix(at.timestamp()).expect("Should create Asn1Time")
}

fn test_ca() -> (X509, PKey<Private>) {
    let key = generate_key(2048);
    let mut name = X509NameBuilder::new().expect("Should create name builder");
    name.append_entry_by_text("C", "BR").expect("Should add C");
    name.append_entry_by_text("O", "ICP-Brasil")
        .expect("Should add O");
    name.append_entry_by_text("CN", "AC Teste ICP-Brasil v5")
        .expect("Should add CN");
    let name = name.build();

    let mut builder = X509Builder::new().expect("Should create X509 builder");
    builder.set_version(2).expect("Should set version");
    let serial = BigNum::from_u32(1)
        .expect("Should create serial")
        .to_asn1_integer()
        .expect("Should convert serial");
    builder
        .set_serial_number(&serial)
        .expect("Should set serial");
    builder.set_subject_name(&name).expect("Should set subject");
    builder.set_issuer_name(&name).expect("Should set issuer");
    let not_before = Asn1Time::days_from_now(0).expect("Should create not_before");
    let not_after = Asn1Time::days_from_now(3650).expect("Should create not_after");
    builder
        .set_not_before(&not_before)
        .expect("Should set not_before");
    builder
        .set_not_after(&not_after)
        .expect("Should set not_after");
    builder.set_pubkey(&key).expect("Should set pubkey");
    builder
        .sign(&key, MessageDigest::sha256())
        .expect("Should sign CA");
    (builder.build(), key)
}
