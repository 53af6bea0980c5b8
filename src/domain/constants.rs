//! Centralized constants for the ICP-Brasil compliance policy.
//! OIDs, thresholds and the fixed report wording shared across layers.

// === Policy defaults ===

/// Minimum accepted key size, in bits
pub const DEFAULT_MIN_KEY_BITS: u32 = 2048;

/// Expiration warning window, in days (inclusive upper bound)
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Digest names accepted in the signature algorithm name
pub const DEFAULT_ACCEPTED_DIGESTS: &[&str] = &["sha256", "sha384", "sha512"];

// === ICP-Brasil OIDs ===

/// Root arc of ICP-Brasil certificate policies (2.16.76.1)
pub const ICP_BRASIL_POLICY_ARC: &str = "2.16.76.1";

/// Subject attribute carrying the organization tax id (CNPJ)
pub const CNPJ_OID: &str = "2.16.76.1.3.3";

/// Subject attribute carrying the individual tax id (CPF)
pub const CPF_OID: &str = "2.16.76.1.3.1";

// === Report wording ===

pub const MSG_CONTAINER_OPENED: &str = "Arquivo aberto com sucesso";
pub const MSG_CONTAINER_UNREADABLE: &str = "Senha incorreta ou arquivo inválido";
pub const MSG_PAIR_PRESENT: &str = "Chave privada e certificado presentes";
pub const MSG_PAIR_MISSING: &str = "Chave privada ou certificado ausente";
pub const MSG_KEY_USAGE_MISSING: &str = "Extensão Key Usage não encontrada";
pub const MSG_POLICIES_MISSING: &str = "Extensão Certificate Policies não encontrada";

/// Prefix for messages produced by unexpected failures
pub const MSG_ERROR_PREFIX: &str = "Erro durante validação";

pub const SUMMARY_VALID: &str =
    "Tudo certo! Seu certificado está ativo e pronto para uso no eSocial.";
pub const SUMMARY_WARNING_PREFIX: &str = "Certificado válido com avisos";
pub const SUMMARY_INVALID_PREFIX: &str = "Certificado inválido";
pub const SUMMARY_MULTIPLE_ERRORS: &str = "Múltiplos erros encontrados";
pub const SUMMARY_CONTAINER_UNREADABLE: &str =
    "Não foi possível abrir o arquivo. Verifique a senha do .pfx.";

/// Usage line printed when required CLI arguments are missing
pub const CLI_USAGE: &str = "Uso: a1-cert-validator <arquivo.pfx> <senha> [cnpj_empresa]";
