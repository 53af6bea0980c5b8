//! A1 certificate validator CLI
//!
//! Validates a PKCS#12 (`.pfx` / `.p12`) certificate against the ICP-Brasil
//! eSocial compliance policy and prints the report as JSON on stdout.

use a1_cert_validator::{
    config::PolicyManager, domain::constants::CLI_USAGE, error::ValidationError,
    ValidationPolicy, ValidationReport, ValidationWorkflow,
};
use clap::error::ErrorKind;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "a1-cert-validator")]
#[command(about = "Validate ICP-Brasil A1 certificates (PKCS#12) for eSocial")]
#[command(long_about = "
A1 certificate validator - compliance report for PKCS#12 signing certificates

EXAMPLES:
    # Validate a certificate
    a1-cert-validator empresa.pfx 'senha'

    # Also check that it belongs to a given CNPJ
    a1-cert-validator empresa.pfx 'senha' 12.345.678/0001-95

    # Use custom thresholds
    a1-cert-validator empresa.pfx 'senha' --policy policy.toml

OUTPUT:
    JSON report on stdout: status (valid, warning, invalid, error), checks,
    meta (cnpj, cpf) and summary.

ENVIRONMENT VARIABLES:
    RUST_LOG        Logging level on stderr (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    /// PKCS#12 file to validate (.pfx, .p12)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Container password
    #[arg(value_name = "PASSWORD", allow_hyphen_values = true)]
    password: String,

    /// CNPJ the certificate must belong to (formatting characters are ignored)
    #[arg(value_name = "EXPECTED_TAX_ID")]
    expected_tax_id: Option<String>,

    /// TOML file overriding the compliance thresholds
    #[arg(long, value_name = "POLICY_FILE")]
    policy: Option<PathBuf>,
}

/// Printed instead of a report when the invocation itself is unusable.
#[derive(Serialize)]
struct InvocationError<'a> {
    status: &'static str,
    message: &'a str,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only JSON
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            log::debug!("Argument parsing failed: {e}");
            exit_with_invocation_error(CLI_USAGE)
        }
    };

    let policy = match &cli.policy {
        Some(path) => match PolicyManager::with_path(path).load() {
            Ok(policy) => policy,
            Err(e) => exit_with_invocation_error(&e.to_string()),
        },
        None => ValidationPolicy::default(),
    };

    let report = match std::fs::read(&cli.file) {
        Ok(container) => ValidationWorkflow::with_policy(policy).run(
            &container,
            &cli.password,
            cli.expected_tax_id.as_deref(),
        ),
        Err(e) => {
            let error = ValidationError::IoError(format!(
                "Failed to read {}: {e}",
                cli.file.display()
            ));
            ValidationReport::from_failure(&error)
        }
    };

    print_json(&report)
}

fn exit_with_invocation_error(message: &str) -> ! {
    if let Err(report) = print_json(&InvocationError {
        status: "error",
        message,
    }) {
        eprintln!("{report:?}");
    }
    std::process::exit(1)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
