//! # Verify Subcommand
//!
//! Reads a commitment from the ledger. Exits with [`EXIT_ABSENT`] when the
//! commitment is not published so scripts can branch without parsing JSON.
//!
//! By default an unreachable ledger reads as absent. `--strict` turns read
//! failures into errors instead.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use zkyc_commitment::{ReadFailurePolicy, ServiceConfig, VerifierConfig};
use zkyc_ledger::LedgerKind;

use crate::{connect, write_json, EXIT_ABSENT, EXIT_OK};

/// Arguments for the `zkyc verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Commitment identifier, 64 hex digits with optional `0x` prefix.
    pub hash: String,

    /// Fail instead of reporting "absent" when the ledger cannot be read.
    #[arg(long)]
    pub strict: bool,
}

impl VerifyArgs {
    fn read_policy(&self) -> ReadFailurePolicy {
        if self.strict {
            ReadFailurePolicy::Strict
        } else {
            ReadFailurePolicy::Conservative
        }
    }
}

/// Execute `zkyc verify`.
pub async fn run_verify(args: &VerifyArgs, ledger: LedgerKind, out: &mut impl Write) -> Result<u8> {
    let config = ServiceConfig {
        verifier: VerifierConfig {
            policy: args.read_policy(),
            ..VerifierConfig::default()
        },
        ..ServiceConfig::default()
    };
    let service = connect(ledger, config)?;

    let status = service.verify(&args.hash).await?;
    write_json(out, &status)?;
    Ok(if status.exists { EXIT_OK } else { EXIT_ABSENT })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[tokio::test]
    async fn fresh_memory_ledger_reports_absent() {
        let args = VerifyArgs {
            hash: KYC_HASH.to_string(),
            strict: true,
        };
        let mut out = Vec::new();
        let code = run_verify(&args, LedgerKind::Memory, &mut out).await.unwrap();
        assert_eq!(code, EXIT_ABSENT);
        assert_eq!(output_json(out), serde_json::json!({"exists": false}));
    }

    #[tokio::test]
    async fn malformed_identifier_is_error() {
        let args = VerifyArgs {
            hash: "not-hex".to_string(),
            strict: false,
        };
        let mut out = Vec::new();
        assert!(run_verify(&args, LedgerKind::Memory, &mut out).await.is_err());
    }

    #[tokio::test]
    async fn aptos_verify_needs_no_signing_key() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/view"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([false])))
            .mount(&server)
            .await;

        std::env::set_var("APTOS_NODE_URL", server.uri());
        std::env::set_var("APTOS_MODULE_ADDRESS", "0x42");
        std::env::remove_var("APTOS_ACCOUNT_ADDRESS");
        std::env::remove_var("APTOS_PRIVATE_KEY");

        let args = VerifyArgs {
            hash: KYC_HASH.to_string(),
            strict: true,
        };
        let mut out = Vec::new();
        let result = run_verify(&args, LedgerKind::Aptos, &mut out).await;
        std::env::remove_var("APTOS_NODE_URL");
        std::env::remove_var("APTOS_MODULE_ADDRESS");

        assert_eq!(result.unwrap(), EXIT_ABSENT);
        assert_eq!(output_json(out), serde_json::json!({"exists": false}));
    }

    #[test]
    fn strict_flag_selects_policy() {
        let lenient = VerifyArgs {
            hash: String::new(),
            strict: false,
        };
        let strict = VerifyArgs {
            hash: String::new(),
            strict: true,
        };
        assert_eq!(lenient.read_policy(), ReadFailurePolicy::Conservative);
        assert_eq!(strict.read_policy(), ReadFailurePolicy::Strict);
    }
}
