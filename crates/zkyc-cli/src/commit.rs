//! # Commit & Issue Subcommands
//!
//! - `commit` derives the identifier from a proof file and publishes it with
//!   a validity window of `now + --validity-secs`.
//! - `issue` publishes an identifier the caller derived elsewhere, with an
//!   absolute `--validity-window`.
//!
//! Both wait for finality before printing the transaction hash.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use zkyc_commitment::service::DEFAULT_VALIDITY_SECS;
use zkyc_commitment::{IssuancePolicy, ServiceConfig};
use zkyc_core::IssuerId;
use zkyc_ledger::LedgerKind;

use crate::{connect, read_proof, write_json, EXIT_OK};

/// Arguments for the `zkyc commit` subcommand.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Path to the proof record JSON file.
    pub proof: PathBuf,

    /// Issuing authority identifier recorded with the commitment.
    #[arg(long, default_value_t = 1)]
    pub issuer_id: u64,

    /// Seconds from now until the commitment expires. Must be positive.
    #[arg(long, default_value_t = DEFAULT_VALIDITY_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub validity_secs: u64,
}

/// Arguments for the `zkyc issue` subcommand.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Commitment identifier, 64 hex digits with optional `0x` prefix.
    pub hash: String,

    /// Issuing authority identifier recorded with the commitment.
    #[arg(long)]
    pub issuer_id: u64,

    /// Absolute expiry, Unix seconds. Must be in the future.
    #[arg(long)]
    pub validity_window: u64,
}

/// Execute `zkyc commit`.
pub async fn run_commit(args: &CommitArgs, ledger: LedgerKind, out: &mut impl Write) -> Result<u8> {
    let proof = read_proof(&args.proof)?;
    let policy = IssuancePolicy {
        issuer_id: IssuerId::new(args.issuer_id)?,
        validity_secs: args.validity_secs,
    };
    let service = connect(
        ledger,
        ServiceConfig {
            policy,
            ..ServiceConfig::default()
        },
    )?;

    let committed = service.issue_from_proof(&proof).await?;
    write_json(out, &committed)?;
    Ok(EXIT_OK)
}

/// Execute `zkyc issue`.
pub async fn run_issue(args: &IssueArgs, ledger: LedgerKind, out: &mut impl Write) -> Result<u8> {
    let service = connect(ledger, ServiceConfig::default())?;
    let issued = service
        .issue_raw(&args.hash, args.issuer_id, args.validity_window)
        .await?;
    write_json(out, &issued)?;
    Ok(EXIT_OK)
}
