//! # zkyc-cli — Operator CLI for the zKYC Commitment Stack
//!
//! Provides the `zkyc` command-line interface.
//!
//! ## Subcommands
//!
//! - `zkyc derive` — Compute a proof's commitment identifier locally.
//! - `zkyc commit` — Derive and publish a proof's commitment.
//! - `zkyc issue` — Publish an already-derived commitment identifier.
//! - `zkyc verify` — Look up a commitment on the ledger.
//!
//! Results are written to stdout as JSON; logs go to stderr.
//!
//! ```bash
//! zkyc derive proof.json
//! zkyc --ledger memory commit proof.json --issuer-id 7
//! zkyc verify 0x7a03c9882de97054aeb5f0f767342dff1b6d054718093c1e90825906174c0757 --strict
//! ```

pub mod commit;
pub mod derive;
pub mod verify;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use zkyc_commitment::{CommitmentService, ServiceConfig};
use zkyc_core::{ProofRecord, SystemClock};
use zkyc_ledger::LedgerKind;

/// Exit code for a successful run.
pub const EXIT_OK: u8 = 0;

/// Exit code for `verify` when the commitment is not on the ledger.
pub const EXIT_ABSENT: u8 = 2;

/// Read and decode a proof record from a JSON file.
pub fn read_proof(path: &Path) -> Result<ProofRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read proof file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("proof file {} is not valid JSON", path.display()))?;
    ProofRecord::from_value(value)
        .with_context(|| format!("proof file {} is not a proof record", path.display()))
}

/// Connect to `ledger` and wrap it in a [`CommitmentService`].
pub fn connect(ledger: LedgerKind, config: ServiceConfig) -> Result<CommitmentService> {
    let (gateway, contract) = ledger
        .connect()
        .with_context(|| format!("failed to configure {ledger} ledger"))?;
    tracing::debug!(ledger = gateway.name(), "ledger gateway ready");
    Ok(CommitmentService::new(
        gateway,
        contract,
        Arc::new(SystemClock),
        config,
    ))
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to encode output")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}
