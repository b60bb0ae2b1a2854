//! # Derive Subcommand
//!
//! Computes a proof's commitment identifier without touching the ledger.
//! Ineligible proofs (`verify_result: false`) are refused here too, so the
//! printed identifier is always one that `commit` would publish.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use zkyc_commitment::derive_eligible;

use crate::{read_proof, write_json, EXIT_OK};

/// Arguments for the `zkyc derive` subcommand.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    /// Path to the proof record JSON file.
    pub proof: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeriveOutput {
    commitment_hash: String,
}

/// Execute `zkyc derive`.
pub fn run_derive(args: &DeriveArgs, out: &mut impl Write) -> Result<u8> {
    let proof = read_proof(&args.proof)?;
    let commitment_id = derive_eligible(&proof).context("proof is not eligible for commitment")?;
    tracing::info!(commitment_id = %commitment_id, task = %proof.task, "derived commitment identifier");

    write_json(
        out,
        &DeriveOutput {
            commitment_hash: commitment_id.to_prefixed_hex(),
        },
    )?;
    Ok(EXIT_OK)
}
