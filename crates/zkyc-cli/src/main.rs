//! # zkyc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! JSON results go to stdout; tracing output goes to stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkyc_cli::commit::{run_commit, run_issue, CommitArgs, IssueArgs};
use zkyc_cli::derive::{run_derive, DeriveArgs};
use zkyc_cli::verify::{run_verify, VerifyArgs};
use zkyc_ledger::LedgerKind;

/// zKYC commitment CLI.
///
/// Derives commitment identifiers from verification proofs, publishes them
/// to the ledger, and checks whether they are published.
#[derive(Parser, Debug)]
#[command(name = "zkyc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Ledger backend: `aptos` (configured from APTOS_* variables) or `memory`.
    #[arg(long, global = true, env = "ZKYC_LEDGER", default_value = "aptos")]
    ledger: LedgerKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the commitment identifier for a proof file.
    Derive(DeriveArgs),

    /// Derive and publish the commitment for a proof file.
    Commit(CommitArgs),

    /// Publish an already-derived commitment identifier.
    Issue(IssueArgs),

    /// Check whether a commitment is published. Exits 2 when absent.
    Verify(VerifyArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(ledger = %cli.ledger, "zkyc CLI starting");

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Derive(args) => run_derive(args, &mut stdout),
        Commands::Commit(args) => run_commit(args, cli.ledger, &mut stdout).await,
        Commands::Issue(args) => run_issue(args, cli.ledger, &mut stdout).await,
        Commands::Verify(args) => run_verify(args, cli.ledger, &mut stdout).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
