//! # zkyc-ledger — Ledger Gateway
//!
//! The only boundary the commitment protocol depends on. A ledger gateway
//! exposes three capabilities:
//!
//! | Capability             | Method                                      |
//! |------------------------|---------------------------------------------|
//! | submit-transaction     | [`LedgerGateway::submit_transaction`]       |
//! | wait-for-finality      | [`LedgerGateway::await_finality`]           |
//! | call-read-only-function| [`LedgerGateway::call_read_only`]           |
//!
//! ## Implementations
//!
//! - [`InMemoryLedger`]: in-process simulation of the `ZKYCCommitment`
//!   Move module. Used by tests and dry runs.
//! - [`AptosGateway`]: Aptos fullnode REST client. Signs entry-function
//!   transactions with a single injected Ed25519 key.
//!
//! ## Contract
//!
//! [`CommitmentContract`] builds the three calls the protocol makes
//! (`publish_commitment`, `verify`, `get_commitment`) so that function
//! names and argument encodings live in one place.
//!
//! ## Crate Policy
//!
//! - Depends on `zkyc-core` for identifier types only.
//! - Gateways never retry submissions. Idempotent reads may be retried.

pub mod aptos;
pub mod backend;
pub mod call;
pub mod config;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod memory;
pub(crate) mod retry;

pub use aptos::AptosGateway;
pub use backend::LedgerKind;
pub use call::{EntryFunctionCall, FunctionId, MoveArg, PendingHandle, TransactionHash, ViewFunctionCall};
pub use config::{AptosConfig, ConfigError, SignerConfig};
pub use contract::CommitmentContract;
pub use error::LedgerError;
pub use gateway::LedgerGateway;
pub use memory::InMemoryLedger;
