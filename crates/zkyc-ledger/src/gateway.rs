//! # Ledger Gateway Trait
//!
//! The capability contract between the commitment protocol and a ledger.
//!
//! ## Security Invariant
//!
//! `await_finality()` returns `Ok` only once the transaction is included
//! and executed successfully. `submit_transaction()` returning `Ok` means
//! only that the transaction entered the pending pool; callers must not
//! treat a commitment as published until finality is confirmed.
//!
//! The trait is object-safe (`async_trait`) so the protocol can hold a
//! single shared `Arc<dyn LedgerGateway>` and tests can inject doubles.

use std::time::Duration;

use async_trait::async_trait;

use crate::call::{EntryFunctionCall, PendingHandle, TransactionHash, ViewFunctionCall};
use crate::error::LedgerError;

/// Submit, await, and read against a ledger.
#[async_trait]
pub trait LedgerGateway: Send + Sync + std::fmt::Debug {
    /// Short name for logs (e.g. `"aptos:testnet"`, `"memory"`).
    fn name(&self) -> &str;

    /// Sign and submit a state-changing call.
    ///
    /// Fails with [`LedgerError::Submission`] if the transaction does not
    /// reach the pending pool. Never retried by implementations.
    async fn submit_transaction(
        &self,
        call: &EntryFunctionCall,
    ) -> Result<PendingHandle, LedgerError>;

    /// Wait until the pending transaction is finalized, at most `timeout`.
    ///
    /// Fails with [`LedgerError::FinalityTimeout`] when the bound elapses
    /// (the submission is not cancelled) and [`LedgerError::Aborted`] when
    /// the transaction executed and failed.
    async fn await_finality(
        &self,
        handle: &PendingHandle,
        timeout: Duration,
    ) -> Result<TransactionHash, LedgerError>;

    /// Execute a read-only view function and return its result values.
    async fn call_read_only(
        &self,
        call: &ViewFunctionCall,
    ) -> Result<Vec<serde_json::Value>, LedgerError>;
}
