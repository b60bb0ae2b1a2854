//! # Validation Errors
//!
//! Local, immediate failures. A `ValidationError` is always produced before
//! any ledger interaction and never depends on network state.

use thiserror::Error;

/// Input rejected before it reaches the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The proof record is present but cannot be decoded.
    #[error("malformed proof record: {0}")]
    MalformedProof(String),

    /// The proof's verification outcome is false.
    #[error("proof verification failed (verify_result is false)")]
    ProofNotVerified,

    /// Issuer ids are positive integers.
    #[error("issuer id must be a positive integer, got {0}")]
    InvalidIssuerId(u64),

    /// The validity window is not strictly in the future.
    #[error("validity window {validity_window} is not after current time {now}")]
    ValidityWindowNotInFuture {
        /// Requested expiry, Unix seconds.
        validity_window: u64,
        /// Clock reading used for the comparison, Unix seconds.
        now: u64,
    },

    /// The commitment identifier text is not 32 bytes of hex.
    #[error("malformed commitment identifier: {0}")]
    MalformedIdentifier(String),
}
