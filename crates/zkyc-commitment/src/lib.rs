//! # zkyc-commitment — Issuance & Verification Protocol
//!
//! Anchors proof commitments on a ledger and answers "does this commitment
//! exist, and under which issuer and expiry" with no false positives.
//!
//! ## Components
//!
//! - [`CommitmentIssuer`]: validate parameters → submit `publish_commitment`
//!   → await finality → [`IssuanceReceipt`].
//! - [`CommitmentVerifier`]: `verify` view → `get_commitment` view →
//!   [`VerificationResult`], degrading per [`ReadFailurePolicy`].
//! - [`CommitmentService`]: the caller-facing contract used by the HTTP
//!   surface and the CLI. Derives identifiers from proof records and applies
//!   the [`IssuancePolicy`].
//!
//! ## Lifecycle
//!
//! ```text
//! absent ──submit──▶ pending ──finality──▶ published
//!                        │
//!                        └──timeout──▶ unknown (re-query, never re-submit)
//! ```
//!
//! Expiry is not a ledger state. Callers compare
//! [`Commitment::is_expired_at`](zkyc_core::Commitment::is_expired_at)
//! against their own clock.
//!
//! ## Crate Policy
//!
//! - Ledger access only through `Arc<dyn LedgerGateway>`.
//! - Issuance errors are never retried here.

pub mod issuer;
pub mod service;
pub mod verifier;

pub use issuer::{CommitmentIssuer, IssuanceReceipt, IssueError, IssuerConfig};
pub use service::{
    derive_eligible, CommitmentDetails, CommitmentService, CommitmentStatus, IssuancePolicy,
    ProofCommitment, RawIssuance, ServiceConfig, ServiceError,
};
pub use verifier::{
    CommitmentVerifier, ReadFailurePolicy, VerificationResult, VerifierConfig, VerifyError,
};
