//! # zkyc-core — Foundational Types for the zKYC Commitment Stack
//!
//! Defines the data model shared by every other crate in the workspace:
//! the off-chain [`ProofRecord`], the 32-byte [`CommitmentId`] anchored on
//! the ledger, the ledger-resident [`Commitment`], and the pure derivation
//! function that turns the former into the latter.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for protocol primitives.** `CommitmentId` and
//!    `IssuerId` are newtypes with validated constructors. No bare byte
//!    vectors or integers cross a crate boundary.
//!
//! 2. **`CanonicalProofInput` newtype.** ALL identifier derivation flows
//!    through `CanonicalProofInput::from_record()`. The field order and the
//!    `:` delimiter are wire contract; nothing else can build the bytes that
//!    get hashed.
//!
//! 3. **Injected time.** Every "is this in the future" check goes through the
//!    [`Clock`] trait so tests can pin the current instant.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkyc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod commitment;
pub mod derive;
pub mod error;
pub mod proof;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use commitment::{Commitment, CommitmentId, IssuerId, COMMITMENT_ID_LEN};
pub use derive::{derive_commitment_id, sha256_commitment, CanonicalProofInput};
pub use error::ValidationError;
pub use proof::{ProofRecord, ProofResult};
pub use temporal::{Clock, FixedClock, SystemClock};
