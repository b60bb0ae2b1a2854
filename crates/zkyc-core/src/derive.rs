//! # Commitment Identifier Derivation
//!
//! Turns a [`ProofRecord`] into its 32-byte [`CommitmentId`].
//!
//! ## Wire Contract
//!
//! ```text
//! SHA-256( UTF-8( "{task}:{verify_timestamp}:{validator_address}:{data}" ) )
//! ```
//!
//! Field order and the `:` delimiter are fixed. Changing either changes
//! every future identifier and breaks compatibility with identifiers
//! already anchored on the ledger.
//!
//! ## Security Invariant
//!
//! `CanonicalProofInput` has a private inner field and a single
//! constructor, so the hashed bytes can only come from the fixed template.
//! `derive_commitment_id()` does not check `verify_outcome`; eligibility is
//! enforced by the caller via [`ProofRecord::ensure_eligible`].

use sha2::{Digest, Sha256};

use crate::commitment::{CommitmentId, COMMITMENT_ID_LEN};
use crate::proof::ProofRecord;

/// The canonical string hashed to produce a commitment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalProofInput(String);

impl CanonicalProofInput {
    /// Build the canonical input for a proof record.
    pub fn from_record(proof: &ProofRecord) -> Self {
        Self(format!(
            "{}:{}:{}:{}",
            proof.task, proof.result.verify_timestamp, proof.validator_address, proof.result.data
        ))
    }

    /// The canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes fed to the hash.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Compute the commitment identifier for canonical input.
pub fn sha256_commitment(input: &CanonicalProofInput) -> CommitmentId {
    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; COMMITMENT_ID_LEN];
    bytes.copy_from_slice(&hash);
    CommitmentId::from_bytes(bytes)
}

/// Derive the commitment identifier for a proof record.
///
/// Pure and deterministic: equal `(task, verify_timestamp,
/// validator_address, data)` tuples always yield equal identifiers.
pub fn derive_commitment_id(proof: &ProofRecord) -> CommitmentId {
    sha256_commitment(&CanonicalProofInput::from_record(proof))
}
