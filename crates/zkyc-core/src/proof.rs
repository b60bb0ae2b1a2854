//! # Proof Records
//!
//! The off-chain verification result that a commitment is issued for.
//! The contents are never sent to the ledger; only the derived
//! [`CommitmentId`](crate::CommitmentId) is.
//!
//! ## Wire Shape
//!
//! ```json
//! {
//!   "task": "kyc-check-1",
//!   "result": { "verify_timestamp": 1700000000, "data": "passed", "verify_result": true },
//!   "validatorAddress": "0xABCD"
//! }
//! ```
//!
//! `verifyTimestamp` and `verifyOutcome` are accepted as aliases.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Result block of a verification proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofResult {
    /// When verification was performed, Unix seconds.
    #[serde(alias = "verifyTimestamp")]
    pub verify_timestamp: u64,
    /// Opaque verifier payload.
    pub data: String,
    /// Whether the underlying proof verified. Absent means `false`.
    #[serde(rename = "verify_result", alias = "verifyOutcome", default)]
    pub verify_outcome: bool,
}

/// An off-chain verification proof eligible for commitment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    /// Identifier of the verification task performed.
    pub task: String,
    /// Verification outcome and payload.
    pub result: ProofResult,
    /// Entity that performed verification.
    pub validator_address: String,
}

/// Top-level fields that must be present (and non-null) in a proof document.
const REQUIRED_FIELDS: [&str; 3] = ["task", "result", "validatorAddress"];

impl ProofRecord {
    /// Decode a proof record from an untyped JSON document.
    ///
    /// Missing top-level fields are reported by name as
    /// [`ValidationError::MissingField`]; every other decoding problem is
    /// [`ValidationError::MalformedProof`]. Empty `task` or
    /// `validatorAddress` strings count as missing.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::MalformedProof("expected a JSON object".into()))?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None | Some(serde_json::Value::Null) => {
                    return Err(ValidationError::MissingField(field))
                }
                Some(_) => {}
            }
        }

        let record: Self = serde_json::from_value(value)
            .map_err(|e| ValidationError::MalformedProof(e.to_string()))?;
        record.ensure_complete()?;
        Ok(record)
    }

    /// Check that the identifying string fields are non-empty.
    pub fn ensure_complete(&self) -> Result<(), ValidationError> {
        if self.task.is_empty() {
            return Err(ValidationError::MissingField("task"));
        }
        if self.validator_address.is_empty() {
            return Err(ValidationError::MissingField("validatorAddress"));
        }
        Ok(())
    }

    /// Check that the record may be committed at all.
    ///
    /// A record is eligible when it is complete and its verification outcome
    /// is `true`. Callers run this before derivation; the derivation itself
    /// does not re-check.
    pub fn ensure_eligible(&self) -> Result<(), ValidationError> {
        self.ensure_complete()?;
        if !self.result.verify_outcome {
            return Err(ValidationError::ProofNotVerified);
        }
        Ok(())
    }
}
