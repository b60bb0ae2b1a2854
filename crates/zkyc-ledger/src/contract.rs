//! # Commitment Contract
//!
//! Call builders and response decoders for the on-chain `ZKYCCommitment`
//! module:
//!
//! ```text
//! public entry fun publish_commitment(s: &signer, hash: vector<u8>, issuer_id: u64, validity_window: u64)
//! #[view] public fun verify(hash: vector<u8>): bool
//! #[view] public fun get_commitment(hash: vector<u8>): Commitment { issuer_id: u64, validity_window: u64 }
//! ```
//!
//! `publish_commitment` aborts with `E_COMMITMENT_EXISTS` when the key is
//! already present (write-once store).

use serde::{Deserialize, Serialize};
use zkyc_core::{Commitment, CommitmentId, IssuerId};

use crate::call::{EntryFunctionCall, FunctionId, MoveArg, ViewFunctionCall};
use crate::error::LedgerError;

/// Default module name.
pub const DEFAULT_MODULE_NAME: &str = "ZKYCCommitment";

/// Entry function that writes a commitment.
pub const PUBLISH_COMMITMENT: &str = "publish_commitment";

/// View function returning whether a commitment exists.
pub const VERIFY: &str = "verify";

/// View function returning a commitment's details.
pub const GET_COMMITMENT: &str = "get_commitment";

/// Abort name for a duplicate-key write.
pub const E_COMMITMENT_EXISTS: &str = "E_COMMITMENT_EXISTS";

/// Abort name for a detail lookup on a missing key.
pub const E_COMMITMENT_NOT_FOUND: &str = "E_COMMITMENT_NOT_FOUND";

/// Abort name for a signer that may not issue under the given issuer id.
pub const E_NOT_AUTHORIZED: &str = "E_NOT_AUTHORIZED";

/// VM-status fragments that identify a duplicate-key write.
const DUPLICATE_ABORT_MARKERS: [&str; 3] = [E_COMMITMENT_EXISTS, "ECOMMITMENT_EXISTS", "ALREADY_EXISTS"];

/// Address of a deployed commitment module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitmentContract {
    /// Account the module is published under.
    pub module_address: String,
    /// Module name (normally [`DEFAULT_MODULE_NAME`]).
    pub module_name: String,
}

impl CommitmentContract {
    /// Point at a module under `module_address` with the default name.
    pub fn new(module_address: impl Into<String>) -> Self {
        Self {
            module_address: module_address.into(),
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }

    /// Override the module name.
    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = module_name.into();
        self
    }

    /// Fully qualified id of a function in this module.
    pub fn function(&self, name: &str) -> FunctionId {
        FunctionId::new(&self.module_address, &self.module_name, name)
    }

    /// `publish_commitment(hash, issuer_id, validity_window)`.
    pub fn publish_commitment(
        &self,
        id: &CommitmentId,
        issuer_id: IssuerId,
        validity_window: u64,
    ) -> EntryFunctionCall {
        EntryFunctionCall {
            function: self.function(PUBLISH_COMMITMENT),
            type_arguments: Vec::new(),
            arguments: vec![
                MoveArg::Bytes(id.as_bytes().to_vec()),
                MoveArg::U64(issuer_id.get()),
                MoveArg::U64(validity_window),
            ],
        }
    }

    /// `verify(hash)`.
    pub fn verify(&self, id: &CommitmentId) -> ViewFunctionCall {
        self.view(VERIFY, id)
    }

    /// `get_commitment(hash)`.
    pub fn get_commitment(&self, id: &CommitmentId) -> ViewFunctionCall {
        self.view(GET_COMMITMENT, id)
    }

    fn view(&self, name: &str, id: &CommitmentId) -> ViewFunctionCall {
        ViewFunctionCall {
            function: self.function(name),
            type_arguments: Vec::new(),
            arguments: vec![MoveArg::Bytes(id.as_bytes().to_vec())],
        }
    }
}

/// Whether an aborted transaction was a duplicate-key write.
pub fn is_duplicate_abort(vm_status: &str) -> bool {
    DUPLICATE_ABORT_MARKERS
        .iter()
        .any(|marker| vm_status.contains(marker))
}

/// Decode the `verify` view result: a single boolean.
pub fn decode_exists(values: &[serde_json::Value]) -> Result<bool, LedgerError> {
    match values.first() {
        Some(serde_json::Value::Bool(b)) => Ok(*b),
        other => Err(LedgerError::Read(format!(
            "verify returned {other:?}, expected [bool]"
        ))),
    }
}

/// Decode the `get_commitment` view result.
///
/// Accepts the struct form `{ "issuer_id": "1", "validity_window": "..." }`
/// (u64 as string or number) and the tuple form `[issuer_id, validity_window]`.
pub fn decode_commitment(
    id: &CommitmentId,
    values: &[serde_json::Value],
) -> Result<Commitment, LedgerError> {
    let malformed = || LedgerError::Read(format!("get_commitment returned malformed value: {values:?}"));

    let (issuer, window) = match values {
        [serde_json::Value::Object(fields)] => (
            fields.get("issuer_id").ok_or_else(malformed)?,
            fields.get("validity_window").ok_or_else(malformed)?,
        ),
        [issuer, window] => (issuer, window),
        _ => return Err(malformed()),
    };

    Ok(Commitment {
        id: *id,
        issuer_id: decode_u64(issuer).ok_or_else(malformed)?,
        validity_window: decode_u64(window).ok_or_else(malformed)?,
    })
}

fn decode_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
