//! # Call Types
//!
//! Ledger-agnostic descriptions of entry-function (state-changing) and
//! view-function (read-only) calls, and the handles returned while a
//! transaction is in flight.
//!
//! Arguments use the Aptos JSON encoding: `vector<u8>` as a `0x`-prefixed
//! hex string and `u64` as a decimal string.

use serde::{Deserialize, Serialize};

/// Fully qualified Move function: `address::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionId {
    /// Account address that published the module.
    pub module_address: String,
    /// Module name.
    pub module_name: String,
    /// Function name.
    pub function: String,
}

impl FunctionId {
    /// Build a function id.
    pub fn new(
        module_address: impl Into<String>,
        module_name: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self {
            module_address: module_address.into(),
            module_name: module_name.into(),
            function: function.into(),
        }
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}::{}", self.module_address, self.module_name, self.function)
    }
}

/// A Move call argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MoveArg {
    /// `vector<u8>`.
    Bytes(Vec<u8>),
    /// `u64`.
    U64(u64),
}

impl MoveArg {
    /// JSON encoding accepted by the Aptos REST API.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bytes(bytes) => serde_json::Value::String(format!("0x{}", hex::encode(bytes))),
            Self::U64(n) => serde_json::Value::String(n.to_string()),
        }
    }

    /// The bytes, if this is a `vector<u8>` argument.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::U64(_) => None,
        }
    }

    /// The integer, if this is a `u64` argument.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(n) => Some(*n),
            Self::Bytes(_) => None,
        }
    }
}

/// A state-changing entry-function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunctionCall {
    /// Target function.
    pub function: FunctionId,
    /// Generic type arguments (always empty for the commitment module).
    pub type_arguments: Vec<String>,
    /// Positional arguments.
    pub arguments: Vec<MoveArg>,
}

/// A read-only view-function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFunctionCall {
    /// Target function.
    pub function: FunctionId,
    /// Generic type arguments (always empty for the commitment module).
    pub type_arguments: Vec<String>,
    /// Positional arguments.
    pub arguments: Vec<MoveArg>,
}

/// Aptos-style JSON payload shared by both call kinds.
fn payload_json(function: &FunctionId, type_arguments: &[String], arguments: &[MoveArg]) -> serde_json::Value {
    serde_json::json!({
        "function": function.to_string(),
        "type_arguments": type_arguments,
        "arguments": arguments.iter().map(MoveArg::to_json).collect::<Vec<_>>(),
    })
}

impl EntryFunctionCall {
    /// `entry_function_payload` JSON for transaction submission.
    pub fn to_payload_json(&self) -> serde_json::Value {
        let mut payload = payload_json(&self.function, &self.type_arguments, &self.arguments);
        payload["type"] = serde_json::Value::String("entry_function_payload".into());
        payload
    }
}

impl ViewFunctionCall {
    /// Request body for `POST /v1/view`.
    pub fn to_request_json(&self) -> serde_json::Value {
        payload_json(&self.function, &self.type_arguments, &self.arguments)
    }
}

/// Opaque transaction hash returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(String);

impl TransactionHash {
    /// Wrap a hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the hash string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transaction accepted into the pending pool but not yet finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingHandle {
    /// Hash of the submitted transaction.
    pub transaction_hash: TransactionHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_id_display() {
        let f = FunctionId::new("0x42", "ZKYCCommitment", "verify");
        assert_eq!(f.to_string(), "0x42::ZKYCCommitment::verify");
    }

    #[test]
    fn move_args_use_string_encodings() {
        assert_eq!(MoveArg::Bytes(vec![0xde, 0xad]).to_json(), serde_json::json!("0xdead"));
        assert_eq!(MoveArg::U64(1_731_536_000).to_json(), serde_json::json!("1731536000"));
    }

    #[test]
    fn entry_payload_shape() {
        let call = EntryFunctionCall {
            function: FunctionId::new("0x1", "M", "f"),
            type_arguments: vec![],
            arguments: vec![MoveArg::U64(7)],
        };
        assert_eq!(
            call.to_payload_json(),
            serde_json::json!({
                "type": "entry_function_payload",
                "function": "0x1::M::f",
                "type_arguments": [],
                "arguments": ["7"],
            })
        );
    }

    #[test]
    fn view_request_has_no_type_tag() {
        let call = ViewFunctionCall {
            function: FunctionId::new("0x1", "M", "v"),
            type_arguments: vec![],
            arguments: vec![MoveArg::Bytes(vec![1])],
        };
        let body = call.to_request_json();
        assert!(body.get("type").is_none());
        assert_eq!(body["arguments"], serde_json::json!(["0x01"]));
    }

    #[test]
    fn transaction_hash_is_transparent_in_json() {
        let h = TransactionHash::new("0xabc");
        assert_eq!(serde_json::to_string(&h).unwrap(), "\"0xabc\"");
    }
}
