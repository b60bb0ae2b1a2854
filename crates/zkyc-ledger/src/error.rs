//! Ledger gateway error types.

use crate::call::TransactionHash;

/// Errors surfaced by a [`LedgerGateway`](crate::LedgerGateway).
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    /// The transaction never reached the pending pool (network, signing,
    /// or node-side admission failure).
    #[error("transaction submission failed: {0}")]
    Submission(String),

    /// Finality was not observed within the bound. The transaction may
    /// still finalize later.
    #[error("transaction {transaction_hash} not finalized within {timeout_ms}ms")]
    FinalityTimeout {
        /// Hash of the submitted transaction.
        transaction_hash: TransactionHash,
        /// The bound that elapsed.
        timeout_ms: u64,
    },

    /// The transaction was included but execution failed.
    #[error("transaction {transaction_hash} aborted: {vm_status}")]
    Aborted {
        /// Hash of the included transaction.
        transaction_hash: TransactionHash,
        /// VM status string reported by the ledger.
        vm_status: String,
    },

    /// A read-only call failed (transport, node error, or missing key).
    #[error("read-only call failed: {0}")]
    Read(String),
}

impl LedgerError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submission(_) => "SUBMISSION_FAILED",
            Self::FinalityTimeout { .. } => "FINALITY_TIMEOUT",
            Self::Aborted { .. } => "LEDGER_REJECTED",
            Self::Read(_) => "READ_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_hash_and_status() {
        let err = LedgerError::Aborted {
            transaction_hash: TransactionHash::new("0xabc"),
            vm_status: "Move abort: E_COMMITMENT_EXISTS".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("0xabc"));
        assert!(msg.contains("E_COMMITMENT_EXISTS"));
    }

    #[test]
    fn finality_timeout_display() {
        let err = LedgerError::FinalityTimeout {
            transaction_hash: TransactionHash::new("0xfeed"),
            timeout_ms: 250,
        };
        assert_eq!(err.to_string(), "transaction 0xfeed not finalized within 250ms");
        assert_eq!(err.kind(), "FINALITY_TIMEOUT");
    }
}
