//! # Commitment Issuer
//!
//! Publishes a commitment and returns only once the ledger has finalized it.
//!
//! ## Security Invariant
//!
//! An [`IssuanceReceipt`] is produced only for a transaction that finalized
//! successfully. A submission accepted into the pending pool is NOT a
//! receipt. When finality is not observed in time the caller gets
//! [`IssueError::FinalityTimeout`] with the pending hash and must re-query
//! through the verifier instead of re-submitting.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use zkyc_core::{Clock, CommitmentId, IssuerId, ValidationError};
use zkyc_ledger::contract::is_duplicate_abort;
use zkyc_ledger::{CommitmentContract, LedgerError, LedgerGateway, TransactionHash};

/// Default bound on waiting for finality.
pub const DEFAULT_FINALITY_TIMEOUT: Duration = Duration::from_secs(30);

/// Issuance failures.
#[derive(Error, Debug, Clone)]
pub enum IssueError {
    /// Parameters rejected locally, before any ledger call.
    #[error("invalid issuance parameters: {0}")]
    InvalidParameters(#[from] ValidationError),

    /// The transaction never reached the pending pool.
    #[error("submission failed: {0}")]
    SubmissionFailed(String),

    /// Finality was not observed in time. The outcome is unknown.
    #[error("transaction {transaction_hash} not finalized within {timeout_ms}ms")]
    FinalityTimeout {
        /// Hash of the pending transaction, for re-query.
        transaction_hash: TransactionHash,
        /// The bound that elapsed.
        timeout_ms: u64,
    },

    /// The identifier is already published. The end state already holds.
    #[error("commitment {commitment_id} already published")]
    DuplicateCommitment {
        /// The identifier that was re-issued.
        commitment_id: CommitmentId,
        /// Hash of the aborted transaction.
        transaction_hash: TransactionHash,
    },

    /// The transaction finalized but the contract refused it.
    #[error("ledger rejected transaction {transaction_hash}: {vm_status}")]
    Rejected {
        /// Hash of the aborted transaction.
        transaction_hash: TransactionHash,
        /// VM status reported by the ledger.
        vm_status: String,
    },
}

impl IssueError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameters(_) => "VALIDATION_ERROR",
            Self::SubmissionFailed(_) => "SUBMISSION_FAILED",
            Self::FinalityTimeout { .. } => "FINALITY_TIMEOUT",
            Self::DuplicateCommitment { .. } => "DUPLICATE_COMMITMENT",
            Self::Rejected { .. } => "LEDGER_REJECTED",
        }
    }

    fn from_finality(commitment_id: CommitmentId, err: LedgerError) -> Self {
        match err {
            LedgerError::FinalityTimeout {
                transaction_hash,
                timeout_ms,
            } => Self::FinalityTimeout {
                transaction_hash,
                timeout_ms,
            },
            LedgerError::Aborted {
                transaction_hash,
                vm_status,
            } if is_duplicate_abort(&vm_status) => Self::DuplicateCommitment {
                commitment_id,
                transaction_hash,
            },
            LedgerError::Aborted {
                transaction_hash,
                vm_status,
            } => Self::Rejected {
                transaction_hash,
                vm_status,
            },
            LedgerError::Submission(msg) | LedgerError::Read(msg) => Self::SubmissionFailed(msg),
        }
    }
}

/// Proof that a commitment was published and finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuanceReceipt {
    /// The published identifier.
    pub commitment_id: CommitmentId,
    /// Hash of the finalized transaction. Never empty.
    pub transaction_hash: TransactionHash,
    /// Issuing authority recorded on the ledger.
    pub issuer_id: IssuerId,
    /// Expiry recorded on the ledger, Unix seconds.
    pub validity_window: u64,
}

/// Issuer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuerConfig {
    /// Bound on [`LedgerGateway::await_finality`].
    pub finality_timeout: Duration,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            finality_timeout: DEFAULT_FINALITY_TIMEOUT,
        }
    }
}

/// Publishes commitments through a ledger gateway.
#[derive(Debug, Clone)]
pub struct CommitmentIssuer {
    gateway: Arc<dyn LedgerGateway>,
    contract: CommitmentContract,
    clock: Arc<dyn Clock>,
    config: IssuerConfig,
}

impl CommitmentIssuer {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        contract: CommitmentContract,
        clock: Arc<dyn Clock>,
        config: IssuerConfig,
    ) -> Self {
        Self {
            gateway,
            contract,
            clock,
            config,
        }
    }

    /// Validate, submit, and await finality of `publish_commitment`.
    ///
    /// `issuer_id` must be positive and `validity_window` strictly after the
    /// clock's current time; both are checked before the gateway is touched.
    pub async fn issue(
        &self,
        commitment_id: &CommitmentId,
        issuer_id: u64,
        validity_window: u64,
    ) -> Result<IssuanceReceipt, IssueError> {
        let issuer_id = IssuerId::new(issuer_id)?;
        let now = self.clock.now_unix();
        if validity_window <= now {
            return Err(ValidationError::ValidityWindowNotInFuture {
                validity_window,
                now,
            }
            .into());
        }

        let call = self
            .contract
            .publish_commitment(commitment_id, issuer_id, validity_window);

        let pending = self
            .gateway
            .submit_transaction(&call)
            .await
            .map_err(|e| {
                tracing::warn!(
                    %commitment_id,
                    %issuer_id,
                    ledger = self.gateway.name(),
                    "commitment submission failed: {e}"
                );
                match e {
                    LedgerError::Submission(msg) => IssueError::SubmissionFailed(msg),
                    other => IssueError::SubmissionFailed(other.to_string()),
                }
            })?;

        tracing::debug!(
            %commitment_id,
            transaction_hash = %pending.transaction_hash,
            "commitment submitted, awaiting finality"
        );

        let transaction_hash = self
            .gateway
            .await_finality(&pending, self.config.finality_timeout)
            .await
            .map_err(|e| {
                let err = IssueError::from_finality(*commitment_id, e);
                tracing::warn!(
                    %commitment_id,
                    transaction_hash = %pending.transaction_hash,
                    kind = err.kind(),
                    "commitment not published: {err}"
                );
                err
            })?;

        tracing::info!(
            %commitment_id,
            %transaction_hash,
            %issuer_id,
            validity_window,
            "commitment published"
        );

        Ok(IssuanceReceipt {
            commitment_id: *commitment_id,
            transaction_hash,
            issuer_id,
            validity_window,
        })
    }
}
