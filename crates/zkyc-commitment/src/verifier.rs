//! # Commitment Verifier
//!
//! Answers whether a commitment exists and, if so, under which issuer and
//! expiry.
//!
//! ## Security Invariant
//!
//! `exists: true` is reported only when the ledger's `verify` view returned
//! `true` AND the `get_commitment` detail fetch succeeded. There is no
//! partial success. Under [`ReadFailurePolicy::Conservative`] every read
//! failure collapses to `exists: false`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use zkyc_core::{Commitment, CommitmentId};
use zkyc_ledger::contract::{decode_commitment, decode_exists};
use zkyc_ledger::{CommitmentContract, LedgerError, LedgerGateway, ViewFunctionCall};

/// Default bound on each read-only call.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// What to do when the ledger cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadFailurePolicy {
    /// Report `exists: false` and log at `warn`.
    #[default]
    Conservative,
    /// Return [`VerifyError::ReadFailed`].
    Strict,
}

/// Verifier tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Bound on each view call.
    pub read_timeout: Duration,
    /// Read failure handling.
    pub policy: ReadFailurePolicy,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            policy: ReadFailurePolicy::default(),
        }
    }
}

/// Verification failures. Only produced under [`ReadFailurePolicy::Strict`].
#[derive(Error, Debug, Clone)]
pub enum VerifyError {
    #[error("could not read commitment {commitment_id}: {reason}")]
    ReadFailed {
        commitment_id: CommitmentId,
        reason: String,
    },
}

impl VerifyError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReadFailed { .. } => "READ_FAILED",
        }
    }
}

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Whether the commitment is published.
    pub exists: bool,
    /// Ledger-resident details. `Some` exactly when `exists`.
    pub commitment: Option<Commitment>,
}

impl VerificationResult {
    /// No commitment (or unreadable, under the conservative policy).
    pub fn absent() -> Self {
        Self {
            exists: false,
            commitment: None,
        }
    }

    /// A published commitment.
    pub fn published(commitment: Commitment) -> Self {
        Self {
            exists: true,
            commitment: Some(commitment),
        }
    }
}

/// Reads commitments through a ledger gateway.
#[derive(Debug, Clone)]
pub struct CommitmentVerifier {
    gateway: Arc<dyn LedgerGateway>,
    contract: CommitmentContract,
    config: VerifierConfig,
}

impl CommitmentVerifier {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        contract: CommitmentContract,
        config: VerifierConfig,
    ) -> Self {
        Self {
            gateway,
            contract,
            config,
        }
    }

    /// The active read failure policy.
    pub fn policy(&self) -> ReadFailurePolicy {
        self.config.policy
    }

    /// Check existence, then fetch details.
    ///
    /// The raw `validity_window` is returned; expiry is the caller's call.
    pub async fn verify(
        &self,
        commitment_id: &CommitmentId,
    ) -> Result<VerificationResult, VerifyError> {
        match self.read(commitment_id).await {
            Ok(result) => {
                tracing::debug!(%commitment_id, exists = result.exists, "commitment verified");
                Ok(result)
            }
            Err(e) => match self.config.policy {
                ReadFailurePolicy::Conservative => {
                    tracing::warn!(
                        %commitment_id,
                        ledger = self.gateway.name(),
                        "commitment read failed, reporting absent: {e}"
                    );
                    Ok(VerificationResult::absent())
                }
                ReadFailurePolicy::Strict => Err(VerifyError::ReadFailed {
                    commitment_id: *commitment_id,
                    reason: e.to_string(),
                }),
            },
        }
    }

    async fn read(&self, commitment_id: &CommitmentId) -> Result<VerificationResult, LedgerError> {
        let values = self.view(&self.contract.verify(commitment_id)).await?;
        if !decode_exists(&values)? {
            return Ok(VerificationResult::absent());
        }

        let values = self.view(&self.contract.get_commitment(commitment_id)).await?;
        let commitment = decode_commitment(commitment_id, &values)?;
        Ok(VerificationResult::published(commitment))
    }

    async fn view(&self, call: &ViewFunctionCall) -> Result<Vec<serde_json::Value>, LedgerError> {
        tokio::time::timeout(self.config.read_timeout, self.gateway.call_read_only(call))
            .await
            .map_err(|_| {
                LedgerError::Read(format!(
                    "{} timed out after {}ms",
                    call.function,
                    self.config.read_timeout.as_millis()
                ))
            })?
    }
}
