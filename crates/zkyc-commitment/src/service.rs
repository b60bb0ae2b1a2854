//! # Commitment Service
//!
//! The caller-facing contract shared by the HTTP surface and the CLI.
//! Accepts proof records and textual identifiers, applies the issuance
//! policy, and returns wire-ready response payloads.
//!
//! | Operation            | Input                                   | Output                |
//! |----------------------|-----------------------------------------|-----------------------|
//! | `issue_from_proof`   | [`ProofRecord`]                          | [`ProofCommitment`]   |
//! | `issue_raw`          | hex id, issuer id, validity window      | [`RawIssuance`]       |
//! | `verify`             | hex id                                  | [`CommitmentStatus`]  |

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkyc_core::{derive_commitment_id, Clock, CommitmentId, IssuerId, ProofRecord, ValidationError};
use zkyc_ledger::{CommitmentContract, LedgerGateway, TransactionHash};

use crate::issuer::{CommitmentIssuer, IssueError, IssuerConfig};
use crate::verifier::{CommitmentVerifier, VerifierConfig, VerifyError};

/// 365 days.
pub const DEFAULT_VALIDITY_SECS: u64 = 365 * 24 * 60 * 60;

/// Issuer and expiry applied to commitments derived from proof records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuancePolicy {
    /// Issuing authority recorded on every proof commitment.
    pub issuer_id: IssuerId,
    /// Lifetime of a proof commitment, seconds from issuance.
    pub validity_secs: u64,
}

impl IssuancePolicy {
    /// Expiry for a commitment issued at `now`.
    pub fn validity_window(&self, now: u64) -> u64 {
        now.saturating_add(self.validity_secs)
    }
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            issuer_id: IssuerId::DEFAULT,
            validity_secs: DEFAULT_VALIDITY_SECS,
        }
    }
}

/// Service construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub issuer: IssuerConfig,
    pub verifier: VerifierConfig,
    pub policy: IssuancePolicy,
}

/// Any failure of a service operation.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Issue(#[from] IssueError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

impl ServiceError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Issue(e) => e.kind(),
            Self::Verify(e) => e.kind(),
        }
    }
}

/// Response to `issue_from_proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofCommitment {
    /// Derived identifier, `0x`-prefixed hex.
    pub commitment_hash: String,
    pub transaction_hash: TransactionHash,
    #[serde(rename = "issuer_id")]
    pub issuer_id: u64,
    #[serde(rename = "validity_window")]
    pub validity_window: u64,
}

/// Response to `issue_raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssuance {
    pub transaction_hash: TransactionHash,
}

/// Ledger-resident details of a published commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentDetails {
    pub issuer_id: u64,
    pub validity_window: u64,
}

/// Response to `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentStatus {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<CommitmentDetails>,
}

/// Check eligibility and derive the identifier for a proof record.
///
/// Purely local. Fails with [`ValidationError::ProofNotVerified`] when the
/// proof's outcome is false.
pub fn derive_eligible(proof: &ProofRecord) -> Result<CommitmentId, ValidationError> {
    proof.ensure_eligible()?;
    Ok(derive_commitment_id(proof))
}

/// Issuer, verifier, and issuance policy over one shared gateway.
#[derive(Debug, Clone)]
pub struct CommitmentService {
    gateway: Arc<dyn LedgerGateway>,
    issuer: CommitmentIssuer,
    verifier: CommitmentVerifier,
    clock: Arc<dyn Clock>,
    policy: IssuancePolicy,
}

impl CommitmentService {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        contract: CommitmentContract,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        let issuer = CommitmentIssuer::new(
            gateway.clone(),
            contract.clone(),
            clock.clone(),
            config.issuer,
        );
        let verifier = CommitmentVerifier::new(gateway.clone(), contract, config.verifier);
        Self {
            gateway,
            issuer,
            verifier,
            clock,
            policy: config.policy,
        }
    }

    /// Name of the underlying ledger gateway.
    pub fn ledger_name(&self) -> &str {
        self.gateway.name()
    }

    pub fn issuer(&self) -> &CommitmentIssuer {
        &self.issuer
    }

    pub fn verifier(&self) -> &CommitmentVerifier {
        &self.verifier
    }

    pub fn policy(&self) -> &IssuancePolicy {
        &self.policy
    }

    /// Derive, then issue under the service's [`IssuancePolicy`].
    ///
    /// Ineligible proofs are rejected before the gateway is touched.
    pub async fn issue_from_proof(
        &self,
        proof: &ProofRecord,
    ) -> Result<ProofCommitment, ServiceError> {
        let commitment_id = derive_eligible(proof)?;
        let validity_window = self.policy.validity_window(self.clock.now_unix());
        let receipt = self
            .issuer
            .issue(&commitment_id, self.policy.issuer_id.get(), validity_window)
            .await?;

        Ok(ProofCommitment {
            commitment_hash: receipt.commitment_id.to_prefixed_hex(),
            transaction_hash: receipt.transaction_hash,
            issuer_id: receipt.issuer_id.get(),
            validity_window: receipt.validity_window,
        })
    }

    /// Decode an untyped proof document, then [`issue_from_proof`](Self::issue_from_proof).
    pub async fn issue_from_document(
        &self,
        document: serde_json::Value,
    ) -> Result<ProofCommitment, ServiceError> {
        let proof = ProofRecord::from_value(document)?;
        self.issue_from_proof(&proof).await
    }

    /// Issue a commitment for an already-derived identifier.
    pub async fn issue_raw(
        &self,
        hash: &str,
        issuer_id: u64,
        validity_window: u64,
    ) -> Result<RawIssuance, ServiceError> {
        let commitment_id = CommitmentId::from_hex(hash)?;
        let receipt = self
            .issuer
            .issue(&commitment_id, issuer_id, validity_window)
            .await?;
        Ok(RawIssuance {
            transaction_hash: receipt.transaction_hash,
        })
    }

    /// Look up a commitment by textual identifier.
    pub async fn verify(&self, hash: &str) -> Result<CommitmentStatus, ServiceError> {
        let commitment_id = CommitmentId::from_hex(hash)?;
        let result = self.verifier.verify(&commitment_id).await?;
        Ok(CommitmentStatus {
            exists: result.exists,
            commitment: result.commitment.map(|c| CommitmentDetails {
                issuer_id: c.issuer_id,
                validity_window: c.validity_window,
            }),
        })
    }
}
