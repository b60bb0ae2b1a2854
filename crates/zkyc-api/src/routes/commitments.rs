//! # Commitment API
//!
//! | Method | Path                      | Operation                          |
//! |--------|---------------------------|------------------------------------|
//! | POST   | `/api/proof/commit`       | derive from a proof record, issue  |
//! | POST   | `/api/commitment`         | issue an already-derived hash      |
//! | GET    | `/api/commitment/{hash}`  | verify                             |
//!
//! Every success body carries `"success": true`; failures use the
//! [`AppError`] body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use zkyc_commitment::{CommitmentStatus, ProofCommitment, RawIssuance};
use zkyc_core::ValidationError;

use super::Success;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_path};
use crate::state::AppState;

/// `POST /api/commitment` request.
#[derive(Debug, Deserialize)]
pub struct PublishCommitmentRequest {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub issuer_id: Option<u64>,
    #[serde(default)]
    pub validity_window: Option<u64>,
}

impl PublishCommitmentRequest {
    /// Split into `(hash, issuer_id, validity_window)`, naming the first
    /// missing field.
    pub fn into_parts(self) -> Result<(String, u64, u64), ValidationError> {
        let hash = self
            .hash
            .filter(|h| !h.is_empty())
            .ok_or(ValidationError::MissingField("hash"))?;
        let issuer_id = self
            .issuer_id
            .ok_or(ValidationError::MissingField("issuer_id"))?;
        let validity_window = self
            .validity_window
            .ok_or(ValidationError::MissingField("validity_window"))?;
        Ok((hash, issuer_id, validity_window))
    }
}

/// Build the commitment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/proof/commit", post(commit_proof))
        .route("/api/commitment", post(publish_commitment))
        .route("/api/commitment/{hash}", get(verify_commitment))
}

/// POST /api/proof/commit — Derive the commitment from a proof record and publish it.
async fn commit_proof(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Success<ProofCommitment>>, AppError> {
    let document = extract_json(body)?;
    let committed = state.service.issue_from_document(document).await?;
    Ok(Json(Success::new(committed)))
}

/// POST /api/commitment — Publish an already-derived commitment hash.
async fn publish_commitment(
    State(state): State<AppState>,
    body: Result<Json<PublishCommitmentRequest>, JsonRejection>,
) -> Result<Json<Success<RawIssuance>>, AppError> {
    let (hash, issuer_id, validity_window) = extract_json(body)?.into_parts()?;
    let issued = state
        .service
        .issue_raw(&hash, issuer_id, validity_window)
        .await?;
    Ok(Json(Success::new(issued)))
}

/// GET /api/commitment/{hash} — Report whether a commitment is published.
async fn verify_commitment(
    State(state): State<AppState>,
    hash: Result<Path<String>, PathRejection>,
) -> Result<Json<Success<CommitmentStatus>>, AppError> {
    let hash = extract_path(hash)?;
    let status = state.service.verify(&hash).await?;
    Ok(Json(Success::new(status)))
}
