//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps service failures to HTTP status codes with a stable error code:
//!
//! | Code                   | Status |
//! |------------------------|--------|
//! | `VALIDATION_ERROR`     | 400    |
//! | `DUPLICATE_COMMITMENT` | 409    |
//! | `LEDGER_REJECTED`      | 422    |
//! | `SUBMISSION_FAILED`    | 502    |
//! | `READ_FAILED`          | 502    |
//! | `FINALITY_TIMEOUT`     | 504    |
//! | `INTERNAL_ERROR`       | 500    |
//!
//! Internal error details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zkyc_commitment::{IssueError, ServiceError, VerifyError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request input rejected (400).
    #[error("{0}")]
    Validation(String),

    /// Commitment already published (409).
    #[error("{0}")]
    Duplicate(String),

    /// Ledger contract refused the transaction (422).
    #[error("{0}")]
    Rejected(String),

    /// Transaction never reached the ledger (502).
    #[error("{0}")]
    SubmissionFailed(String),

    /// Ledger could not be read (502).
    #[error("{0}")]
    ReadFailed(String),

    /// Finality not observed in time; outcome unknown (504).
    #[error("{0}")]
    FinalityTimeout(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Duplicate(_) => (StatusCode::CONFLICT, "DUPLICATE_COMMITMENT"),
            Self::Rejected(_) => (StatusCode::UNPROCESSABLE_ENTITY, "LEDGER_REJECTED"),
            Self::SubmissionFailed(_) => (StatusCode::BAD_GATEWAY, "SUBMISSION_FAILED"),
            Self::ReadFailed(_) => (StatusCode::BAD_GATEWAY, "READ_FAILED"),
            Self::FinalityTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "FINALITY_TIMEOUT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        } else if status.is_server_error() {
            tracing::warn!(code, "{message}");
        }

        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Turn a handler panic into the structured 500 body.
///
/// Installed through `CatchPanicLayer::custom` in [`app`](crate::app).
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "non-string panic payload".to_string());
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Validation(_) | ServiceError::Issue(IssueError::InvalidParameters(_)) => {
                Self::Validation(message)
            }
            ServiceError::Issue(IssueError::SubmissionFailed(_)) => Self::SubmissionFailed(message),
            ServiceError::Issue(IssueError::FinalityTimeout { .. }) => {
                Self::FinalityTimeout(message)
            }
            ServiceError::Issue(IssueError::DuplicateCommitment { .. }) => Self::Duplicate(message),
            ServiceError::Issue(IssueError::Rejected { .. }) => Self::Rejected(message),
            ServiceError::Verify(VerifyError::ReadFailed { .. }) => Self::ReadFailed(message),
        }
    }
}

impl From<zkyc_core::ValidationError> for AppError {
    fn from(err: zkyc_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkyc_ledger::TransactionHash;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn service_errors_map_to_documented_statuses() {
        let hash = TransactionHash::new("0xabc");
        assert_eq!(
            status_of(zkyc_core::ValidationError::ProofNotVerified.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(IssueError::SubmissionFailed("down".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(
                IssueError::FinalityTimeout {
                    transaction_hash: hash.clone(),
                    timeout_ms: 1
                }
                .into()
            ),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(
                IssueError::DuplicateCommitment {
                    commitment_id: zkyc_core::CommitmentId::from_bytes([0; 32]),
                    transaction_hash: hash.clone(),
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(
                IssueError::Rejected {
                    transaction_hash: hash,
                    vm_status: "E_NOT_AUTHORIZED".into()
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn internal_error_hides_message() {
        let err = AppError::Internal("secret detail".into());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn panic_payload_is_hidden_behind_internal_error() {
        use http_body_util::BodyExt;

        let response = panic_response(Box::new("ledger handle poisoned"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("poisoned"));
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: "VALIDATION_ERROR".into(),
                message: "missing required field: task".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "success": false,
                "error": {"code": "VALIDATION_ERROR", "message": "missing required field: task"}
            })
        );
    }
}
