//! # API Route Modules
//!
//! - `commitments`: proof commitment, raw issuance, and verification.
//! - `status`: service status and the Prometheus scrape endpoint.

pub mod commitments;
pub mod status;

use serde::Serialize;

/// Success envelope: `{ "success": true, ...body }`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}
