//! # Server Configuration
//!
//! Environment-driven settings for the `zkyc-api` binary.
//!
//! | Variable                     | Default     |
//! |------------------------------|-------------|
//! | `PORT`                       | `3000`      |
//! | `ZKYC_LEDGER`                | `aptos`     |
//! | `ZKYC_ISSUER_ID`             | `1`         |
//! | `ZKYC_VALIDITY_SECS`         | `31536000`  |
//! | `ZKYC_FINALITY_TIMEOUT_SECS` | `30`        |
//! | `ZKYC_READ_TIMEOUT_SECS`     | `5`         |
//! | `ZKYC_STRICT_READS`          | `false`     |
//!
//! The Aptos backend requires the `APTOS_*` variables read by
//! [`AptosConfig::from_env`](zkyc_ledger::AptosConfig::from_env), so an
//! unconfigured server refuses to start. `ZKYC_LEDGER=memory` opts into the
//! process-local ledger for development.

use std::time::Duration;

use zkyc_commitment::{IssuancePolicy, ReadFailurePolicy, ServiceConfig};
use zkyc_core::{IssuerId, ValidationError};
use zkyc_ledger::LedgerKind;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// TCP port to bind on all interfaces.
    pub port: u16,
    /// Ledger backend.
    pub ledger: LedgerKind,
    /// Issuer, verifier, and policy settings.
    pub service: ServiceConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            ledger: LedgerKind::Aptos,
            service: ServiceConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut service = defaults.service;

        let issuer_id = env_parse("ZKYC_ISSUER_ID", service.policy.issuer_id.get())?;
        let validity_secs = env_parse("ZKYC_VALIDITY_SECS", service.policy.validity_secs)?;
        if validity_secs == 0 {
            // now + 0 is never a future window.
            return Err(ConfigError::InvalidValue("ZKYC_VALIDITY_SECS", "0".into()));
        }
        service.policy = IssuancePolicy {
            issuer_id: IssuerId::new(issuer_id)?,
            validity_secs,
        };
        service.issuer.finality_timeout = Duration::from_secs(env_parse(
            "ZKYC_FINALITY_TIMEOUT_SECS",
            service.issuer.finality_timeout.as_secs(),
        )?);
        service.verifier.read_timeout = Duration::from_secs(env_parse(
            "ZKYC_READ_TIMEOUT_SECS",
            service.verifier.read_timeout.as_secs(),
        )?);
        if env_flag("ZKYC_STRICT_READS")? {
            service.verifier.policy = ReadFailurePolicy::Strict;
        }

        let ledger = match std::env::var("ZKYC_LEDGER") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.ledger,
        };

        Ok(Self {
            port: env_parse("PORT", defaults.port)?,
            ledger,
            service,
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var, raw)),
        Err(_) => Ok(default),
    }
}

fn env_flag(var: &'static str) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue(var, raw)),
        },
        Err(_) => Ok(false),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
    #[error(transparent)]
    InvalidIssuer(#[from] ValidationError),
    #[error(transparent)]
    Ledger(#[from] zkyc_ledger::ConfigError),
}
