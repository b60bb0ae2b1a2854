//! # Bootstrap
//!
//! Connects the configured ledger backend and assembles the application
//! state.

use std::sync::Arc;

use zkyc_commitment::CommitmentService;
use zkyc_core::SystemClock;
use zkyc_ledger::LedgerKind;

use crate::config::ApiConfig;
use crate::state::AppState;

/// Build application state from configuration.
pub fn bootstrap(config: &ApiConfig) -> Result<AppState, zkyc_ledger::ConfigError> {
    let (gateway, contract) = config.ledger.connect()?;
    if config.ledger == LedgerKind::Memory {
        tracing::warn!("using the in-memory ledger; commitments are not anchored and vanish on restart");
    }
    tracing::info!(
        ledger = gateway.name(),
        issuer_id = %config.service.policy.issuer_id,
        read_policy = ?config.service.verifier.policy,
        "commitment service configured"
    );
    let service = CommitmentService::new(gateway, contract, Arc::new(SystemClock), config.service);
    Ok(AppState::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_ledger_is_explicit_opt_in() {
        let config = ApiConfig {
            ledger: LedgerKind::Memory,
            ..ApiConfig::default()
        };
        let state = bootstrap(&config).unwrap();
        assert_eq!(state.service.ledger_name(), "memory");
        assert!(state.metrics.is_none());
    }

    #[test]
    fn default_config_fails_fast_without_aptos_settings() {
        std::env::remove_var("APTOS_MODULE_ADDRESS");
        let err = bootstrap(&ApiConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            zkyc_ledger::ConfigError::Missing("APTOS_MODULE_ADDRESS")
        ));
    }
}
