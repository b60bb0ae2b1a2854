//! Backend selection for binaries.
//!
//! Maps `aptos` / `memory` to a connected gateway and the contract it hosts.

use std::sync::Arc;

use crate::aptos::AptosGateway;
use crate::config::{AptosConfig, ConfigError};
use crate::contract::CommitmentContract;
use crate::gateway::LedgerGateway;
use crate::memory::InMemoryLedger;

/// Which ledger backend to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    /// Aptos fullnode, configured from `APTOS_*` environment variables.
    /// Read-only when no signing account is configured.
    Aptos,
    /// Process-local [`InMemoryLedger`]. Nothing outlives the process.
    Memory,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aptos => "aptos",
            Self::Memory => "memory",
        }
    }

    /// Build the gateway for this backend.
    pub fn connect(self) -> Result<(Arc<dyn LedgerGateway>, CommitmentContract), ConfigError> {
        match self {
            Self::Memory => {
                let ledger = InMemoryLedger::default();
                let contract = ledger.contract().clone();
                Ok((Arc::new(ledger), contract))
            }
            Self::Aptos => {
                let config = AptosConfig::from_env()?;
                let contract = config.contract();
                let sender = config
                    .signer
                    .as_ref()
                    .map_or("none", |s| s.account_address.as_str());
                tracing::info!(
                    node = %config.node_url,
                    module_address = %contract.module_address,
                    module_name = %contract.module_name,
                    sender,
                    "connecting to Aptos"
                );
                if config.signer.is_none() {
                    tracing::warn!("no APTOS_PRIVATE_KEY configured; ledger is read-only");
                }
                Ok((Arc::new(AptosGateway::new(config)?), contract))
            }
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LedgerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aptos" => Ok(Self::Aptos),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownLedger(s.to_string())),
        }
    }
}
