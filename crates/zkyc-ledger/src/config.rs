//! Aptos gateway configuration.
//!
//! Points the gateway at a fullnode and a deployed commitment module, plus
//! the signing account the process issues from when it issues at all.
//! Verification needs no credential: a configuration without a
//! [`SignerConfig`] serves view calls and refuses submissions. Defaults
//! target the public testnet.

use ed25519_dalek::SigningKey;
use url::Url;
use zeroize::Zeroizing;

use crate::contract::{CommitmentContract, DEFAULT_MODULE_NAME};

/// Default fullnode REST endpoint.
pub const DEFAULT_NODE_URL: &str = "https://fullnode.testnet.aptoslabs.com";

/// The issuing account. Custom `Debug` redacts `private_key`.
#[derive(Clone)]
pub struct SignerConfig {
    /// Sender account address. Must correspond to `private_key`.
    pub account_address: String,
    /// Hex-encoded Ed25519 private key seed.
    pub private_key: Zeroizing<String>,
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("account_address", &self.account_address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl SignerConfig {
    /// Validate the address and key encoding.
    pub fn new(
        account_address: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let signer = Self {
            account_address: account_address.into(),
            private_key: Zeroizing::new(private_key.into()),
        };
        validate_address("account_address", &signer.account_address)?;
        signer.signing_key()?;
        Ok(signer)
    }

    /// Decode the signing key.
    ///
    /// Accepts a bare 64-digit hex seed, a `0x`-prefixed seed, or the
    /// `ed25519-priv-0x` form printed by the Aptos CLI.
    pub fn signing_key(&self) -> Result<SigningKey, ConfigError> {
        let raw = self.private_key.trim();
        let hex_part = raw
            .strip_prefix("ed25519-priv-0x")
            .or_else(|| raw.strip_prefix("0x"))
            .unwrap_or(raw);
        let mut seed = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(hex_part, seed.as_mut_slice())
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
        Ok(SigningKey::from_bytes(&seed))
    }
}

/// Configuration for [`AptosGateway`](crate::AptosGateway).
#[derive(Debug, Clone)]
pub struct AptosConfig {
    /// Fullnode REST base URL (without the `/v1` suffix).
    pub node_url: Url,
    /// Account the commitment module is published under.
    pub module_address: String,
    /// Module name. Default: `ZKYCCommitment`.
    pub module_name: String,
    /// Issuing account. `None` for a read-only gateway.
    pub signer: Option<SignerConfig>,
    /// Gas limit per transaction. Default: 10000.
    pub max_gas_amount: u64,
    /// Gas unit price in octas. Default: 100.
    pub gas_unit_price: u64,
    /// Seconds until a submitted transaction expires. Default: 60.
    pub expiration_secs: u64,
    /// HTTP request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
    /// Delay between finality polls in milliseconds. Default: 500.
    pub poll_interval_ms: u64,
}

impl AptosConfig {
    /// A configuration that can read the commitment module but not publish.
    pub fn read_only(
        node_url: Url,
        module_address: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            node_url,
            module_address: module_address.into(),
            module_name: DEFAULT_MODULE_NAME.to_string(),
            signer: None,
            max_gas_amount: 10_000,
            gas_unit_price: 100,
            expiration_secs: 60,
            timeout_secs: 30,
            poll_interval_ms: 500,
        };
        validate_address("module_address", &config.module_address)?;
        Ok(config)
    }

    /// A configuration that publishes as `account_address`.
    pub fn new(
        node_url: Url,
        module_address: impl Into<String>,
        account_address: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::read_only(node_url, module_address)?
            .with_signer(SignerConfig::new(account_address, private_key)?))
    }

    pub fn with_signer(mut self, signer: SignerConfig) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `APTOS_NODE_URL` (default: `https://fullnode.testnet.aptoslabs.com`)
    /// - `APTOS_MODULE_ADDRESS` (required)
    /// - `APTOS_ACCOUNT_ADDRESS` and `APTOS_PRIVATE_KEY` (both or neither;
    ///   without them the gateway is read-only)
    /// - `APTOS_MODULE_NAME` (default: `ZKYCCommitment`)
    /// - `APTOS_MAX_GAS_AMOUNT` (default: 10000)
    /// - `APTOS_GAS_UNIT_PRICE` (default: 100)
    /// - `APTOS_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::read_only(
            env_url("APTOS_NODE_URL", DEFAULT_NODE_URL)?,
            required("APTOS_MODULE_ADDRESS")?,
        )?;
        config.signer = match (
            std::env::var("APTOS_ACCOUNT_ADDRESS").ok(),
            std::env::var("APTOS_PRIVATE_KEY").ok(),
        ) {
            (Some(address), Some(key)) => Some(SignerConfig::new(address, key)?),
            (Some(_), None) => return Err(ConfigError::Missing("APTOS_PRIVATE_KEY")),
            (None, Some(_)) => return Err(ConfigError::Missing("APTOS_ACCOUNT_ADDRESS")),
            (None, None) => None,
        };
        if let Ok(name) = std::env::var("APTOS_MODULE_NAME") {
            config.module_name = name;
        }
        config.max_gas_amount = env_u64("APTOS_MAX_GAS_AMOUNT", config.max_gas_amount)?;
        config.gas_unit_price = env_u64("APTOS_GAS_UNIT_PRICE", config.gas_unit_price)?;
        config.timeout_secs = env_u64("APTOS_TIMEOUT_SECS", config.timeout_secs)?;
        Ok(config)
    }

    /// The commitment module this configuration points at.
    pub fn contract(&self) -> CommitmentContract {
        CommitmentContract::new(&self.module_address).with_module_name(&self.module_name)
    }
}

/// Aptos account addresses: `0x` followed by 1 to 64 hex digits.
fn validate_address(field: &'static str, address: &str) -> Result<(), ConfigError> {
    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| ConfigError::InvalidAddress(field, address.to_string()))?;
    if digits.is_empty() || digits.len() > 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidAddress(field, address.to_string()));
    }
    Ok(())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid Ed25519 private key: {0}")]
    InvalidPrivateKey(String),
    #[error("invalid Aptos address for {0}: {1:?}")]
    InvalidAddress(&'static str, String),
    #[error("{0} must be an unsigned integer, got {1:?}")]
    InvalidNumber(&'static str, String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
    #[error("unknown ledger {0:?} (expected \"aptos\" or \"memory\")")]
    UnknownLedger(String),
}
