//! # Aptos REST Gateway
//!
//! Production ledger gateway that publishes commitments through an Aptos
//! fullnode's REST API.
//!
//! ## How It Works
//!
//! 1. `submit_transaction` reads the sender's sequence number
//!    (`GET /v1/accounts/{address}`), asks the node to BCS-encode the
//!    unsigned transaction (`POST /v1/transactions/encode_submission`),
//!    signs the returned message with the configured Ed25519 key, and
//!    submits the signed transaction (`POST /v1/transactions`).
//! 2. `await_finality` polls `GET /v1/transactions/by_hash/{hash}` until
//!    the transaction leaves the pending state, bounded by the caller's
//!    timeout. A committed transaction with `success: false` is reported
//!    as [`LedgerError::Aborted`] carrying the node's `vm_status`.
//! 3. `call_read_only` executes a view function (`POST /v1/view`).
//!
//! ## Retry Policy
//!
//! Account lookups, finality polls, and view calls retry transport errors
//! with exponential backoff. Encoding and submission are sent exactly once.
//!
//! ## Security
//!
//! - The signing key is decoded once at construction and never logged.
//! - The sender account must be funded for gas.
//! - A gateway built without a [`SignerConfig`](crate::SignerConfig) only
//!   reads. `submit_transaction` fails before any request is sent.

use std::time::Duration;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use reqwest::StatusCode;

use crate::call::{EntryFunctionCall, PendingHandle, TransactionHash, ViewFunctionCall};
use crate::config::{AptosConfig, ConfigError};
use crate::error::LedgerError;
use crate::gateway::LedgerGateway;
use crate::retry::retry_read;

/// Transaction `type` reported while a transaction is still in the mempool.
const PENDING_TRANSACTION: &str = "pending_transaction";

/// Issuing account with its decoded key.
struct Sender {
    address: String,
    key: SigningKey,
}

/// Aptos fullnode REST gateway.
pub struct AptosGateway {
    client: reqwest::Client,
    config: AptosConfig,
    sender: Option<Sender>,
    base_url: String,
    name: String,
}

impl std::fmt::Debug for AptosGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AptosGateway")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("read_only", &self.sender.is_none())
            .finish_non_exhaustive()
    }
}

impl AptosGateway {
    /// Create a gateway from configuration.
    pub fn new(config: AptosConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let sender = match &config.signer {
            Some(signer) => Some(Sender {
                address: signer.account_address.clone(),
                key: signer.signing_key()?,
            }),
            None => None,
        };
        let base_url = config.node_url.as_str().trim_end_matches('/').to_string();
        let name = format!("aptos:{}", config.node_url.host_str().unwrap_or("unknown"));

        Ok(Self {
            client,
            config,
            sender,
            base_url,
            name,
        })
    }

    /// The configuration this gateway was built from.
    pub fn config(&self) -> &AptosConfig {
        &self.config
    }

    /// Whether this gateway can submit transactions.
    pub fn can_submit(&self) -> bool {
        self.sender.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    async fn sequence_number(&self, sender: &Sender) -> Result<u64, LedgerError> {
        let url = self.url(&format!("accounts/{}", sender.address));
        let resp = retry_read("get_account", || self.client.get(&url).send())
            .await
            .map_err(|e| LedgerError::Submission(format!("account lookup failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(LedgerError::Submission(format!(
                "account lookup failed: {}",
                error_message(resp).await
            )));
        }

        let account: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LedgerError::Submission(format!("invalid account response: {e}")))?;
        account
            .get("sequence_number")
            .and_then(|s| s.as_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                LedgerError::Submission("account response missing sequence_number".into())
            })
    }

    fn unsigned_transaction(
        &self,
        sender: &Sender,
        sequence_number: u64,
        call: &EntryFunctionCall,
    ) -> serde_json::Value {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        serde_json::json!({
            "sender": sender.address,
            "sequence_number": sequence_number.to_string(),
            "max_gas_amount": self.config.max_gas_amount.to_string(),
            "gas_unit_price": self.config.gas_unit_price.to_string(),
            "expiration_timestamp_secs": (now + self.config.expiration_secs).to_string(),
            "payload": call.to_payload_json(),
        })
    }

    /// POST a JSON body once, mapping every failure to a submission error.
    async fn post_once(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, LedgerError> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| LedgerError::Submission(format!("{path}: {e}")))?;
        if !resp.status().is_success() {
            return Err(LedgerError::Submission(format!(
                "{path}: {}",
                error_message(resp).await
            )));
        }
        resp.json()
            .await
            .map_err(|e| LedgerError::Submission(format!("{path}: invalid JSON response: {e}")))
    }

    /// Fetch a transaction by hash. `None` while it is unknown or pending.
    async fn committed_transaction(
        &self,
        hash: &TransactionHash,
    ) -> Option<serde_json::Value> {
        let url = self.url(&format!("transactions/by_hash/{hash}"));
        let resp = match retry_read("get_transaction", || self.client.get(&url).send()).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(%hash, "finality poll failed: {e}");
                return None;
            }
        };

        if resp.status() == StatusCode::NOT_FOUND {
            return None;
        }
        if !resp.status().is_success() {
            tracing::warn!(%hash, "finality poll failed: {}", error_message(resp).await);
            return None;
        }

        let txn: serde_json::Value = match resp.json().await {
            Ok(txn) => txn,
            Err(e) => {
                tracing::warn!(%hash, "finality poll returned invalid JSON: {e}");
                return None;
            }
        };
        match txn.get("type").and_then(|t| t.as_str()) {
            Some(PENDING_TRANSACTION) | None => None,
            Some(_) => Some(txn),
        }
    }
}

/// Render a non-success response as `HTTP <status>: <message>`.
async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or(body);
    format!("HTTP {status}: {message}")
}

/// Sign the node-encoded message, returning the `signature` object.
fn sign(sender: &Sender, signing_message: &str) -> Result<serde_json::Value, LedgerError> {
    let message = hex::decode(signing_message.trim_start_matches("0x")).map_err(|e| {
        LedgerError::Submission(format!("encode_submission returned non-hex message: {e}"))
    })?;
    let signature = sender.key.sign(&message);
    Ok(serde_json::json!({
        "type": "ed25519_signature",
        "public_key": format!("0x{}", hex::encode(sender.key.verifying_key().as_bytes())),
        "signature": format!("0x{}", hex::encode(signature.to_bytes())),
    }))
}

#[async_trait]
impl LedgerGateway for AptosGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit_transaction(
        &self,
        call: &EntryFunctionCall,
    ) -> Result<PendingHandle, LedgerError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| LedgerError::Submission("no signing key configured".into()))?;
        let sequence_number = self.sequence_number(sender).await?;
        let mut transaction = self.unsigned_transaction(sender, sequence_number, call);

        let signing_message = self
            .post_once("transactions/encode_submission", &transaction)
            .await?;
        let signing_message = signing_message.as_str().ok_or_else(|| {
            LedgerError::Submission("encode_submission returned non-string result".into())
        })?;
        transaction["signature"] = sign(sender, signing_message)?;

        let submitted = self.post_once("transactions", &transaction).await?;
        let hash = submitted
            .get("hash")
            .and_then(|h| h.as_str())
            .ok_or_else(|| LedgerError::Submission("submission response missing hash".into()))?;

        tracing::info!(
            transaction_hash = hash,
            sequence_number,
            function = %call.function,
            "submitted transaction"
        );
        Ok(PendingHandle {
            transaction_hash: TransactionHash::new(hash),
        })
    }

    async fn await_finality(
        &self,
        handle: &PendingHandle,
        timeout: Duration,
    ) -> Result<TransactionHash, LedgerError> {
        let hash = &handle.transaction_hash;
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        let poll = async {
            loop {
                if let Some(txn) = self.committed_transaction(hash).await {
                    return txn;
                }
                tokio::time::sleep(interval).await;
            }
        };

        let txn = tokio::time::timeout(timeout, poll).await.map_err(|_| {
            LedgerError::FinalityTimeout {
                transaction_hash: hash.clone(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
        })?;

        let vm_status = txn
            .get("vm_status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown")
            .to_string();
        if txn.get("success").and_then(|s| s.as_bool()) == Some(true) {
            tracing::debug!(%hash, version = ?txn.get("version"), "transaction finalized");
            Ok(hash.clone())
        } else {
            Err(LedgerError::Aborted {
                transaction_hash: hash.clone(),
                vm_status,
            })
        }
    }

    async fn call_read_only(
        &self,
        call: &ViewFunctionCall,
    ) -> Result<Vec<serde_json::Value>, LedgerError> {
        let url = self.url("view");
        let body = call.to_request_json();
        let resp = retry_read("view", || self.client.post(&url).json(&body).send())
            .await
            .map_err(|e| LedgerError::Read(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(LedgerError::Read(error_message(resp).await));
        }
        resp.json()
            .await
            .map_err(|e| LedgerError::Read(format!("invalid view response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const KEY: &str = "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";

    fn gateway(node: &str) -> AptosGateway {
        let config = AptosConfig::new(Url::parse(node).unwrap(), "0x42", "0xa11ce", KEY).unwrap();
        AptosGateway::new(config).unwrap()
    }

    #[test]
    fn name_includes_host() {
        assert_eq!(gateway("https://fullnode.testnet.aptoslabs.com").name(), "aptos:fullnode.testnet.aptoslabs.com");
    }

    #[test]
    fn read_only_gateway_cannot_submit() {
        let config =
            AptosConfig::read_only(Url::parse("http://127.0.0.1:8080").unwrap(), "0x42").unwrap();
        let gw = AptosGateway::new(config).unwrap();
        assert!(!gw.can_submit());
        assert!(gateway("http://127.0.0.1:8080").can_submit());
    }

    #[test]
    fn url_joins_without_double_slash() {
        let gw = gateway("http://127.0.0.1:8080/");
        assert_eq!(gw.url("view"), "http://127.0.0.1:8080/v1/view");
    }

    #[test]
    fn debug_hides_key_material() {
        let rendered = format!("{:?}", gateway("http://127.0.0.1:8080"));
        assert!(!rendered.contains(KEY));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn unsigned_transaction_uses_string_encodings() {
        let gw = gateway("http://127.0.0.1:8080");
        let call = gw.config().contract().publish_commitment(
            &zkyc_core::CommitmentId::from_bytes([1; 32]),
            zkyc_core::IssuerId::new(1).unwrap(),
            5,
        );
        let txn = gw.unsigned_transaction(gw.sender.as_ref().unwrap(), 3, &call);
        assert_eq!(txn["sender"], "0xa11ce");
        assert_eq!(txn["sequence_number"], "3");
        assert_eq!(txn["max_gas_amount"], "10000");
        assert_eq!(txn["gas_unit_price"], "100");
        assert_eq!(txn["payload"]["type"], "entry_function_payload");
        assert!(txn["expiration_timestamp_secs"].as_str().unwrap().parse::<u64>().is_ok());
    }

    #[test]
    fn sign_rejects_non_hex_message() {
        let gw = gateway("http://127.0.0.1:8080");
        let sender = gw.sender.as_ref().unwrap();
        assert!(matches!(sign(sender, "0xnothex"), Err(LedgerError::Submission(_))));
        let sig = sign(sender, "0xdeadbeef").unwrap();
        assert_eq!(sig["type"], "ed25519_signature");
    }
}
