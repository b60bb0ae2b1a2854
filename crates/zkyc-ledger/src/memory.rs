//! # In-Memory Ledger
//!
//! An in-process simulation of the `ZKYCCommitment` module for tests and
//! dry runs. Behaves like the on-chain contract:
//!
//! - Submission queues a pending transaction and returns its hash.
//! - Finality executes it. `publish_commitment` inserts write-once; an
//!   existing key aborts with `E_COMMITMENT_EXISTS`.
//! - `verify` returns `[bool]`; `get_commitment` aborts on a missing key.
//!
//! ## Warning
//!
//! Provides NO durability or consensus. Suitable only for development,
//! testing, and local dry runs.
//!
//! Faults can be injected (failed submissions, failed reads, withheld
//! finality) to exercise the protocol's error paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use zkyc_core::{Commitment, CommitmentId, COMMITMENT_ID_LEN};

use crate::call::{EntryFunctionCall, MoveArg, PendingHandle, TransactionHash, ViewFunctionCall};
use crate::contract::{
    CommitmentContract, E_COMMITMENT_EXISTS, E_COMMITMENT_NOT_FOUND, E_NOT_AUTHORIZED,
    GET_COMMITMENT, PUBLISH_COMMITMENT, VERIFY,
};
use crate::error::LedgerError;
use crate::gateway::LedgerGateway;

#[derive(Debug, Default)]
struct Faults {
    fail_submissions: AtomicBool,
    fail_reads: AtomicBool,
    withhold_finality: AtomicBool,
}

/// Module address hosted by [`InMemoryLedger::default`].
pub const LOCAL_MODULE_ADDRESS: &str = "0x1";

/// In-process commitment ledger.
#[derive(Debug)]
pub struct InMemoryLedger {
    contract: CommitmentContract,
    authorized_issuers: Option<HashSet<u64>>,
    commitments: DashMap<CommitmentId, Commitment>,
    pending: DashMap<String, EntryFunctionCall>,
    finalized: DashMap<String, Result<(), String>>,
    next_sequence: AtomicU64,
    submit_calls: AtomicU64,
    read_calls: AtomicU64,
    faults: Faults,
}

impl InMemoryLedger {
    /// Create an empty ledger hosting `contract`.
    pub fn new(contract: CommitmentContract) -> Self {
        Self {
            contract,
            authorized_issuers: None,
            commitments: DashMap::new(),
            pending: DashMap::new(),
            finalized: DashMap::new(),
            next_sequence: AtomicU64::new(0),
            submit_calls: AtomicU64::new(0),
            read_calls: AtomicU64::new(0),
            faults: Faults::default(),
        }
    }

    /// Only allow publication under the given issuer ids.
    pub fn with_authorized_issuers(mut self, issuers: impl IntoIterator<Item = u64>) -> Self {
        self.authorized_issuers = Some(issuers.into_iter().collect());
        self
    }

    /// The hosted contract.
    pub fn contract(&self) -> &CommitmentContract {
        &self.contract
    }

    /// Read a stored commitment directly, bypassing the view path.
    pub fn commitment(&self, id: &CommitmentId) -> Option<Commitment> {
        self.commitments.get(id).map(|c| c.value().clone())
    }

    /// Number of published commitments.
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    /// Whether no commitment has been published.
    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    /// Transactions submitted but not yet finalized.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of `submit_transaction` calls received.
    pub fn submit_count(&self) -> u64 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Number of `call_read_only` calls received.
    pub fn read_count(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Make every submission fail before reaching the pending pool.
    pub fn set_fail_submissions(&self, fail: bool) {
        self.faults.fail_submissions.store(fail, Ordering::SeqCst);
    }

    /// Make every read-only call fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.faults.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Keep submitted transactions pending until released.
    pub fn set_withhold_finality(&self, withhold: bool) {
        self.faults.withhold_finality.store(withhold, Ordering::SeqCst);
    }

    fn transaction_hash(sequence: u64, call: &EntryFunctionCall) -> TransactionHash {
        let mut hasher = Sha256::new();
        hasher.update(sequence.to_be_bytes());
        hasher.update(call.function.to_string().as_bytes());
        hasher.update(call.to_payload_json().to_string().as_bytes());
        TransactionHash::new(format!("0x{}", hex::encode(hasher.finalize())))
    }

    fn abort(&self, code: &str, detail: &str) -> String {
        format!(
            "Move abort in {}::{}: {code}: {detail}",
            self.contract.module_address, self.contract.module_name
        )
    }

    /// Execute a finalized entry-function call against the store.
    fn execute(&self, call: &EntryFunctionCall) -> Result<(), String> {
        if call.function != self.contract.function(PUBLISH_COMMITMENT) {
            return Err(format!("FUNCTION_RESOLUTION_FAILURE: {}", call.function));
        }

        let (id, issuer_id, validity_window) = match call.arguments.as_slice() {
            [MoveArg::Bytes(hash), MoveArg::U64(issuer), MoveArg::U64(window)] => {
                (commitment_id_from(hash)?, *issuer, *window)
            }
            _ => return Err("FAILED_TO_DESERIALIZE_ARGUMENT".to_string()),
        };

        if let Some(allowed) = &self.authorized_issuers {
            if !allowed.contains(&issuer_id) {
                return Err(self.abort(E_NOT_AUTHORIZED, "signer may not issue for this issuer id"));
            }
        }

        match self.commitments.entry(id) {
            Entry::Occupied(_) => Err(self.abort(E_COMMITMENT_EXISTS, "commitment already published")),
            Entry::Vacant(slot) => {
                slot.insert(Commitment {
                    id,
                    issuer_id,
                    validity_window,
                });
                Ok(())
            }
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(CommitmentContract::new(LOCAL_MODULE_ADDRESS))
    }
}

fn commitment_id_from(bytes: &[u8]) -> Result<CommitmentId, String> {
    let array: [u8; COMMITMENT_ID_LEN] = bytes
        .try_into()
        .map_err(|_| format!("FAILED_TO_DESERIALIZE_ARGUMENT: expected {COMMITMENT_ID_LEN}-byte hash"))?;
    Ok(CommitmentId::from_bytes(array))
}

#[async_trait]
impl LedgerGateway for InMemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    async fn submit_transaction(
        &self,
        call: &EntryFunctionCall,
    ) -> Result<PendingHandle, LedgerError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_submissions.load(Ordering::SeqCst) {
            return Err(LedgerError::Submission("injected submission failure".into()));
        }

        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let transaction_hash = Self::transaction_hash(sequence, call);
        self.pending
            .insert(transaction_hash.as_str().to_string(), call.clone());
        tracing::debug!(%transaction_hash, function = %call.function, "memory ledger accepted transaction");
        Ok(PendingHandle { transaction_hash })
    }

    async fn await_finality(
        &self,
        handle: &PendingHandle,
        timeout: Duration,
    ) -> Result<TransactionHash, LedgerError> {
        let hash = handle.transaction_hash.as_str();

        let outcome = match self.finalized.get(hash).map(|o| o.value().clone()) {
            Some(outcome) => outcome,
            None => {
                if self.faults.withhold_finality.load(Ordering::SeqCst) {
                    tokio::time::sleep(timeout).await;
                    return Err(LedgerError::FinalityTimeout {
                        transaction_hash: handle.transaction_hash.clone(),
                        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    });
                }
                let (_, call) = self.pending.remove(hash).ok_or_else(|| {
                    LedgerError::Submission(format!("unknown transaction {hash}"))
                })?;
                let outcome = self.execute(&call);
                self.finalized.insert(hash.to_string(), outcome.clone());
                outcome
            }
        };

        outcome
            .map(|()| handle.transaction_hash.clone())
            .map_err(|vm_status| LedgerError::Aborted {
                transaction_hash: handle.transaction_hash.clone(),
                vm_status,
            })
    }

    async fn call_read_only(
        &self,
        call: &ViewFunctionCall,
    ) -> Result<Vec<serde_json::Value>, LedgerError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Read("injected read failure".into()));
        }

        let id = match call.arguments.as_slice() {
            [MoveArg::Bytes(hash)] => commitment_id_from(hash).map_err(LedgerError::Read)?,
            _ => return Err(LedgerError::Read("FAILED_TO_DESERIALIZE_ARGUMENT".into())),
        };

        if call.function == self.contract.function(VERIFY) {
            Ok(vec![serde_json::Value::Bool(self.commitments.contains_key(&id))])
        } else if call.function == self.contract.function(GET_COMMITMENT) {
            let commitment = self
                .commitment(&id)
                .ok_or_else(|| LedgerError::Read(self.abort(E_COMMITMENT_NOT_FOUND, "no such commitment")))?;
            Ok(vec![serde_json::json!({
                "issuer_id": commitment.issuer_id.to_string(),
                "validity_window": commitment.validity_window.to_string(),
            })])
        } else {
            Err(LedgerError::Read(format!(
                "FUNCTION_RESOLUTION_FAILURE: {}",
                call.function
            )))
        }
    }
}
