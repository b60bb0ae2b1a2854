//! End-to-end issuance and verification against the in-memory ledger.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use zkyc_commitment::{
    CommitmentService, IssuancePolicy, IssueError, IssuerConfig, ReadFailurePolicy, ServiceConfig,
    ServiceError, VerifierConfig, VerifyError,
};
use zkyc_core::{Clock, CommitmentId, FixedClock, IssuerId, ProofRecord, ValidationError};
use zkyc_ledger::{CommitmentContract, InMemoryLedger, LedgerError, LedgerGateway};

const NOW: u64 = 1_700_000_100;
const WINDOW: u64 = 1_731_536_000;

struct Harness {
    ledger: Arc<InMemoryLedger>,
    clock: Arc<FixedClock>,
    service: CommitmentService,
}

fn harness_with(policy: ReadFailurePolicy) -> Harness {
    let ledger = Arc::new(InMemoryLedger::new(CommitmentContract::new("0x42")));
    let clock = Arc::new(FixedClock::new(NOW));
    let service = CommitmentService::new(
        ledger.clone(),
        ledger.contract().clone(),
        clock.clone(),
        ServiceConfig {
            issuer: IssuerConfig {
                finality_timeout: Duration::from_millis(50),
            },
            verifier: VerifierConfig {
                read_timeout: Duration::from_millis(50),
                policy,
            },
            policy: IssuancePolicy::default(),
        },
    );
    Harness {
        ledger,
        clock,
        service,
    }
}

fn harness() -> Harness {
    harness_with(ReadFailurePolicy::Conservative)
}

fn kyc_proof(verified: bool) -> ProofRecord {
    ProofRecord::from_value(json!({
        "task": "kyc-check-1",
        "result": {"verifyTimestamp": 1_700_000_000u64, "data": "passed", "verifyOutcome": verified},
        "validatorAddress": "0xABCD"
    }))
    .unwrap()
}

fn derived_hex() -> String {
    zkyc_commitment::derive_eligible(&kyc_proof(true))
        .unwrap()
        .to_prefixed_hex()
}

// ── Issue and verify ─────────────────────────────────────────────────

#[tokio::test]
async fn issue_then_verify_kyc_proof() {
    let h = harness();
    let hash = derived_hex();
    assert_eq!(CommitmentId::from_hex(&hash).unwrap().as_bytes().len(), 32);

    let issued = h.service.issue_raw(&hash, 1, WINDOW).await.unwrap();
    assert!(!issued.transaction_hash.as_str().is_empty());

    let status = h.service.verify(&hash).await.unwrap();
    assert!(status.exists);
    let details = status.commitment.unwrap();
    assert_eq!(details.issuer_id, 1);
    assert_eq!(details.validity_window, WINDOW);
}

#[tokio::test]
async fn proof_commitment_uses_policy() {
    let h = harness();
    let response = h.service.issue_from_proof(&kyc_proof(true)).await.unwrap();
    assert_eq!(response.commitment_hash, derived_hex());
    assert_eq!(response.issuer_id, 1);
    assert_eq!(response.validity_window, NOW + 31_536_000);

    let stored = h
        .ledger
        .commitment(&CommitmentId::from_hex(&response.commitment_hash).unwrap())
        .unwrap();
    assert_eq!(stored.validity_window, NOW + 31_536_000);
}

// ── Unissued lookup ─────────────────────────────────────────────────

#[tokio::test]
async fn unissued_identifier_is_absent() {
    let h = harness();
    let status = h
        .service
        .verify("0x9c1185a5c5e9fc54612808977ee8f548b2258d31d1f0e4b5d6f1f5f2b1a0c3d4")
        .await
        .unwrap();
    assert!(!status.exists);
    assert!(status.commitment.is_none());
}

// ── Local validation ─────────────────────────────────────────────────

#[tokio::test]
async fn past_window_rejected_before_network() {
    let h = harness();
    let err = h.service.issue_raw(&derived_hex(), 1, NOW - 1).await.unwrap_err();
    assert_eq!(err.kind(), "VALIDATION_ERROR");
    assert!(matches!(
        err,
        ServiceError::Issue(IssueError::InvalidParameters(
            ValidationError::ValidityWindowNotInFuture { .. }
        ))
    ));
    assert_eq!(h.ledger.submit_count(), 0);
}

// ── Rejection ────────────────────────────────────────────────────────

#[tokio::test]
async fn unverified_proof_never_reaches_gateway() {
    let h = harness();
    let err = h
        .service
        .issue_from_proof(&kyc_proof(false))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::ProofNotVerified)
    ));
    assert_eq!(h.ledger.submit_count(), 0);
    assert_eq!(h.ledger.read_count(), 0);
}

#[tokio::test]
async fn incomplete_document_reports_missing_field() {
    let h = harness();
    let err = h
        .service
        .issue_from_document(json!({
            "task": "kyc-check-1",
            "result": {"verify_timestamp": 1, "data": "passed", "verify_result": true}
        }))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::MissingField("validatorAddress"))
    ));
    assert_eq!(h.ledger.submit_count(), 0);
}

#[tokio::test]
async fn malformed_identifier_rejected() {
    let h = harness();
    let non_hex = "g".repeat(64);
    let too_long = format!("0x{}", "a".repeat(66));
    for bad in ["", "0x", "0x1234", non_hex.as_str(), too_long.as_str()] {
        let err = h.service.verify(bad).await.unwrap_err();
        assert_eq!(err.kind(), "VALIDATION_ERROR", "{bad:?}");
    }
    assert_eq!(h.ledger.read_count(), 0);
}

// ── Write-once ───────────────────────────────────────────────────────

#[tokio::test]
async fn reissue_is_duplicate_and_keeps_first_values() {
    let h = harness();
    let hash = derived_hex();
    h.service.issue_raw(&hash, 1, WINDOW).await.unwrap();

    let err = h.service.issue_raw(&hash, 2, WINDOW + 1).await.unwrap_err();
    assert_eq!(err.kind(), "DUPLICATE_COMMITMENT");

    let details = h.service.verify(&hash).await.unwrap().commitment.unwrap();
    assert_eq!((details.issuer_id, details.validity_window), (1, WINDOW));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_issuance_publishes_exactly_once() {
    let h = harness();
    let hash = derived_hex();
    let start = Arc::new(tokio::sync::Barrier::new(8));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let service = h.service.clone();
            let hash = hash.clone();
            let start = start.clone();
            tokio::spawn(async move {
                start.wait().await;
                service.issue_raw(&hash, 1, WINDOW).await
            })
        })
        .collect();

    let mut published = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => published += 1,
            Err(err) => assert_eq!(err.kind(), "DUPLICATE_COMMITMENT"),
        }
    }
    assert_eq!(published, 1);
    assert_eq!(h.ledger.len(), 1);
    assert_eq!(h.ledger.submit_count(), 8);
}

#[tokio::test]
async fn second_of_two_pending_publishes_aborts_as_duplicate() {
    let h = harness();
    let id = CommitmentId::from_hex(&derived_hex()).unwrap();
    let contract = h.ledger.contract().clone();
    let first = contract.publish_commitment(&id, IssuerId::new(1).unwrap(), WINDOW);
    let second = contract.publish_commitment(&id, IssuerId::new(2).unwrap(), WINDOW + 1);

    // Both transactions are in the pending pool before either finalizes.
    let first = h.ledger.submit_transaction(&first).await.unwrap();
    let second = h.ledger.submit_transaction(&second).await.unwrap();
    assert_eq!(h.ledger.pending_count(), 2);

    let timeout = Duration::from_millis(50);
    h.ledger.await_finality(&second, timeout).await.unwrap();
    let err = h.ledger.await_finality(&first, timeout).await.unwrap_err();
    assert!(matches!(err, LedgerError::Aborted { ref vm_status, .. } if vm_status.contains("E_COMMITMENT_EXISTS")));

    let details = h.service.verify(&derived_hex()).await.unwrap().commitment.unwrap();
    assert_eq!((details.issuer_id, details.validity_window), (2, WINDOW + 1));
}

// ── Verification conservatism ────────────────────────────────────────

#[tokio::test]
async fn read_failure_reports_absent_by_default() {
    let h = harness();
    let hash = derived_hex();
    h.service.issue_raw(&hash, 1, WINDOW).await.unwrap();

    h.ledger.set_fail_reads(true);
    let status = h.service.verify(&hash).await.unwrap();
    assert!(!status.exists);
    assert!(status.commitment.is_none());
}

#[tokio::test]
async fn read_failure_surfaces_in_strict_mode() {
    let h = harness_with(ReadFailurePolicy::Strict);
    h.ledger.set_fail_reads(true);
    let err = h.service.verify(&derived_hex()).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Verify(VerifyError::ReadFailed { .. })
    ));
    assert_eq!(err.kind(), "READ_FAILED");
}

// ── Finality ─────────────────────────────────────────────────────────

#[tokio::test]
async fn finality_timeout_carries_pending_hash() {
    let h = harness();
    h.ledger.set_withhold_finality(true);
    let hash = derived_hex();

    let err = h.service.issue_raw(&hash, 1, WINDOW).await.unwrap_err();
    let pending = match err {
        ServiceError::Issue(IssueError::FinalityTimeout {
            transaction_hash, ..
        }) => transaction_hash,
        other => panic!("expected FinalityTimeout, got {other:?}"),
    };
    assert!(!pending.as_str().is_empty());
    assert_eq!(h.ledger.pending_count(), 1);

    // Not yet published; re-query rather than re-submit.
    assert!(!h.service.verify(&hash).await.unwrap().exists);
}

// ── Expiry is derived by the caller ──────────────────────────────────

#[tokio::test]
async fn expiry_is_judged_against_callers_clock() {
    let h = harness();
    let hash = derived_hex();
    h.service.issue_raw(&hash, 1, NOW + 10).await.unwrap();

    let id = CommitmentId::from_hex(&hash).unwrap();
    let verified = h.service.verifier().verify(&id).await.unwrap();
    let commitment = verified.commitment.unwrap();
    assert!(!commitment.is_expired_at(h.clock.now_unix()));

    h.clock.advance(10);
    assert!(commitment.is_expired_at(h.clock.now_unix()));
    // The ledger still reports it; expiry is not a ledger state.
    assert!(h.service.verify(&hash).await.unwrap().exists);
}

#[tokio::test]
async fn custom_policy_applies_to_proof_commitments() {
    let ledger = Arc::new(InMemoryLedger::new(CommitmentContract::new("0x42")));
    let service = CommitmentService::new(
        ledger.clone(),
        ledger.contract().clone(),
        Arc::new(FixedClock::new(NOW)),
        ServiceConfig {
            policy: IssuancePolicy {
                issuer_id: IssuerId::new(9).unwrap(),
                validity_secs: 60,
            },
            ..ServiceConfig::default()
        },
    );
    let response = service.issue_from_proof(&kyc_proof(true)).await.unwrap();
    assert_eq!(response.issuer_id, 9);
    assert_eq!(response.validity_window, NOW + 60);
}
