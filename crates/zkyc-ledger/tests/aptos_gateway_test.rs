//! Contract tests for AptosGateway against a mocked fullnode REST API.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/v1/accounts/{address}` | `submit_*` |
//! | POST   | `/v1/transactions/encode_submission` | `submit_*` |
//! | POST   | `/v1/transactions` | `submit_*` |
//! | GET    | `/v1/transactions/by_hash/{hash}` | `finality_*` |
//! | POST   | `/v1/view` | `view_*`, `read_only_*` |

use std::time::Duration;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zkyc_core::{CommitmentId, IssuerId};
use zkyc_ledger::{
    AptosConfig, AptosGateway, LedgerError, LedgerGateway, PendingHandle, TransactionHash,
};

const KEY: &str = "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";
const SIGNING_MESSAGE: &str = "0xb5e97db07fa0bd0e5598aa3643a9bc6f6693bddc1a9fec9e674a461eaa00b19301";
const TX_HASH: &str = "0x7c2a9c5f0e1d4b3a29f8e6d7c5b4a39281706f5e4d3c2b1a0f9e8d7c6b5a4938";

fn gateway(server: &MockServer) -> AptosGateway {
    let mut config =
        AptosConfig::new(server.uri().parse().unwrap(), "0x42", "0xa11ce", KEY).unwrap();
    config.poll_interval_ms = 10;
    config.timeout_secs = 5;
    AptosGateway::new(config).unwrap()
}

fn handle() -> PendingHandle {
    PendingHandle {
        transaction_hash: TransactionHash::new(TX_HASH),
    }
}

async fn mount_account(server: &MockServer, sequence_number: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/accounts/0xa11ce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sequence_number": sequence_number,
            "authentication_key": "0x00000000000000000000000000000000000000000000000000000000000a11ce"
        })))
        .mount(server)
        .await;
}

async fn mount_encode(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/transactions/encode_submission"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(SIGNING_MESSAGE)))
        .mount(server)
        .await;
}

// ── submit_transaction ───────────────────────────────────────────────

#[tokio::test]
async fn submit_signs_encoded_message_and_returns_hash() {
    let server = MockServer::start().await;
    mount_account(&server, "7").await;
    mount_encode(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/transactions"))
        .and(body_partial_json(json!({
            "sender": "0xa11ce",
            "sequence_number": "7",
            "payload": {
                "type": "entry_function_payload",
                "function": "0x42::ZKYCCommitment::publish_commitment",
                "arguments": [format!("0x{}", "ab".repeat(32)), "1", "1731536000"]
            },
            "signature": { "type": "ed25519_signature" }
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "hash": TX_HASH,
            "sender": "0xa11ce",
            "sequence_number": "7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let call = gw.config().contract().publish_commitment(
        &CommitmentId::from_bytes([0xab; 32]),
        IssuerId::new(1).unwrap(),
        1_731_536_000,
    );
    let pending = gw.submit_transaction(&call).await.unwrap();
    assert_eq!(pending.transaction_hash.as_str(), TX_HASH);

    // The submitted signature must verify over the node-encoded message.
    let requests = server.received_requests().await.unwrap();
    let submitted = requests
        .iter()
        .find(|r| r.url.path() == "/v1/transactions")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&submitted.body).unwrap();
    let public_key = hex::decode(body["signature"]["public_key"].as_str().unwrap().trim_start_matches("0x")).unwrap();
    let signature = hex::decode(body["signature"]["signature"].as_str().unwrap().trim_start_matches("0x")).unwrap();
    let key = VerifyingKey::from_bytes(&public_key.try_into().unwrap()).unwrap();
    let message = hex::decode(SIGNING_MESSAGE.trim_start_matches("0x")).unwrap();
    key.verify(&message, &Signature::from_slice(&signature).unwrap())
        .unwrap();
}

#[tokio::test]
async fn submit_rejection_is_not_retried() {
    let server = MockServer::start().await;
    mount_account(&server, "3").await;
    mount_encode(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid transaction: Type: Validation Code: SEQUENCE_NUMBER_TOO_OLD",
            "error_code": "vm_error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let call = gw.config().contract().publish_commitment(
        &CommitmentId::from_bytes([1; 32]),
        IssuerId::new(1).unwrap(),
        10,
    );
    match gw.submit_transaction(&call).await {
        Err(LedgerError::Submission(msg)) => {
            assert!(msg.contains("SEQUENCE_NUMBER_TOO_OLD"), "{msg}");
            assert!(msg.contains("400"), "{msg}");
        }
        other => panic!("expected Submission, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_fails_when_account_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/0xa11ce"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Account not found by Address(0xa11ce)",
            "error_code": "account_not_found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/transactions"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let call = gw.config().contract().publish_commitment(
        &CommitmentId::from_bytes([2; 32]),
        IssuerId::new(1).unwrap(),
        10,
    );
    assert!(matches!(
        gw.submit_transaction(&call).await,
        Err(LedgerError::Submission(_))
    ));
}

// ── await_finality ───────────────────────────────────────────────────

#[tokio::test]
async fn finality_polls_through_pending_and_not_found() {
    let server = MockServer::start().await;
    let by_hash = format!("/v1/transactions/by_hash/{TX_HASH}");

    Mock::given(method("GET"))
        .and(path(by_hash.as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Transaction not found",
            "error_code": "transaction_not_found"
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(by_hash.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "pending_transaction",
            "hash": TX_HASH
        })))
        .up_to_n_times(2)
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(by_hash.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "user_transaction",
            "hash": TX_HASH,
            "version": "123456",
            "success": true,
            "vm_status": "Executed successfully"
        })))
        .with_priority(3)
        .mount(&server)
        .await;

    let hash = gateway(&server)
        .await_finality(&handle(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(hash.as_str(), TX_HASH);
}

#[tokio::test]
async fn finality_reports_move_abort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/transactions/by_hash/{TX_HASH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "user_transaction",
            "hash": TX_HASH,
            "success": false,
            "vm_status": "Move abort in 0x42::ZKYCCommitment: E_COMMITMENT_EXISTS(0x80001): "
        })))
        .mount(&server)
        .await;

    match gateway(&server)
        .await_finality(&handle(), Duration::from_secs(5))
        .await
    {
        Err(LedgerError::Aborted {
            transaction_hash,
            vm_status,
        }) => {
            assert_eq!(transaction_hash.as_str(), TX_HASH);
            assert!(zkyc_ledger::contract::is_duplicate_abort(&vm_status));
        }
        other => panic!("expected Aborted, got {other:?}"),
    }
}

#[tokio::test]
async fn finality_times_out_while_pending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/transactions/by_hash/{TX_HASH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "pending_transaction",
            "hash": TX_HASH
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .await_finality(&handle(), Duration::from_millis(150))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::FinalityTimeout { timeout_ms: 150, .. }
    ));
    assert_eq!(err.kind(), "FINALITY_TIMEOUT");
}

// ── call_read_only ───────────────────────────────────────────────────

#[tokio::test]
async fn view_returns_result_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/view"))
        .and(body_partial_json(json!({
            "function": "0x42::ZKYCCommitment::verify",
            "type_arguments": [],
            "arguments": [format!("0x{}", "cd".repeat(32))]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([true])))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let call = gw.config().contract().verify(&CommitmentId::from_bytes([0xcd; 32]));
    assert_eq!(gw.call_read_only(&call).await.unwrap(), vec![json!(true)]);
}

#[tokio::test]
async fn view_abort_is_read_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/view"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Move abort in 0x42::ZKYCCommitment: E_COMMITMENT_NOT_FOUND(0x60002): ",
            "error_code": "invalid_input"
        })))
        .mount(&server)
        .await;

    let gw = gateway(&server);
    let call = gw.config().contract().get_commitment(&CommitmentId::from_bytes([0xcd; 32]));
    match gw.call_read_only(&call).await {
        Err(LedgerError::Read(msg)) => assert!(msg.contains("E_COMMITMENT_NOT_FOUND"), "{msg}"),
        other => panic!("expected Read, got {other:?}"),
    }
}

// ── read-only gateway ────────────────────────────────────────────────

fn read_only_gateway(server: &MockServer) -> AptosGateway {
    let config = AptosConfig::read_only(server.uri().parse().unwrap(), "0x42").unwrap();
    AptosGateway::new(config).unwrap()
}

#[tokio::test]
async fn read_only_gateway_serves_views() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/view"))
        .and(body_partial_json(json!({
            "function": "0x42::ZKYCCommitment::get_commitment"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"issuer_id": "1", "validity_window": "1731536000"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gw = read_only_gateway(&server);
    let call = gw.config().contract().get_commitment(&CommitmentId::from_bytes([0xcd; 32]));
    let values = gw.call_read_only(&call).await.unwrap();
    assert_eq!(values[0]["validity_window"], "1731536000");
}

#[tokio::test]
async fn read_only_gateway_refuses_submission_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts/0xa11ce"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gw = read_only_gateway(&server);
    let call = gw.config().contract().publish_commitment(
        &CommitmentId::from_bytes([3; 32]),
        IssuerId::new(1).unwrap(),
        10,
    );
    match gw.submit_transaction(&call).await {
        Err(LedgerError::Submission(msg)) => assert!(msg.contains("no signing key"), "{msg}"),
        other => panic!("expected Submission, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}
