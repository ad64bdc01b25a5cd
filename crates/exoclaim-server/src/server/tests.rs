// crates/exoclaim-server/src/server/tests.rs
// ============================================================================
// Module: Claim Server Unit Tests
// Description: Unit tests for handlers, error mapping, and wiring helpers.
// Purpose: Validate HTTP behavior with in-memory fixtures.
// Dependencies: exoclaim-server
// ============================================================================

//! ## Overview
//! Exercises the claim handlers directly with in-memory stores and captured
//! audit events, covering identity rejection, status mapping, body limits,
//! and the wire projections.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions over handler responses."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use exoclaim_core::ClaimError;
use exoclaim_core::ClaimService;
use exoclaim_core::InMemoryClaimStore;
use exoclaim_core::SequentialClaimIdSource;
use exoclaim_core::SharedClaimStore;
use exoclaim_core::WriteQueue;
use serde_json::Value;
use serde_json::json;

use super::ServerState;
use super::build_audit_sink;
use super::build_claim_store;
use super::coerce_resource_id;
use super::error_parts;
use super::handle_claim;
use super::handle_list_all;
use super::handle_list_mine;
use super::handle_release;
use super::handle_status;
use crate::audit::ClaimAuditEvent;
use crate::audit::ClaimAuditSink;
use crate::config::AuditSinkType;
use crate::config::ExoclaimConfig;
use crate::config::StoreType;
use crate::identity::DISPLAY_NAME_HEADER;
use crate::identity::USER_ID_HEADER;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Audit sink that captures events for assertions.
#[derive(Default)]
struct CapturingAuditSink {
    events: Mutex<Vec<ClaimAuditEvent>>,
}

impl ClaimAuditSink for CapturingAuditSink {
    fn record(&self, event: &ClaimAuditEvent) {
        self.events.lock().expect("events lock").push(event.clone());
    }
}

fn test_state(audit: Arc<CapturingAuditSink>) -> Arc<ServerState> {
    let service = ClaimService::new(
        SharedClaimStore::from_store(InMemoryClaimStore::new()),
        Arc::new(WriteQueue::new()),
        Arc::new(SequentialClaimIdSource::new()),
    );
    Arc::new(ServerState {
        service,
        audit,
        max_body_bytes: 1024,
    })
}

fn peer() -> SocketAddr {
    "127.0.0.1:45000".parse().expect("peer address")
}

fn identity_headers(user: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, HeaderValue::from_str(user).expect("user header"));
    headers.insert(
        DISPLAY_NAME_HEADER,
        HeaderValue::from_str(&format!("{user} Display")).expect("name header"),
    );
    headers
}

fn claim_body(resource_id: &Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&json!({ "resourceId": resource_id })).expect("body"))
}

async fn response_parts(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let value = serde_json::from_slice(&bytes).expect("body json");
    (status, value)
}

async fn claim(state: &Arc<ServerState>, user: &str, resource: &Value) -> (StatusCode, Value) {
    let response = handle_claim(
        State(Arc::clone(state)),
        ConnectInfo(peer()),
        identity_headers(user),
        claim_body(resource),
    )
    .await
    .into_response();
    response_parts(response).await
}

// ============================================================================
// SECTION: Mapping Tests
// ============================================================================

#[test]
fn error_parts_maps_every_variant() {
    let cases = [
        (ClaimError::InvalidIdentifier("bad".to_string()), StatusCode::BAD_REQUEST, "invalid_identifier"),
        (ClaimError::DuplicateOwner, StatusCode::CONFLICT, "duplicate_owner"),
        (ClaimError::HeldByOther, StatusCode::CONFLICT, "held_by_other"),
        (ClaimError::NotHeld, StatusCode::CONFLICT, "not_held"),
        (ClaimError::Storage("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        (ClaimError::QueueClosed, StatusCode::INTERNAL_SERVER_ERROR, "queue_closed"),
    ];
    for (error, expected_status, expected_label) in cases {
        let (status, label) = error_parts(&error);
        assert_eq!(status, expected_status, "status for {error}");
        assert_eq!(label, expected_label, "label for {error}");
    }
}

#[test]
fn coerce_resource_id_accepts_strings_and_numbers() {
    assert_eq!(coerce_resource_id(&json!("007")), "007");
    assert_eq!(coerce_resource_id(&json!(42)), "42");
    assert_eq!(coerce_resource_id(&json!(true)), "true");
}

#[test]
fn build_claim_store_selects_backend() {
    let mut config = ExoclaimConfig::default();
    config.store.store_type = StoreType::Memory;
    config.store.path = None;
    assert!(build_claim_store(&config).is_ok());

    config.store.store_type = StoreType::Json;
    assert!(build_claim_store(&config).is_err(), "json store without path must fail");
}

#[test]
fn build_audit_sink_requires_file_path() {
    let mut config = ExoclaimConfig::default();
    config.audit.sink_type = AuditSinkType::None;
    assert!(build_audit_sink(&config).is_ok());

    config.audit.sink_type = AuditSinkType::File;
    config.audit.path = None;
    assert!(build_audit_sink(&config).is_err(), "file sink without path must fail");
}

// ============================================================================
// SECTION: Handler Tests
// ============================================================================

#[tokio::test]
async fn claim_without_identity_is_unauthorized() {
    let audit = Arc::new(CapturingAuditSink::default());
    let state = test_state(Arc::clone(&audit));
    let response = handle_claim(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        HeaderMap::new(),
        claim_body(&json!("42")),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("unauthenticated"));
    let events = audit.events.lock().expect("events lock");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].http_status, 401);
}

#[tokio::test]
async fn claim_creates_then_rejects_conflicts() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));

    let (status, body) = claim(&state, "user-1", &json!("42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["claim"]["resourceId"], json!("42"));
    assert_eq!(body["claim"]["ownerId"], json!("user-1"));
    assert_eq!(body["claim"]["ownerDisplayName"], json!("user-1 Display"));
    assert_eq!(body["claim"]["status"], json!("active"));

    let (status, body) = claim(&state, "user-1", &json!("42")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("duplicate_owner"));

    let (status, body) = claim(&state, "user-2", &json!("42")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("held_by_other"));
}

#[tokio::test]
async fn claim_coerces_numeric_and_padded_identifiers() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));

    let (status, body) = claim(&state, "user-1", &json!(42)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["claim"]["resourceId"], json!("42"));

    // "042" normalizes to the same resource as numeric 42.
    let (status, body) = claim(&state, "user-2", &json!("042")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("held_by_other"));
}

#[tokio::test]
async fn claim_rejects_invalid_identifier_and_malformed_body() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));

    let (status, body) = claim(&state, "user-1", &json!("planet-x")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_identifier"));

    let response = handle_claim(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        identity_headers("user-1"),
        Bytes::from_static(b"not json"),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));
}

#[tokio::test]
async fn claim_rejects_oversized_body() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));
    let padding = "9".repeat(4096);
    let response = handle_claim(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        identity_headers("user-1"),
        Bytes::from(format!("{{\"resourceId\":\"{padding}\"}}")),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], json!("payload_too_large"));
}

#[tokio::test]
async fn release_transitions_and_rejects_non_holders() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));
    let (status, _) = claim(&state, "user-1", &json!("42")).await;
    assert_eq!(status, StatusCode::OK);

    // A different owner cannot release the claim.
    let response = handle_release(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("42".to_string()),
        identity_headers("user-2"),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("not_held"));

    let response = handle_release(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("42".to_string()),
        identity_headers("user-1"),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["claim"]["status"], json!("released"));

    // Releasing again conflicts; the claim is no longer held.
    let response = handle_release(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("42".to_string()),
        identity_headers("user-1"),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("not_held"));
}

#[tokio::test]
async fn release_without_identity_is_unauthorized() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));
    let response = handle_release(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("42".to_string()),
        HeaderMap::new(),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("unauthenticated"));
}

#[tokio::test]
async fn list_all_returns_public_projection_only() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));
    let (status, _) = claim(&state, "user-1", &json!("42")).await;
    assert_eq!(status, StatusCode::OK);

    let response = handle_list_all(State(Arc::clone(&state)), ConnectInfo(peer()))
        .await
        .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::OK);
    let claims = body["claims"].as_array().expect("claims array");
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["resourceId"], json!("42"));
    assert_eq!(claims[0]["ownerDisplayName"], json!("user-1 Display"));
    assert!(claims[0]["claimedAt"].is_i64());
    assert!(claims[0].get("ownerId").is_none(), "owner id must not leak publicly");
    assert!(claims[0].get("id").is_none(), "claim id must not leak publicly");
}

#[tokio::test]
async fn list_mine_filters_by_owner_and_requires_identity() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));
    let (status, _) = claim(&state, "user-1", &json!("1")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = claim(&state, "user-2", &json!("2")).await;
    assert_eq!(status, StatusCode::OK);

    let response = handle_list_mine(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        identity_headers("user-1"),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::OK);
    let claims = body["claims"].as_array().expect("claims array");
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["resourceId"], json!("1"));
    assert_eq!(claims[0]["ownerId"], json!("user-1"));

    let response =
        handle_list_mine(State(Arc::clone(&state)), ConnectInfo(peer()), HeaderMap::new())
            .await
            .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("unauthenticated"));
}

#[tokio::test]
async fn status_reports_holder_without_identity() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));

    let response = handle_status(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("42".to_string()),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["claimed"], json!(false));
    assert!(body.get("claim").is_none());

    let (status, _) = claim(&state, "user-1", &json!("42")).await;
    assert_eq!(status, StatusCode::OK);

    // Padded spellings resolve to the same canonical resource.
    let response = handle_status(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("0042".to_string()),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["claimed"], json!(true));
    assert_eq!(body["claim"]["ownerDisplayName"], json!("user-1 Display"));
    assert!(body["claim"].get("ownerId").is_none(), "owner id must not leak in status");
}

#[tokio::test]
async fn status_rejects_invalid_identifier() {
    let state = test_state(Arc::new(CapturingAuditSink::default()));
    let response = handle_status(
        State(Arc::clone(&state)),
        ConnectInfo(peer()),
        Path("planet-x".to_string()),
    )
    .await
    .into_response();
    let (status, body) = response_parts(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_identifier"));
}
