// crates/exoclaim-server/src/server.rs
// ============================================================================
// Module: Claim HTTP Server
// Description: axum routes and handlers over the claim service.
// Purpose: Expose claim operations with the wire shapes fixed by the API.
// Dependencies: exoclaim-core, exoclaim-store-json, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP server wires configuration, storage, audit, and the claim core
//! together. Mutating routes call [`ClaimService`] through a blocking task so
//! the serialized write queue never stalls the async runtime; read routes go
//! straight to the store and may observe a slightly stale snapshot. Wire
//! shapes use camelCase keys for compatibility with existing consumers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use exoclaim_core::Claim;
use exoclaim_core::ClaimError;
use exoclaim_core::ClaimRequest;
use exoclaim_core::ClaimService;
use exoclaim_core::InMemoryClaimStore;
use exoclaim_core::ReleaseRequest;
use exoclaim_core::SharedClaimStore;
use exoclaim_core::Timestamp;
use exoclaim_core::WriteQueue;
use exoclaim_store_json::JsonFileClaimStore;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::ClaimAuditEvent;
use crate::audit::ClaimAuditEventParams;
use crate::audit::ClaimAuditSink;
use crate::audit::ClaimMethod;
use crate::audit::ClaimOutcomeLabel;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::config::AuditSinkType;
use crate::config::ExoclaimConfig;
use crate::config::StoreType;
use crate::identity::CallerIdentity;
use crate::ids::RandomClaimIdSource;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum HttpServerError {
    /// Configuration was invalid.
    #[error("server config error: {0}")]
    Config(String),
    /// Server initialization failed.
    #[error("server init error: {0}")]
    Init(String),
    /// Transport-level failure while serving.
    #[error("server transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Shared state behind every handler.
#[derive(Clone)]
pub(crate) struct ServerState {
    /// Claim service orchestrating the lifecycle.
    service: ClaimService,
    /// Audit sink receiving one event per request.
    audit: Arc<dyn ClaimAuditSink>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Claim HTTP server instance.
pub struct HttpServer {
    /// Validated configuration.
    config: ExoclaimConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl HttpServer {
    /// Builds a new HTTP server from configuration.
    ///
    /// The serialized write queue is constructed exactly once here and shared
    /// by reference across all handlers for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServerError`] when validation or initialization fails.
    pub fn from_config(config: ExoclaimConfig) -> Result<Self, HttpServerError> {
        config.validate().map_err(|err| HttpServerError::Config(err.to_string()))?;
        let store = build_claim_store(&config)?;
        let audit = build_audit_sink(&config)?;
        let service = ClaimService::new(
            store,
            Arc::new(WriteQueue::new()),
            Arc::new(RandomClaimIdSource::new()),
        );
        let state = Arc::new(ServerState {
            service,
            audit,
            max_body_bytes: config.server.max_body_bytes,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), HttpServerError> {
        let addr = self.config.bind_addr().map_err(|err| HttpServerError::Config(err.to_string()))?;
        let app = build_router(self.state);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| HttpServerError::Transport(format!("bind failed: {err}")))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|err| HttpServerError::Transport(format!("serve failed: {err}")))
    }
}

/// Builds the claim store selected by configuration.
fn build_claim_store(config: &ExoclaimConfig) -> Result<SharedClaimStore, HttpServerError> {
    let store = match config.store.store_type {
        StoreType::Memory => SharedClaimStore::from_store(InMemoryClaimStore::new()),
        StoreType::Json => {
            let path = config
                .store
                .path
                .clone()
                .ok_or_else(|| HttpServerError::Config("json store requires path".to_string()))?;
            let store = JsonFileClaimStore::new(path)
                .map_err(|err| HttpServerError::Init(err.to_string()))?;
            SharedClaimStore::from_store(store)
        }
    };
    Ok(store)
}

/// Builds the audit sink selected by configuration.
fn build_audit_sink(
    config: &ExoclaimConfig,
) -> Result<Arc<dyn ClaimAuditSink>, HttpServerError> {
    let sink: Arc<dyn ClaimAuditSink> = match config.audit.sink_type {
        AuditSinkType::Stderr => Arc::new(StderrAuditSink),
        AuditSinkType::None => Arc::new(NoopAuditSink),
        AuditSinkType::File => {
            let path = config
                .audit
                .path
                .clone()
                .ok_or_else(|| HttpServerError::Config("file audit sink requires path".to_string()))?;
            let sink = FileAuditSink::new(&path)
                .map_err(|err| HttpServerError::Init(format!("open audit log: {err}")))?;
            Arc::new(sink)
        }
    };
    Ok(sink)
}

/// Builds the claim API router.
pub(crate) fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/claims", post(handle_claim).get(handle_list_all))
        .route("/claims/mine", get(handle_list_mine))
        .route("/claims/{resource_id}", delete(handle_release))
        .route("/claims/{resource_id}/status", get(handle_status))
        .with_state(state)
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Claim creation request body.
#[derive(Debug, Deserialize)]
struct ClaimBody {
    /// Raw resource identifier; string or number.
    #[serde(rename = "resourceId")]
    resource_id: Value,
}

/// Full claim payload returned to the claim's owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimDto {
    /// Claim record identifier.
    id: String,
    /// Canonical resource key.
    resource_id: String,
    /// Owner identifier.
    owner_id: String,
    /// Owner display name snapshot.
    owner_display_name: String,
    /// Lifecycle status label.
    status: &'static str,
    /// Milliseconds since epoch of the latest activation.
    claimed_at: i64,
    /// Descriptive payload captured at claim time.
    attached_data: Value,
}

impl ClaimDto {
    /// Projects a core claim into its wire shape.
    fn from_claim(claim: &Claim) -> Self {
        Self {
            id: claim.id.to_string(),
            resource_id: claim.resource_key.to_string(),
            owner_id: claim.owner_id.to_string(),
            owner_display_name: claim.owner_display_name.clone(),
            status: if claim.is_active() { "active" } else { "released" },
            claimed_at: claim.claimed_at.as_unix_millis(),
            attached_data: claim.attached_data.clone(),
        }
    }
}

/// Public projection of an active claim, safe for unauthenticated listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublicClaimDto {
    /// Canonical resource key.
    resource_id: String,
    /// Owner display name snapshot.
    owner_display_name: String,
    /// Milliseconds since epoch of the latest activation.
    claimed_at: i64,
}

impl PublicClaimDto {
    /// Projects a core claim into its public wire shape.
    fn from_claim(claim: &Claim) -> Self {
        Self {
            resource_id: claim.resource_key.to_string(),
            owner_display_name: claim.owner_display_name.clone(),
            claimed_at: claim.claimed_at.as_unix_millis(),
        }
    }
}

/// Mutation response envelope.
#[derive(Debug, Serialize)]
struct ClaimResponse {
    /// Whether the operation succeeded.
    success: bool,
    /// Resulting claim on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<ClaimDto>,
    /// Stable error label on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

impl ClaimResponse {
    /// Builds a success envelope around a claim.
    fn ok(claim: &Claim) -> Self {
        Self {
            success: true,
            claim: Some(ClaimDto::from_claim(claim)),
            error: None,
        }
    }

    /// Builds a failure envelope with a stable error label.
    const fn err(error: &'static str) -> Self {
        Self {
            success: false,
            claim: None,
            error: Some(error),
        }
    }
}

/// Resource status response.
#[derive(Debug, Serialize)]
struct StatusResponse {
    /// Whether some owner currently holds the resource.
    claimed: bool,
    /// Holder projection when the resource is claimed.
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<StatusHolderDto>,
}

/// Holder projection inside a status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusHolderDto {
    /// Owner display name snapshot.
    owner_display_name: String,
    /// Milliseconds since epoch of the latest activation.
    claimed_at: i64,
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps a claim error to its HTTP status and stable error label.
const fn error_parts(error: &ClaimError) -> (StatusCode, &'static str) {
    match error {
        ClaimError::InvalidIdentifier(_) => (StatusCode::BAD_REQUEST, "invalid_identifier"),
        ClaimError::DuplicateOwner => (StatusCode::CONFLICT, "duplicate_owner"),
        ClaimError::HeldByOther => (StatusCode::CONFLICT, "held_by_other"),
        ClaimError::NotHeld => (StatusCode::CONFLICT, "not_held"),
        ClaimError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        ClaimError::QueueClosed => (StatusCode::INTERNAL_SERVER_ERROR, "queue_closed"),
    }
}

/// Returns the current wall-clock time as a core timestamp.
fn now_timestamp() -> Timestamp {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    Timestamp::from_unix_millis(i64::try_from(millis).unwrap_or(i64::MAX))
}

/// Coerces the wire resource identifier into its raw string form.
///
/// JSON numbers take their decimal rendering; anything that is not a string
/// or number is reported as an invalid identifier by the normalizer.
fn coerce_resource_id(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles POST /claims.
async fn handle_claim(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> impl IntoResponse {
    let identity = match CallerIdentity::from_headers(&headers) {
        Ok(identity) => identity,
        Err(_) => {
            return respond(
                &state,
                peer,
                ClaimMethod::Claim,
                None,
                None,
                StatusCode::UNAUTHORIZED,
                ClaimResponse::err("unauthenticated"),
            );
        }
    };
    let owner = Some(identity.owner_id.to_string());
    if bytes.len() > state.max_body_bytes {
        return respond(
            &state,
            peer,
            ClaimMethod::Claim,
            owner,
            None,
            StatusCode::PAYLOAD_TOO_LARGE,
            ClaimResponse::err("payload_too_large"),
        );
    }
    let body: ClaimBody = match serde_json::from_slice(&bytes) {
        Ok(body) => body,
        Err(_) => {
            return respond(
                &state,
                peer,
                ClaimMethod::Claim,
                owner,
                None,
                StatusCode::BAD_REQUEST,
                ClaimResponse::err("invalid_request"),
            );
        }
    };
    let resource_id = coerce_resource_id(&body.resource_id);
    let request = ClaimRequest {
        resource_id: resource_id.clone(),
        owner_id: identity.owner_id,
        owner_display_name: identity.display_name,
        attached_data: Value::Null,
        requested_at: now_timestamp(),
    };
    let service = state.service.clone();
    let result = run_blocking(move || service.claim(request)).await;
    match result {
        Ok(outcome) => respond(
            &state,
            peer,
            ClaimMethod::Claim,
            owner,
            Some(resource_id),
            StatusCode::OK,
            ClaimResponse::ok(outcome.claim()),
        ),
        Err(error) => {
            let (status, label) = error_parts(&error);
            respond(
                &state,
                peer,
                ClaimMethod::Claim,
                owner,
                Some(resource_id),
                status,
                ClaimResponse::err(label),
            )
        }
    }
}

/// Handles DELETE /claims/{resource_id}.
async fn handle_release(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(resource_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let identity = match CallerIdentity::from_headers(&headers) {
        Ok(identity) => identity,
        Err(_) => {
            return respond(
                &state,
                peer,
                ClaimMethod::Release,
                None,
                Some(resource_id),
                StatusCode::UNAUTHORIZED,
                ClaimResponse::err("unauthenticated"),
            );
        }
    };
    let owner = Some(identity.owner_id.to_string());
    let request = ReleaseRequest {
        resource_id: resource_id.clone(),
        owner_id: identity.owner_id,
    };
    let service = state.service.clone();
    let result = run_blocking(move || service.release(request)).await;
    match result {
        Ok(claim) => respond(
            &state,
            peer,
            ClaimMethod::Release,
            owner,
            Some(resource_id),
            StatusCode::OK,
            ClaimResponse::ok(&claim),
        ),
        Err(error) => {
            let (status, label) = error_parts(&error);
            respond(
                &state,
                peer,
                ClaimMethod::Release,
                owner,
                Some(resource_id),
                status,
                ClaimResponse::err(label),
            )
        }
    }
}

/// Handles GET /claims.
async fn handle_list_all(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let service = state.service.clone();
    let result = run_blocking(move || service.active_claims()).await;
    match result {
        Ok(claims) => {
            let projection: Vec<PublicClaimDto> =
                claims.iter().map(PublicClaimDto::from_claim).collect();
            audit_read(&state, peer, ClaimMethod::ListAll, StatusCode::OK, None);
            (StatusCode::OK, axum::Json(serde_json::json!({ "claims": projection })))
        }
        Err(error) => {
            let (status, label) = error_parts(&error);
            audit_read(&state, peer, ClaimMethod::ListAll, status, Some(label));
            (status, axum::Json(serde_json::json!({ "error": label })))
        }
    }
}

/// Handles GET /claims/mine.
async fn handle_list_mine(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let identity = match CallerIdentity::from_headers(&headers) {
        Ok(identity) => identity,
        Err(_) => {
            audit_read(
                &state,
                peer,
                ClaimMethod::ListMine,
                StatusCode::UNAUTHORIZED,
                Some("unauthenticated"),
            );
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "error": "unauthenticated" })),
            );
        }
    };
    let service = state.service.clone();
    let owner_id = identity.owner_id;
    let result = run_blocking(move || service.claims_for_owner(&owner_id)).await;
    match result {
        Ok(claims) => {
            let projection: Vec<ClaimDto> = claims.iter().map(ClaimDto::from_claim).collect();
            audit_read(&state, peer, ClaimMethod::ListMine, StatusCode::OK, None);
            (StatusCode::OK, axum::Json(serde_json::json!({ "claims": projection })))
        }
        Err(error) => {
            let (status, label) = error_parts(&error);
            audit_read(&state, peer, ClaimMethod::ListMine, status, Some(label));
            (status, axum::Json(serde_json::json!({ "error": label })))
        }
    }
}

/// Handles GET /claims/{resource_id}/status.
async fn handle_status(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(resource_id): Path<String>,
) -> impl IntoResponse {
    let service = state.service.clone();
    let raw = resource_id.clone();
    let result = run_blocking(move || service.resource_status(&raw)).await;
    match result {
        Ok(status) => {
            let holder = status.holder.as_ref().map(|claim| StatusHolderDto {
                owner_display_name: claim.owner_display_name.clone(),
                claimed_at: claim.claimed_at.as_unix_millis(),
            });
            let body = StatusResponse {
                claimed: status.is_claimed(),
                claim: holder,
            };
            audit_read(&state, peer, ClaimMethod::Status, StatusCode::OK, None);
            (StatusCode::OK, axum::Json(serde_json::to_value(body).unwrap_or(Value::Null)))
        }
        Err(error) => {
            let (status, label) = error_parts(&error);
            audit_read(&state, peer, ClaimMethod::Status, status, Some(label));
            (status, axum::Json(serde_json::json!({ "error": label })))
        }
    }
}

// ============================================================================
// SECTION: Handler Helpers
// ============================================================================

/// Runs a blocking claim-service call off the async runtime.
async fn run_blocking<T, F>(operation: F) -> Result<T, ClaimError>
where
    F: FnOnce() -> Result<T, ClaimError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(operation).await {
        Ok(result) => result,
        Err(err) => Err(ClaimError::Storage(format!("claim task failed: {err}"))),
    }
}

/// Emits a mutation audit event and shapes the HTTP response.
fn respond(
    state: &ServerState,
    peer: SocketAddr,
    method: ClaimMethod,
    owner_id: Option<String>,
    resource: Option<String>,
    status: StatusCode,
    body: ClaimResponse,
) -> (StatusCode, axum::Json<ClaimResponse>) {
    state.audit.record(&ClaimAuditEvent::new(ClaimAuditEventParams {
        peer_ip: Some(peer.ip().to_string()),
        method,
        owner_id,
        resource,
        outcome: if body.success { ClaimOutcomeLabel::Ok } else { ClaimOutcomeLabel::Error },
        error_kind: body.error,
        http_status: status.as_u16(),
    }));
    (status, axum::Json(body))
}

/// Emits an audit event for a read-only route.
fn audit_read(
    state: &ServerState,
    peer: SocketAddr,
    method: ClaimMethod,
    status: StatusCode,
    error_kind: Option<&'static str>,
) {
    state.audit.record(&ClaimAuditEvent::new(ClaimAuditEventParams {
        peer_ip: Some(peer.ip().to_string()),
        method,
        owner_id: None,
        resource: None,
        outcome: if error_kind.is_none() { ClaimOutcomeLabel::Ok } else { ClaimOutcomeLabel::Error },
        error_kind,
        http_status: status.as_u16(),
    }));
}
