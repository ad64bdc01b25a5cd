// crates/exoclaim-server/src/audit.rs
// ============================================================================
// Module: Claim Audit Logging
// Description: Structured audit events for claim request handling.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for claim request
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Claim request method classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimMethod {
    /// POST /claims.
    Claim,
    /// DELETE /claims/{resource}.
    Release,
    /// GET /claims.
    ListAll,
    /// GET /claims/mine.
    ListMine,
    /// GET /claims/{resource}/status.
    Status,
}

/// Claim request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcomeLabel {
    /// Successful request.
    Ok,
    /// Failed request.
    Error,
}

/// Claim audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Request method classification.
    pub method: ClaimMethod,
    /// Authenticated owner identifier when present.
    pub owner_id: Option<String>,
    /// Raw resource identifier when present.
    pub resource: Option<String>,
    /// Request outcome.
    pub outcome: ClaimOutcomeLabel,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// HTTP status code returned.
    pub http_status: u16,
}

/// Inputs required to construct an audit event.
pub struct ClaimAuditEventParams {
    /// Peer IP address if known.
    pub peer_ip: Option<String>,
    /// Request method classification.
    pub method: ClaimMethod,
    /// Authenticated owner identifier when present.
    pub owner_id: Option<String>,
    /// Raw resource identifier when present.
    pub resource: Option<String>,
    /// Request outcome.
    pub outcome: ClaimOutcomeLabel,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// HTTP status code returned.
    pub http_status: u16,
}

impl ClaimAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ClaimAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "claim_request",
            timestamp_ms,
            peer_ip: params.peer_ip,
            method: params.method,
            owner_id: params.owner_id,
            resource: params.resource,
            outcome: params.outcome,
            error_kind: params.error_kind,
            http_status: params.http_status,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for claim request events.
pub trait ClaimAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ClaimAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ClaimAuditSink for StderrAuditSink {
    fn record(&self, event: &ClaimAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ClaimAuditSink for FileAuditSink {
    fn record(&self, event: &ClaimAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ClaimAuditSink for NoopAuditSink {
    fn record(&self, _event: &ClaimAuditEvent) {}
}
