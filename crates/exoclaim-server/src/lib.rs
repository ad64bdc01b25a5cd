// crates/exoclaim-server/src/lib.rs
// ============================================================================
// Module: Exoclaim Server
// Description: HTTP surface over the Exoclaim claim core.
// Purpose: Expose claim operations via axum with config and audit plumbing.
// Dependencies: exoclaim-core, exoclaim-store-json, axum, tokio
// ============================================================================

//! ## Overview
//! Exoclaim server exposes the claim core over HTTP. All handlers are thin
//! wrappers over [`exoclaim_core::ClaimService`]: the server owns transport,
//! configuration, caller-identity extraction, and audit logging, while every
//! lifecycle decision stays inside the core. Caller identity arrives from a
//! trusted authenticating proxy via request headers; token and session
//! mechanics are out of scope here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod identity;
pub mod ids;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ClaimAuditEvent;
pub use audit::ClaimAuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use config::AuditSinkType;
pub use config::ConfigError;
pub use config::ExoclaimConfig;
pub use config::StoreType;
pub use identity::CallerIdentity;
pub use ids::RandomClaimIdSource;
pub use server::HttpServer;
pub use server::HttpServerError;
