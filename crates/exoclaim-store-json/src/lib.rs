// crates/exoclaim-store-json/src/lib.rs
// ============================================================================
// Module: JSON Claim Store
// Description: Durable ClaimStore backend using a single JSON file.
// Purpose: Provide simple whole-collection persistence for Exoclaim claims.
// Dependencies: exoclaim-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This crate provides a file-backed [`exoclaim_core::ClaimStore`]
//! implementation that persists the entire claim collection as one JSON
//! array. Every save rewrites the full collection through an atomic
//! temp-file-and-rename, so concurrent readers never observe a torn file.
//! Reads favor availability: a missing or corrupt file degrades to an empty
//! collection instead of failing the claim-check path.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::JsonFileClaimStore;
pub use store::MAX_CLAIM_FILE_BYTES;
