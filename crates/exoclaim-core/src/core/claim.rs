// crates/exoclaim-core/src/core/claim.rs
// ============================================================================
// Module: Exoclaim Claim Record
// Description: The claim entity and its status enumeration.
// Purpose: Model one owner's current or past hold on one resource.
// Dependencies: serde, crate::core::{identifiers, time}
// ============================================================================

//! ## Overview
//! A [`Claim`] asserts one owner's current or past hold on one resource.
//! There is at most one record per `(owner_id, resource_key)` pair over its
//! entire lifetime: repeated claim/release/reclaim cycles reuse the record
//! and only toggle `status` and `claimed_at`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ClaimId;
use crate::core::identifiers::OwnerId;
use crate::core::identifiers::ResourceKey;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Claim Types
// ============================================================================

/// Lifecycle status of a claim record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// The owner currently holds the resource.
    Active,
    /// The owner relinquished the resource; the record remains for reactivation.
    Released,
}

/// A claim record asserting one owner's hold on one resource.
///
/// # Invariants
/// - `id` is immutable once assigned and never reused.
/// - Per `resource_key`, at most one claim is `Active` at any instant.
/// - `owner_display_name` and `attached_data` are snapshots captured at claim
///   time and are not kept in sync with later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Opaque unique record identifier.
    pub id: ClaimId,
    /// Canonical key of the claimed resource.
    pub resource_key: ResourceKey,
    /// Identity of the claiming owner.
    pub owner_id: OwnerId,
    /// Display name of the owner, captured at claim time.
    pub owner_display_name: String,
    /// Current lifecycle status.
    pub status: ClaimStatus,
    /// Timestamp of the most recent transition into `Active`.
    pub claimed_at: Timestamp,
    /// Immutable descriptive payload captured at claim time.
    pub attached_data: Value,
}

impl Claim {
    /// Returns `true` when the claim currently holds the resource.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, ClaimStatus::Active)
    }
}
