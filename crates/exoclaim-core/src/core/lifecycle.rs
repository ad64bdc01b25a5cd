// crates/exoclaim-core/src/core/lifecycle.rs
// ============================================================================
// Module: Exoclaim Claim Lifecycle
// Description: Pure decision functions over a claim store snapshot.
// Purpose: Decide create/reactivate/reject without performing any I/O.
// Dependencies: crate::core::{claim, identifiers, time}
// ============================================================================

//! ## Overview
//! The lifecycle module decides what a claim or release attempt does to the
//! store, given only a snapshot of the current claim collection. It never
//! performs I/O, reads a clock, or generates identifiers; hosts pass the
//! candidate id and timestamp in with the attempt. This keeps every decision
//! trivially testable and replayable.
//!
//! Ownership checks run before the global active-holder scan: when the scan
//! would find the caller's own active record, the attempt reports a duplicate
//! rather than a foreign holder, and a released record reactivates in place
//! instead of creating a second record for the pair.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::claim::Claim;
use crate::core::claim::ClaimStatus;
use crate::core::identifiers::ClaimId;
use crate::core::identifiers::OwnerId;
use crate::core::identifiers::ResourceKey;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Attempt Inputs
// ============================================================================

/// Inputs to a single claim attempt, fully resolved by the host.
///
/// # Invariants
/// - `candidate_id` is only incorporated into the store when the decision is
///   [`ClaimDecision::Created`]; otherwise it is discarded and never reused.
#[derive(Debug, Clone)]
pub struct ClaimAttempt {
    /// Canonical key of the targeted resource.
    pub resource_key: ResourceKey,
    /// Identity of the claiming owner.
    pub owner_id: OwnerId,
    /// Display name snapshot for a newly created record.
    pub owner_display_name: String,
    /// Descriptive payload snapshot for a newly created record.
    pub attached_data: Value,
    /// Pre-generated identifier for a newly created record.
    pub candidate_id: ClaimId,
    /// Host-supplied timestamp for the transition into `Active`.
    pub now: Timestamp,
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Outcome of a claim attempt against a store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    /// No prior record; append the new claim with `status = Active`.
    Created(Claim),
    /// The owner's released record flips back to `Active` with a fresh timestamp.
    Reactivated(Claim),
    /// The owner already holds an active claim on this resource.
    RejectedDuplicateOwner,
    /// A different owner currently holds this resource.
    RejectedHeldByOther,
}

/// Outcome of a release attempt against a store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// The owner's active record flips to `Released`; `claimed_at` is untouched.
    Released(Claim),
    /// The owner holds no active claim on this resource.
    RejectedNotHeld,
}

// ============================================================================
// SECTION: Decision Functions
// ============================================================================

/// Decides what a claim attempt does to the given store snapshot.
///
/// The caller applies the returned mutation: append for
/// [`ClaimDecision::Created`], replace-by-id for
/// [`ClaimDecision::Reactivated`]. Rejections imply no mutation.
#[must_use]
pub fn decide(claims: &[Claim], attempt: &ClaimAttempt) -> ClaimDecision {
    let own = claims
        .iter()
        .find(|claim| {
            claim.owner_id == attempt.owner_id && claim.resource_key == attempt.resource_key
        });
    let held_by_other = claims.iter().any(|claim| {
        claim.resource_key == attempt.resource_key
            && claim.owner_id != attempt.owner_id
            && claim.is_active()
    });
    if let Some(existing) = own {
        return match existing.status {
            ClaimStatus::Active => ClaimDecision::RejectedDuplicateOwner,
            // A released record only reactivates while nobody else holds the
            // resource; otherwise the single-active-holder invariant breaks.
            ClaimStatus::Released if held_by_other => ClaimDecision::RejectedHeldByOther,
            ClaimStatus::Released => {
                let mut updated = existing.clone();
                updated.status = ClaimStatus::Active;
                updated.claimed_at = attempt.now;
                ClaimDecision::Reactivated(updated)
            }
        };
    }
    if held_by_other {
        return ClaimDecision::RejectedHeldByOther;
    }
    ClaimDecision::Created(Claim {
        id: attempt.candidate_id.clone(),
        resource_key: attempt.resource_key.clone(),
        owner_id: attempt.owner_id.clone(),
        owner_display_name: attempt.owner_display_name.clone(),
        status: ClaimStatus::Active,
        claimed_at: attempt.now,
        attached_data: attempt.attached_data.clone(),
    })
}

/// Decides what a release attempt does to the given store snapshot.
///
/// The caller applies the returned mutation: replace-by-id for
/// [`ReleaseDecision::Released`]. A rejection implies no mutation.
#[must_use]
pub fn decide_release(
    claims: &[Claim],
    resource_key: &ResourceKey,
    owner_id: &OwnerId,
) -> ReleaseDecision {
    let own_active = claims.iter().find(|claim| {
        claim.owner_id == *owner_id && claim.resource_key == *resource_key && claim.is_active()
    });
    match own_active {
        Some(existing) => {
            let mut updated = existing.clone();
            updated.status = ClaimStatus::Released;
            ReleaseDecision::Released(updated)
        }
        None => ReleaseDecision::RejectedNotHeld,
    }
}
