// crates/exoclaim-core/src/runtime/service.rs
// ============================================================================
// Module: Exoclaim Claim Service
// Description: Orchestration of normalize, serialize, decide, and persist.
// Purpose: Expose the claim lifecycle as typed operations over a store.
// Dependencies: crate::{core, interfaces, runtime::queue}
// ============================================================================

//! ## Overview
//! The claim service composes the core pieces: it normalizes the raw resource
//! identifier, funnels the load → decide → persist sequence through the
//! serialized write queue, and translates lifecycle decisions into typed
//! results. The whole check-then-act sequence runs as one queued operation,
//! which is what prevents two concurrent claims on the same resource from
//! both succeeding.
//!
//! Read-only queries never touch the queue; they read the store directly and
//! may observe a snapshot that is slightly stale relative to in-flight writes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::core::claim::Claim;
use crate::core::identifiers::OwnerId;
use crate::core::identifiers::ResourceKey;
use crate::core::lifecycle::ClaimAttempt;
use crate::core::lifecycle::ClaimDecision;
use crate::core::lifecycle::ReleaseDecision;
use crate::core::lifecycle::decide;
use crate::core::lifecycle::decide_release;
use crate::core::time::Timestamp;
use crate::interfaces::ClaimIdSource;
use crate::interfaces::ClaimStore;
use crate::runtime::queue::WriteQueue;
use crate::runtime::store::SharedClaimStore;

// ============================================================================
// SECTION: Requests and Results
// ============================================================================

/// A claim attempt as received from the transport layer.
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    /// Raw resource identifier, prior to normalization.
    pub resource_id: String,
    /// Authenticated identity of the caller.
    pub owner_id: OwnerId,
    /// Display name of the caller, snapshotted into a new record.
    pub owner_display_name: String,
    /// Descriptive payload snapshotted into a new record.
    pub attached_data: Value,
    /// Host-supplied timestamp for the attempt.
    pub requested_at: Timestamp,
}

/// A release attempt as received from the transport layer.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    /// Raw resource identifier, prior to normalization.
    pub resource_id: String,
    /// Authenticated identity of the caller.
    pub owner_id: OwnerId,
}

/// Successful claim outcomes, carrying the resulting record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// A new claim record was appended.
    Created(Claim),
    /// An existing released record transitioned back to active.
    Reactivated(Claim),
}

impl ClaimOutcome {
    /// Returns the claim carried by the outcome.
    #[must_use]
    pub const fn claim(&self) -> &Claim {
        match self {
            Self::Created(claim) | Self::Reactivated(claim) => claim,
        }
    }
}

/// Public status of a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatus {
    /// Canonical key the status was computed for.
    pub resource_key: ResourceKey,
    /// Active claim holding the resource, when one exists.
    pub holder: Option<Claim>,
}

impl ResourceStatus {
    /// Returns `true` when some owner currently holds the resource.
    #[must_use]
    pub const fn is_claimed(&self) -> bool {
        self.holder.is_some()
    }
}

/// Claim service errors, returned as typed results across the public boundary.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Resource identifier failed normalization; nothing was enqueued.
    #[error("invalid resource identifier: {0}")]
    InvalidIdentifier(String),
    /// The caller already holds an active claim on the resource.
    #[error("resource already claimed by this owner")]
    DuplicateOwner,
    /// Another owner currently holds an active claim on the resource.
    #[error("resource already claimed by another owner")]
    HeldByOther,
    /// The caller holds no active claim on the resource.
    #[error("no active claim held on this resource")]
    NotHeld,
    /// The store failed during load or persist; retrying the call is safe
    /// because every attempt re-evaluates from a fresh load.
    #[error("claim store failure: {0}")]
    Storage(String),
    /// The serialized write queue has shut down.
    #[error("write queue closed")]
    QueueClosed,
}

// ============================================================================
// SECTION: Claim Service
// ============================================================================

/// Orchestrator for the claim lifecycle over a durable store.
#[derive(Clone)]
pub struct ClaimService {
    /// Durable claim collection.
    store: SharedClaimStore,
    /// Process-wide serialized write queue.
    queue: Arc<WriteQueue>,
    /// Source of fresh claim identifiers.
    ids: Arc<dyn ClaimIdSource>,
}

impl ClaimService {
    /// Builds a claim service over the given store, queue, and id source.
    ///
    /// The queue must be the single process-wide instance; constructing one
    /// queue per request would void the mutual-exclusion guarantee.
    #[must_use]
    pub fn new(
        store: SharedClaimStore,
        queue: Arc<WriteQueue>,
        ids: Arc<dyn ClaimIdSource>,
    ) -> Self {
        Self {
            store,
            queue,
            ids,
        }
    }

    /// Attempts to claim a resource for the caller.
    ///
    /// Normalization failures are reported before anything is enqueued. The
    /// load → decide → persist sequence runs as one serialized operation;
    /// rejections perform no store write, and a failed persist discards the
    /// in-memory mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError`] for invalid identifiers, lifecycle rejections,
    /// and storage or queue failures.
    pub fn claim(&self, request: ClaimRequest) -> Result<ClaimOutcome, ClaimError> {
        let resource_key = ResourceKey::normalize(&request.resource_id)
            .map_err(|err| ClaimError::InvalidIdentifier(err.to_string()))?;
        let attempt = ClaimAttempt {
            resource_key,
            owner_id: request.owner_id,
            owner_display_name: request.owner_display_name,
            attached_data: request.attached_data,
            candidate_id: self.ids.next_id(),
            now: request.requested_at,
        };
        let store = self.store.clone();
        self.queue
            .enqueue(move || apply_claim(&store, &attempt))
            .map_err(|_| ClaimError::QueueClosed)?
    }

    /// Releases the caller's active claim on a resource.
    ///
    /// Release rides the same serialized queue as claims so that it never
    /// interleaves with a concurrent claim attempt on the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError`] for invalid identifiers, [`ClaimError::NotHeld`]
    /// when the caller has no active claim, and storage or queue failures.
    pub fn release(&self, request: ReleaseRequest) -> Result<Claim, ClaimError> {
        let resource_key = ResourceKey::normalize(&request.resource_id)
            .map_err(|err| ClaimError::InvalidIdentifier(err.to_string()))?;
        let owner_id = request.owner_id;
        let store = self.store.clone();
        self.queue
            .enqueue(move || apply_release(&store, &resource_key, &owner_id))
            .map_err(|_| ClaimError::QueueClosed)?
    }

    /// Returns all currently active claims.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Storage`] when the store cannot be read.
    pub fn active_claims(&self) -> Result<Vec<Claim>, ClaimError> {
        let claims = load(&self.store)?;
        Ok(claims.into_iter().filter(Claim::is_active).collect())
    }

    /// Returns the caller's currently active claims.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Storage`] when the store cannot be read.
    pub fn claims_for_owner(&self, owner_id: &OwnerId) -> Result<Vec<Claim>, ClaimError> {
        let claims = load(&self.store)?;
        Ok(claims
            .into_iter()
            .filter(|claim| claim.is_active() && claim.owner_id == *owner_id)
            .collect())
    }

    /// Reports whether a resource is currently claimed and by whom.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidIdentifier`] for malformed identifiers
    /// and [`ClaimError::Storage`] when the store cannot be read.
    pub fn resource_status(&self, resource_id: &str) -> Result<ResourceStatus, ClaimError> {
        let resource_key = ResourceKey::normalize(resource_id)
            .map_err(|err| ClaimError::InvalidIdentifier(err.to_string()))?;
        let claims = load(&self.store)?;
        let holder = claims
            .into_iter()
            .find(|claim| claim.resource_key == resource_key && claim.is_active());
        Ok(ResourceStatus {
            resource_key,
            holder,
        })
    }
}

// ============================================================================
// SECTION: Queued Operations
// ============================================================================

/// Loads the store, mapping failures into service errors.
fn load(store: &SharedClaimStore) -> Result<Vec<Claim>, ClaimError> {
    store.load_all().map_err(|err| ClaimError::Storage(err.to_string()))
}

/// Runs one serialized claim attempt: load, decide, persist on mutation.
fn apply_claim(store: &SharedClaimStore, attempt: &ClaimAttempt) -> Result<ClaimOutcome, ClaimError> {
    let mut claims = load(store)?;
    match decide(&claims, attempt) {
        ClaimDecision::Created(claim) => {
            claims.push(claim.clone());
            persist(store, &claims)?;
            Ok(ClaimOutcome::Created(claim))
        }
        ClaimDecision::Reactivated(claim) => {
            replace_by_id(&mut claims, &claim);
            persist(store, &claims)?;
            Ok(ClaimOutcome::Reactivated(claim))
        }
        ClaimDecision::RejectedDuplicateOwner => Err(ClaimError::DuplicateOwner),
        ClaimDecision::RejectedHeldByOther => Err(ClaimError::HeldByOther),
    }
}

/// Runs one serialized release attempt: load, decide, persist on mutation.
fn apply_release(
    store: &SharedClaimStore,
    resource_key: &ResourceKey,
    owner_id: &OwnerId,
) -> Result<Claim, ClaimError> {
    let mut claims = load(store)?;
    match decide_release(&claims, resource_key, owner_id) {
        ReleaseDecision::Released(claim) => {
            replace_by_id(&mut claims, &claim);
            persist(store, &claims)?;
            Ok(claim)
        }
        ReleaseDecision::RejectedNotHeld => Err(ClaimError::NotHeld),
    }
}

/// Persists the full collection, mapping failures into service errors.
fn persist(store: &SharedClaimStore, claims: &[Claim]) -> Result<(), ClaimError> {
    store.save_all(claims).map_err(|err| ClaimError::Storage(err.to_string()))
}

/// Replaces the record sharing the updated claim's id.
fn replace_by_id(claims: &mut [Claim], updated: &Claim) {
    if let Some(slot) = claims.iter_mut().find(|claim| claim.id == updated.id) {
        *slot = updated.clone();
    }
}
