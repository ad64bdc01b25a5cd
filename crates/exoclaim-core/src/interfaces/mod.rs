// crates/exoclaim-core/src/interfaces/mod.rs
// ============================================================================
// Module: Exoclaim Interfaces
// Description: Backend-agnostic interfaces for claim storage and id supply.
// Purpose: Define the contract surfaces used by the Exoclaim runtime.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the claim core integrates with external systems
//! without embedding backend-specific details. The store contract is
//! intentionally coarse: implementations load the entire claim collection and
//! persist the entire collection atomically, which keeps the serialized write
//! path a simple read-modify-write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::claim::Claim;
use crate::core::identifiers::ClaimId;

// ============================================================================
// SECTION: Claim Store
// ============================================================================

/// Claim store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("claim store io error: {0}")]
    Io(String),
    /// Store data failed to serialize.
    #[error("claim store serialization error: {0}")]
    Serialize(String),
    /// Store reported an error.
    #[error("claim store error: {0}")]
    Store(String),
}

/// Durable collection of claim records.
///
/// Implementations must make `save_all` atomic with respect to concurrent
/// readers: a reader never observes a torn or partial collection. Readers may
/// observe a snapshot that is slightly stale relative to in-flight writes.
pub trait ClaimStore: Send + Sync {
    /// Loads the entire claim collection.
    ///
    /// A corrupt or missing backing store degrades to an empty collection
    /// rather than failing the read path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read at all.
    fn load_all(&self) -> Result<Vec<Claim>, StoreError>;

    /// Persists the entire claim collection, replacing the previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when persistence fails; the previous contents
    /// must remain intact in that case.
    fn save_all(&self, claims: &[Claim]) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Claim Id Source
// ============================================================================

/// Source of fresh claim identifiers.
///
/// The core never generates randomness itself; hosts supply an id source so
/// the lifecycle decision function stays deterministic under test.
pub trait ClaimIdSource: Send + Sync {
    /// Returns a fresh, never-before-issued claim identifier.
    fn next_id(&self) -> ClaimId;
}
