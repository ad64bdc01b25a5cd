// crates/exoclaim-core/src/runtime/store.rs
// ============================================================================
// Module: Exoclaim In-Memory Store
// Description: Simple in-memory claim store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`ClaimStore`]
//! for tests and local demos, a deterministic [`ClaimIdSource`], and the
//! shared wrapper used to pass a store across threads. The in-memory store is
//! not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::core::claim::Claim;
use crate::core::identifiers::ClaimId;
use crate::interfaces::ClaimIdSource;
use crate::interfaces::ClaimStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory claim store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClaimStore {
    /// Claim collection protected by a mutex.
    claims: Arc<Mutex<Vec<Claim>>>,
}

impl InMemoryClaimStore {
    /// Creates a new, empty in-memory claim store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            claims: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ClaimStore for InMemoryClaimStore {
    fn load_all(&self) -> Result<Vec<Claim>, StoreError> {
        let guard = self
            .claims
            .lock()
            .map_err(|_| StoreError::Store("claim store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save_all(&self, claims: &[Claim]) -> Result<(), StoreError> {
        let mut guard = self
            .claims
            .lock()
            .map_err(|_| StoreError::Store("claim store mutex poisoned".to_string()))?;
        *guard = claims.to_vec();
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared claim store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedClaimStore {
    /// Inner store implementation.
    inner: Arc<dyn ClaimStore>,
}

impl SharedClaimStore {
    /// Wraps a claim store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ClaimStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ClaimStore for SharedClaimStore {
    fn load_all(&self) -> Result<Vec<Claim>, StoreError> {
        self.inner.load_all()
    }

    fn save_all(&self, claims: &[Claim]) -> Result<(), StoreError> {
        self.inner.save_all(claims)
    }
}

// ============================================================================
// SECTION: Sequential Id Source
// ============================================================================

/// Deterministic claim id source for tests and examples.
#[derive(Debug, Default)]
pub struct SequentialClaimIdSource {
    /// Monotonic counter behind the issued identifiers.
    counter: AtomicU64,
}

impl SequentialClaimIdSource {
    /// Creates a new sequential id source starting at one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }
}

impl ClaimIdSource for SequentialClaimIdSource {
    fn next_id(&self) -> ClaimId {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        ClaimId::new(format!("claim-{next:06}"))
    }
}
