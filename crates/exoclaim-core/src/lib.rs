// crates/exoclaim-core/src/lib.rs
// ============================================================================
// Module: Exoclaim Core Library
// Description: Public API surface for the Exoclaim claim core.
// Purpose: Expose claim types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Exoclaim core provides the invariant-preserving heart of the exoplanet
//! claim registry: identifier normalization, the claim lifecycle state
//! machine, and the serialized write path that guarantees at most one owner
//! holds an active claim on a resource at any instant. It is backend-agnostic
//! and integrates through explicit interfaces rather than embedding into a
//! transport layer.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ClaimIdSource;
pub use interfaces::ClaimStore;
pub use interfaces::StoreError;
pub use runtime::ClaimError;
pub use runtime::ClaimOutcome;
pub use runtime::ClaimRequest;
pub use runtime::ClaimService;
pub use runtime::InMemoryClaimStore;
pub use runtime::QueueError;
pub use runtime::ReleaseRequest;
pub use runtime::ResourceStatus;
pub use runtime::SequentialClaimIdSource;
pub use runtime::SharedClaimStore;
pub use runtime::WriteQueue;
