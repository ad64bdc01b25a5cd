// crates/exoclaim-core/src/runtime/mod.rs
// ============================================================================
// Module: Exoclaim Runtime
// Description: Serialized write queue, claim service, and in-memory store.
// Purpose: Compose the core pieces into the invariant-preserving write path.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime wires the pure core into an operational write path: the
//! [`WriteQueue`] serializes every mutating attempt, the [`ClaimService`]
//! orchestrates normalize → load → decide → persist, and the in-memory store
//! backs tests and examples.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod queue;
pub mod service;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use queue::QueueError;
pub use queue::WriteQueue;
pub use service::ClaimError;
pub use service::ClaimOutcome;
pub use service::ClaimRequest;
pub use service::ClaimService;
pub use service::ReleaseRequest;
pub use service::ResourceStatus;
pub use store::InMemoryClaimStore;
pub use store::SequentialClaimIdSource;
pub use store::SharedClaimStore;
