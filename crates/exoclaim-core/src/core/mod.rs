// crates/exoclaim-core/src/core/mod.rs
// ============================================================================
// Module: Exoclaim Core Types
// Description: Domain types for claims, identifiers, lifecycle, and time.
// Purpose: Group the pure, I/O-free building blocks of the claim core.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The core module holds the pure pieces of the claim registry: strongly
//! typed identifiers, the claim record itself, the normalizer for raw
//! resource identifiers, and the lifecycle decision function. Nothing here
//! performs I/O or reads the wall clock.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod claim;
pub mod identifiers;
pub mod lifecycle;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use claim::Claim;
pub use claim::ClaimStatus;
pub use identifiers::ClaimId;
pub use identifiers::InvalidIdentifierError;
pub use identifiers::MAX_RESOURCE_ID_DIGITS;
pub use identifiers::OwnerId;
pub use identifiers::ResourceKey;
pub use lifecycle::ClaimAttempt;
pub use lifecycle::ClaimDecision;
pub use lifecycle::ReleaseDecision;
pub use lifecycle::decide;
pub use lifecycle::decide_release;
pub use time::Timestamp;
