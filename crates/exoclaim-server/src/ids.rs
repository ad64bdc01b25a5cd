// crates/exoclaim-server/src/ids.rs
// ============================================================================
// Module: Claim Id Generation
// Description: Random claim identifier source for production use.
// Purpose: Supply never-reused claim ids to the claim core.
// Dependencies: exoclaim-core, rand
// ============================================================================

//! ## Overview
//! The core treats id generation as a host concern so its decision logic
//! stays deterministic. This module supplies the production source: 128 bits
//! of process randomness rendered as hex, which makes reuse across restarts
//! vanishingly unlikely without any coordination.

// ============================================================================
// SECTION: Imports
// ============================================================================

use exoclaim_core::ClaimId;
use exoclaim_core::ClaimIdSource;

// ============================================================================
// SECTION: Random Id Source
// ============================================================================

/// Claim id source backed by the process RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomClaimIdSource;

impl RandomClaimIdSource {
    /// Creates a new random id source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ClaimIdSource for RandomClaimIdSource {
    fn next_id(&self) -> ClaimId {
        let value: u128 = rand::random();
        ClaimId::new(format!("claim-{value:032x}"))
    }
}
