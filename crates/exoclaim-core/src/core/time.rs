// crates/exoclaim-core/src/core/time.rs
// ============================================================================
// Module: Exoclaim Time Model
// Description: Canonical timestamp representation for claim records.
// Purpose: Provide explicit, host-supplied time values across claim records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Exoclaim uses explicit time values embedded in claim requests to keep the
//! lifecycle decision function pure and replayable. The core never reads
//! wall-clock time directly; hosts must supply timestamps with each request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in claim records, in unix-epoch milliseconds.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix-epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix-epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}
