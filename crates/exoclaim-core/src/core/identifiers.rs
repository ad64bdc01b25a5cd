// crates/exoclaim-core/src/core/identifiers.rs
// ============================================================================
// Module: Exoclaim Identifiers
// Description: Canonical identifiers for claims, owners, and resources.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the canonical string-based identifiers used throughout
//! Exoclaim. [`ClaimId`] and [`OwnerId`] are opaque and serialize as strings;
//! validation of their contents is a boundary concern. [`ResourceKey`] is the
//! exception: it can only be obtained through [`ResourceKey::normalize`],
//! which canonicalizes a raw resource identifier or rejects it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of digits accepted in a raw resource identifier.
pub const MAX_RESOURCE_ID_DIGITS: usize = 20;

// ============================================================================
// SECTION: Opaque Identifiers
// ============================================================================

/// Claim record identifier, generated once at creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Creates a new claim identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ClaimId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClaimId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Owner identifier for the authenticated user holding or seeking a claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates a new owner identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Resource Key Normalization
// ============================================================================

/// Normalization errors for raw resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidIdentifierError {
    /// Identifier was empty after coercion to a string.
    #[error("resource identifier is empty")]
    Empty,
    /// Identifier exceeded [`MAX_RESOURCE_ID_DIGITS`] digits.
    #[error("resource identifier has {length} digits (max {MAX_RESOURCE_ID_DIGITS})")]
    TooLong {
        /// Length of the rejected identifier in bytes.
        length: usize,
    },
    /// Identifier contained a non-digit character.
    #[error("resource identifier must contain only ASCII digits")]
    NonNumeric,
}

/// Canonical resource key for a claimable exoplanet record.
///
/// # Invariants
/// - Contains only ASCII digits with no leading zeros (`"0"` itself excepted).
/// - Only [`ResourceKey::normalize`] constructs new keys; deserialization is
///   reserved for data this crate previously serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Canonicalizes a raw resource identifier into a lookup key.
    ///
    /// The raw value must be a digits-only string of 1 to
    /// [`MAX_RESOURCE_ID_DIGITS`] characters. Leading zeros are stripped so
    /// that `"007"` and `"7"` address the same resource; an all-zero input
    /// canonicalizes to `"0"`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIdentifierError`] when the raw value is empty, too
    /// long, or contains a non-digit character.
    pub fn normalize(raw: &str) -> Result<Self, InvalidIdentifierError> {
        if raw.is_empty() {
            return Err(InvalidIdentifierError::Empty);
        }
        if raw.len() > MAX_RESOURCE_ID_DIGITS {
            return Err(InvalidIdentifierError::TooLong {
                length: raw.len(),
            });
        }
        if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidIdentifierError::NonNumeric);
        }
        let trimmed = raw.trim_start_matches('0');
        let canonical = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(Self(canonical.to_string()))
    }

    /// Returns the canonical key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
