// crates/exoclaim-server/src/identity.rs
// ============================================================================
// Module: Caller Identity
// Description: Extraction of the authenticated caller from request headers.
// Purpose: Hand the claim core a caller identity without owning auth mechanics.
// Dependencies: axum, exoclaim-core
// ============================================================================

//! ## Overview
//! The claim core requires an authenticated caller identity handed to it; it
//! does not authenticate anyone. This module reads the identity a trusted
//! upstream authenticator injects into request headers. Requests reaching
//! this server without those headers are rejected as unauthenticated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderMap;
use exoclaim_core::OwnerId;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the authenticated user identifier.
pub const USER_ID_HEADER: &str = "x-exoclaim-user";
/// Header carrying the authenticated user's display name.
pub const DISPLAY_NAME_HEADER: &str = "x-exoclaim-name";
/// Maximum accepted length for either identity header value.
const MAX_IDENTITY_VALUE_LENGTH: usize = 256;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Identity extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No user identifier header was present.
    #[error("missing authenticated caller identity")]
    Missing,
    /// A header value was empty, oversized, or not valid UTF-8.
    #[error("malformed caller identity header")]
    Malformed,
}

/// Authenticated caller identity supplied by the upstream authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Stable user identifier.
    pub owner_id: OwnerId,
    /// Display name snapshotted into new claim records.
    pub display_name: String,
}

impl CallerIdentity {
    /// Extracts the caller identity from request headers.
    ///
    /// The display name header is optional; it falls back to the user
    /// identifier so a claim record always carries a non-empty name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the user header is absent or either
    /// header is malformed.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, IdentityError> {
        let user = match headers.get(USER_ID_HEADER) {
            Some(value) => header_text(value.as_bytes())?,
            None => return Err(IdentityError::Missing),
        };
        let display_name = match headers.get(DISPLAY_NAME_HEADER) {
            Some(value) => header_text(value.as_bytes())?,
            None => user.clone(),
        };
        Ok(Self {
            owner_id: OwnerId::new(user),
            display_name,
        })
    }
}

/// Validates and decodes one identity header value.
fn header_text(bytes: &[u8]) -> Result<String, IdentityError> {
    if bytes.is_empty() || bytes.len() > MAX_IDENTITY_VALUE_LENGTH {
        return Err(IdentityError::Malformed);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| IdentityError::Malformed)?;
    Ok(text.to_string())
}
