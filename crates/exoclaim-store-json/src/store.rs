// crates/exoclaim-store-json/src/store.rs
// ============================================================================
// Module: JSON Claim Store
// Description: Whole-collection claim persistence in a single JSON file.
// Purpose: Persist claims with atomic replacement and resilient reads.
// Dependencies: exoclaim-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This module implements a durable [`ClaimStore`] over one JSON file holding
//! the full claim array. Saves write into a temporary file in the same
//! directory and atomically rename it over the target, so a failed persist
//! leaves the previous contents byte-for-byte intact. Loads degrade to an
//! empty collection on a missing, oversized, or corrupt file; read resilience
//! takes precedence over strict validation at the storage boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use exoclaim_core::Claim;
use exoclaim_core::ClaimStore;
use exoclaim_core::StoreError;
use tempfile::NamedTempFile;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum claim file size accepted on load, in bytes.
pub const MAX_CLAIM_FILE_BYTES: u64 = 16 * 1024 * 1024;

// ============================================================================
// SECTION: JSON File Store
// ============================================================================

/// Claim store backed by a single JSON file.
///
/// # Invariants
/// - The target file only ever holds a complete serialized claim array;
///   partially written state lives in a temporary file until the rename.
#[derive(Debug, Clone)]
pub struct JsonFileClaimStore {
    /// Path of the claim collection file.
    path: PathBuf,
}

impl JsonFileClaimStore {
    /// Opens a JSON claim store at the given path.
    ///
    /// The file itself may not exist yet; its parent directory is created so
    /// the first save can land.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the parent directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|err| StoreError::Io(format!("create claim store directory: {err}")))?;
        }
        Ok(Self {
            path,
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClaimStore for JsonFileClaimStore {
    fn load_all(&self) -> Result<Vec<Claim>, StoreError> {
        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.len() > MAX_CLAIM_FILE_BYTES => return Ok(Vec::new()),
            Ok(_) => {}
            Err(_) => return Ok(Vec::new()),
        }
        let Ok(bytes) = fs::read(&self.path) else {
            return Ok(Vec::new());
        };
        // Unparsable contents degrade to empty instead of failing the
        // claim-check path on a damaged store.
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }

    fn save_all(&self, claims: &[Claim]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(claims)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(directory)
            .map_err(|err| StoreError::Io(format!("stage claim file: {err}")))?;
        staged
            .write_all(&bytes)
            .map_err(|err| StoreError::Io(format!("write claim file: {err}")))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|err| StoreError::Io(format!("sync claim file: {err}")))?;
        staged
            .persist(&self.path)
            .map_err(|err| StoreError::Io(format!("replace claim file: {err}")))?;
        Ok(())
    }
}
