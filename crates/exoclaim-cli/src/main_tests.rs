// crates/exoclaim-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Unit tests for the offline CLI commands.
// Purpose: Ensure inspect and config validation behave against real files.
// Dependencies: exoclaim-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Exercises the offline commands with real files in a temporary directory:
//! store inspection over active and released records, degrade-to-empty on a
//! missing store, and fail-closed config validation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use exoclaim_core::Claim;
use exoclaim_core::ClaimId;
use exoclaim_core::ClaimStatus;
use exoclaim_core::ClaimStore;
use exoclaim_core::OwnerId;
use exoclaim_core::ResourceKey;
use exoclaim_core::Timestamp;
use exoclaim_store_json::JsonFileClaimStore;
use serde_json::json;
use tempfile::TempDir;

use super::ConfigValidateCommand;
use super::InspectCommand;
use super::command_config_validate;
use super::command_inspect;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn claim(id: &str, resource: &str, owner: &str, status: ClaimStatus) -> Claim {
    Claim {
        id: ClaimId::new(id),
        resource_key: ResourceKey::normalize(resource).expect("fixture key"),
        owner_id: OwnerId::new(owner),
        owner_display_name: format!("{owner} display"),
        status,
        claimed_at: Timestamp::from_unix_millis(1_000),
        attached_data: json!({ "name": format!("Kepler-{resource}") }),
    }
}

fn seeded_store(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("claims.json");
    let store = JsonFileClaimStore::new(&path).expect("open store");
    store
        .save_all(&[
            claim("claim-1", "42", "u1", ClaimStatus::Active),
            claim("claim-2", "7", "u2", ClaimStatus::Released),
        ])
        .expect("seed claims");
    path
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("exoclaim.toml");
    fs::write(&path, contents).expect("write config");
    path
}

// ============================================================================
// SECTION: Inspect Tests
// ============================================================================

#[test]
fn inspect_reads_a_seeded_store() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);
    let result = command_inspect(&InspectCommand {
        store,
        all: false,
    });
    assert!(result.is_ok(), "inspect failed: {result:?}");
}

#[test]
fn inspect_includes_released_records_with_all() {
    let dir = TempDir::new().expect("tempdir");
    let store = seeded_store(&dir);
    let result = command_inspect(&InspectCommand {
        store,
        all: true,
    });
    assert!(result.is_ok(), "inspect --all failed: {result:?}");
}

#[test]
fn inspect_tolerates_a_missing_store_file() {
    let dir = TempDir::new().expect("tempdir");
    let result = command_inspect(&InspectCommand {
        store: dir.path().join("absent.json"),
        all: false,
    });
    assert!(result.is_ok(), "missing store must read as empty: {result:?}");
}

// ============================================================================
// SECTION: Config Validation Tests
// ============================================================================

#[test]
fn config_validate_accepts_a_valid_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "[server]\nbind = \"127.0.0.1:7000\"\n\n[store]\ntype = \"json\"\npath = \"claims.json\"\n",
    );
    let result = command_config_validate(&ConfigValidateCommand {
        config: Some(path),
    });
    assert!(result.is_ok(), "valid config rejected: {result:?}");
}

#[test]
fn config_validate_rejects_a_bad_bind_address() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server]\nbind = \"not-an-address\"\n");
    let error = command_config_validate(&ConfigValidateCommand {
        config: Some(path.clone()),
    })
    .expect_err("bad bind must fail");
    assert!(error.to_string().contains(&path.display().to_string()));
}

#[test]
fn config_validate_rejects_a_missing_file() {
    let missing = Path::new("/nonexistent/exoclaim.toml");
    let error = command_config_validate(&ConfigValidateCommand {
        config: Some(missing.to_path_buf()),
    })
    .expect_err("missing file must fail");
    assert!(error.to_string().contains("failed to load"));
}
