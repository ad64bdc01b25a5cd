// crates/exoclaim-server/tests/config.rs
// ============================================================================
// Module: Configuration Tests
// Description: Integration tests for config loading and validation.
// Purpose: Validate fail-closed parsing, defaults, and path resolution.
// Dependencies: exoclaim-server, tempfile
// ============================================================================

//! ## Overview
//! Exercises TOML loading, strict validation, and config path resolution with
//! real files in a temporary directory.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions over config fixtures."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::path::Path;
use std::path::PathBuf;

use exoclaim_server::AuditSinkType;
use exoclaim_server::ConfigError;
use exoclaim_server::ExoclaimConfig;
use exoclaim_server::StoreType;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("exoclaim.toml");
    fs::write(&path, contents).expect("write config");
    path
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn defaults_are_valid_and_bind_locally() {
    let config = ExoclaimConfig::default();
    config.validate().expect("default config valid");
    let addr = config.bind_addr().expect("default bind parses");
    assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(addr.port(), 8087);
    assert_eq!(config.store.store_type, StoreType::Json);
    assert_eq!(config.audit.sink_type, AuditSinkType::Stderr);
}

#[test]
fn load_accepts_a_complete_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
[server]
bind = "0.0.0.0:9090"
max_body_bytes = 32768

[store]
type = "json"
path = "/var/lib/exoclaim/claims.json"

[audit]
sink = "none"
"#,
    );
    let config = ExoclaimConfig::load(&path).expect("load config");
    assert_eq!(config.server.bind, "0.0.0.0:9090");
    assert_eq!(config.server.max_body_bytes, 32768);
    assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/exoclaim/claims.json")));
    assert_eq!(config.audit.sink_type, AuditSinkType::None);
}

#[test]
fn load_fills_missing_sections_with_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server]\nbind = \"127.0.0.1:7000\"\n");
    let config = ExoclaimConfig::load(&path).expect("load config");
    assert_eq!(config.server.bind, "127.0.0.1:7000");
    assert_eq!(config.store.store_type, StoreType::Json);
    assert_eq!(config.store.path, Some(PathBuf::from("claims.json")));
}

#[test]
fn load_rejects_unknown_fields() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server]\nbind = \"127.0.0.1:7000\"\nworkers = 4\n");
    let error = ExoclaimConfig::load(&path).expect_err("unknown field must fail");
    assert!(matches!(error, ConfigError::Parse(_)), "got {error}");
}

#[test]
fn load_rejects_missing_file() {
    let dir = TempDir::new().expect("tempdir");
    let error = ExoclaimConfig::load(&dir.path().join("absent.toml")).expect_err("missing file");
    assert!(matches!(error, ConfigError::Read(_)), "got {error}");
}

#[test]
fn validate_rejects_bad_bind_address() {
    let mut config = ExoclaimConfig::default();
    config.server.bind = "not-an-address".to_string();
    let error = config.validate().expect_err("bad bind must fail");
    assert!(matches!(error, ConfigError::Invalid(_)), "got {error}");
}

#[test]
fn validate_rejects_out_of_range_body_limit() {
    let mut config = ExoclaimConfig::default();
    config.server.max_body_bytes = 16;
    assert!(config.validate().is_err(), "body limit below the floor must fail");

    config.server.max_body_bytes = 16 * 1024 * 1024;
    assert!(config.validate().is_err(), "body limit above the ceiling must fail");
}

#[test]
fn validate_rejects_json_store_without_path() {
    let mut config = ExoclaimConfig::default();
    config.store.store_type = StoreType::Json;
    config.store.path = None;
    assert!(config.validate().is_err());

    config.store.path = Some(PathBuf::new());
    assert!(config.validate().is_err(), "empty path must fail");
}

#[test]
fn validate_rejects_file_sink_without_path() {
    let mut config = ExoclaimConfig::default();
    config.audit.sink_type = AuditSinkType::File;
    config.audit.path = None;
    assert!(config.validate().is_err());
}

#[test]
fn resolve_path_prefers_explicit_argument() {
    let explicit = PathBuf::from("/etc/exoclaim/custom.toml");
    let resolved = ExoclaimConfig::resolve_path(Some(Path::new("/etc/exoclaim/custom.toml")));
    assert_eq!(resolved, explicit);
}
