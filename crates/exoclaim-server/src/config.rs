// crates/exoclaim-server/src/config.rs
// ============================================================================
// Module: Exoclaim Configuration
// Description: Configuration loading and validation for the Exoclaim server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Missing
//! or invalid configuration fails closed; the built-in defaults are only used
//! when the host explicitly asks for them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "exoclaim.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "EXOCLAIM_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default bind address for the HTTP server.
const DEFAULT_BIND: &str = "127.0.0.1:8087";
/// Default claim store file path.
const DEFAULT_STORE_PATH: &str = "claims.json";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Minimum accepted request body limit.
const MIN_MAX_BODY_BYTES: usize = 1024;
/// Maximum accepted request body limit.
const MAX_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config read error: {0}")]
    Read(String),
    /// Config file exceeded the size limit.
    #[error("config file exceeds {MAX_CONFIG_FILE_SIZE} bytes")]
    TooLarge,
    /// Config file failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config contents failed validation.
    #[error("config validation error: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Claim store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory store; contents vanish on restart.
    Memory,
    /// JSON file store with atomic replacement.
    #[default]
    Json,
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines to stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit events discarded.
    None,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Claim store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Selected backend.
    #[serde(default, rename = "type")]
    pub store_type: StoreType,
    /// Path of the claim file for the JSON backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Json,
            path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
        }
    }
}

/// Audit logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default, rename = "sink")]
    pub sink_type: AuditSinkType,
    /// Path of the audit log for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            sink_type: AuditSinkType::Stderr,
            path: None,
        }
    }
}

/// Top-level Exoclaim server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExoclaimConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Claim store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ExoclaimConfig {
    /// Resolves the configuration path from an explicit argument, the
    /// `EXOCLAIM_CONFIG` environment variable, or the default filename.
    #[must_use]
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(path) = env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_CONFIG_NAME)
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized,
    /// unparsable, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read(err.to_string()))?;
        if raw.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge);
        }
        let config: Self =
            toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, failing closed on any inconsistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.server.max_body_bytes < MIN_MAX_BODY_BYTES
            || self.server.max_body_bytes > MAX_MAX_BODY_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes must be between {MIN_MAX_BODY_BYTES} and {MAX_MAX_BODY_BYTES}"
            )));
        }
        if self.store.store_type == StoreType::Json
            && self.store.path.as_ref().is_none_or(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid("json store requires a path".to_string()));
        }
        if self.audit.sink_type == AuditSinkType::File
            && self.audit.path.as_ref().is_none_or(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid("file audit sink requires a path".to_string()));
        }
        Ok(())
    }

    /// Parses the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.server.bind)))
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}
