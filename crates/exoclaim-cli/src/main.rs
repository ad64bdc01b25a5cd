// crates/exoclaim-cli/src/main.rs
// ============================================================================
// Module: Exoclaim CLI Entry Point
// Description: Command dispatcher for the Exoclaim claim server and stores.
// Purpose: Start the HTTP server and inspect claim files offline.
// Dependencies: clap, exoclaim-core, exoclaim-server, exoclaim-store-json, tokio
// ============================================================================

//! ## Overview
//! The Exoclaim CLI starts the claim HTTP server from a TOML configuration
//! file and provides offline utilities for validating configuration and
//! inspecting a claim store file without a running server.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use exoclaim_core::Claim;
use exoclaim_core::ClaimStore;
use exoclaim_server::ExoclaimConfig;
use exoclaim_server::HttpServer;
use exoclaim_store_json::JsonFileClaimStore;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "exoclaim", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Exoclaim claim HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Inspect a claim store file offline.
    Inspect(InspectCommand),
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to exoclaim.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an Exoclaim configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to exoclaim.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for claim store inspection.
#[derive(Args, Debug)]
struct InspectCommand {
    /// Path to the claim store JSON file.
    #[arg(long, value_name = "PATH")]
    store: PathBuf,
    /// Include released claims in the output.
    #[arg(long)]
    all: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a human-readable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::Inspect(command) => command_inspect(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let path = ExoclaimConfig::resolve_path(command.config.as_deref());
    let config = ExoclaimConfig::load(&path)
        .map_err(|err| CliError::new(format!("failed to load {}: {err}", path.display())))?;
    let server = HttpServer::from_config(config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let path = ExoclaimConfig::resolve_path(command.config.as_deref());
    ExoclaimConfig::load(&path)
        .map_err(|err| CliError::new(format!("failed to load {}: {err}", path.display())))?;
    write_stdout_line(&format!("config ok: {}", path.display()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Inspect Command
// ============================================================================

/// Executes the claim store inspection command.
fn command_inspect(command: &InspectCommand) -> CliResult<ExitCode> {
    let store = JsonFileClaimStore::new(command.store.clone())
        .map_err(|err| CliError::new(format!("failed to open store: {err}")))?;
    let claims = store
        .load_all()
        .map_err(|err| CliError::new(format!("failed to read store: {err}")))?;
    let selected: Vec<&Claim> =
        claims.iter().filter(|claim| command.all || claim.is_active()).collect();
    let output = serde_json::json!({
        "path": command.store.display().to_string(),
        "total": claims.len(),
        "shown": selected.len(),
        "claims": selected,
    });
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|err| CliError::new(format!("failed to render claims: {err}")))?;
    write_stdout_line(&rendered)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(line: &str) -> CliResult<()> {
    writeln!(io::stdout(), "{line}")
        .map_err(|err| CliError::new(format!("stdout write failed: {err}")))
}

/// Writes an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = writeln!(io::stderr(), "error: {message}");
    ExitCode::FAILURE
}
