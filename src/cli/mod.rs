//! CLI module for the Kestrel front end
//!
//! This module provides the command-line interface for the front end.
//!
//! ## Usage
//!
//! - `kestrel <file>...` - Lex, parse and check every file, one job per file
//! - `kestrel --lex <file>` - Tokenize only (debug)
//! - `kestrel --parse <file>` - Parse and dump the tree (debug)
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::{DEFAULT_MAX_DIAGNOSTICS, DiagnosticPolicy, ParseConfig};
use crate::version::KESTREL_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// At least one job was cancelled (e.g. by Ctrl-C).
    pub const CANCELLED: ExitCode = ExitCode(130);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Kestrel compiler front end
#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(version = KESTREL_VERSION)]
#[command(about = "Lex, parse and check Kestrel compilation units", long_about = None)]
pub struct Cli {
    /// Source files to check; each runs as its own job
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Report every diagnostic instead of stopping at the first one
    #[arg(short = 'k', long = "keep-going")]
    pub keep_going: bool,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Diagnostics reported per file (0 = unlimited)
    #[arg(long = "max-diagnostics", value_name = "N", default_value_t = DEFAULT_MAX_DIAGNOSTICS)]
    pub max_diagnostics: usize,

    /// Force plain-text diagnostics even on a terminal
    #[arg(long = "plain")]
    pub plain: bool,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "files")]
    pub lex_file: Option<PathBuf>,

    /// Parse only and dump the tree (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with_all = ["files", "lex_file"])]
    pub parse_file: Option<PathBuf>,
}

impl Cli {
    /// Job configuration described by the flags.
    pub fn parse_config(&self) -> ParseConfig {
        let policy = if self.keep_going {
            DiagnosticPolicy::Accumulate
        } else {
            DiagnosticPolicy::FailFast
        };
        let config = ParseConfig::default()
            .with_policy(policy)
            .with_max_diagnostics(self.max_diagnostics);
        match self.jobs {
            Some(jobs) => config.with_max_parallel_jobs(jobs),
            None => config,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let plain = cli.plain;
    let config = cli.parse_config();
    if let Some(file) = &cli.lex_file {
        return commands::lex_file(&file.to_string_lossy(), &config, plain);
    }
    if let Some(file) = &cli.parse_file {
        return commands::parse_file(&file.to_string_lossy(), &config, plain);
    }
    if cli.files.is_empty() {
        return Err(CliError::failure("Error: no input files (see --help)"));
    }
    commands::check_files(cli.files, config, plain)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_files() {
        let cli = Cli::try_parse_from(["kestrel", "a.kst", "b.kst"]).unwrap();
        assert_eq!(cli.files.len(), 2);
        assert!(!cli.keep_going);
        assert_eq!(cli.parse_config().policy, DiagnosticPolicy::FailFast);
    }

    #[test]
    fn test_cli_parse_keep_going_and_jobs() {
        let cli = Cli::try_parse_from(["kestrel", "-k", "-j", "0", "--max-diagnostics", "5", "a.kst"]).unwrap();
        let config = cli.parse_config();
        assert_eq!(config.policy, DiagnosticPolicy::Accumulate);
        assert_eq!(config.max_parallel_jobs, 1);
        assert_eq!(config.max_diagnostics, 5);
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["kestrel", "--lex", "test.kst"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["kestrel", "--parse", "test.kst"]).unwrap();
        assert!(cli.parse_file.is_some());

        assert!(Cli::try_parse_from(["kestrel", "--lex", "a.kst", "b.kst"]).is_err());
    }

    #[test]
    fn test_no_files_is_an_error() {
        let cli = Cli::try_parse_from(["kestrel"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
