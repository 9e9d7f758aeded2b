//! CLI module for the utility-types generator
//!
//! This module provides the command-line interface.
//!
//! ## Commands
//!
//! - `expand <file>` - Print the source with every utility macro expanded
//! - `check <file>` - Run every expansion and report errors only
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

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::render::RenderConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
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

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Derive Partial and Readonly companion types
#[derive(Parser, Debug)]
#[command(name = "utility-types")]
#[command(version = VERSION)]
#[command(about = "Derive Partial and Readonly companion types for struct and class declarations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE")]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand every @Partial / @Readonly application in a file
    Expand {
        /// Source file to expand
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print only the generated declarations instead of the spliced source
        #[arg(long)]
        fragments: bool,
        /// Spaces per indentation level in generated code
        #[arg(long, value_name = "N", default_value_t = 4)]
        indent: usize,
        /// Omit blank lines between generated members
        #[arg(long)]
        compact: bool,
        /// Write the result to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Run every expansion and report errors without printing output
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
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
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file.to_string_lossy());
    }

    match cli.command {
        Some(Command::Expand {
            file,
            fragments,
            indent,
            compact,
            output,
        }) => {
            let config = render_config(indent, compact);
            let rendered = commands::expand_file(&file.to_string_lossy(), fragments, &config)?;
            commands::emit(&rendered, output.as_deref())
        }
        Some(Command::Check { file }) => commands::check_file(&file.to_string_lossy()),
        None => Err(CliError::failure(
            "Error: no command given (try `utility-types expand <FILE>` or `--help`)",
        )),
    }
}

/// Map the `expand` flags onto a [`RenderConfig`].
fn render_config(indent: usize, compact: bool) -> RenderConfig {
    RenderConfig::new()
        .with_indent_width(indent)
        .with_blank_line_between_members(!compact)
}

// ============================================================================
// Tests
// ============================================================================
