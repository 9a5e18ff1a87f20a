//! Application types for CLI commands.
//!
//! Parameters are plain values extracted from the parsed command line so
//! commands can be driven from tests without going through `clap`.

use crate::cli::Format;

/// Parameters for the check command.
///
/// # Example
///
/// ```
/// use sql_review::{app::CheckParams, cli::Format};
///
/// let params = CheckParams {
///     engine:        Some("pg".to_string()),
///     input:         "migration.sql".to_string(),
///     disabled:      vec!["pg_select_star".to_string()],
///     output_format: Format::Json,
///     verbose:       false,
///     no_color:      true
/// };
/// assert_eq!(params.disabled.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CheckParams {
    /// Engine selector, falls back to configuration and then MySQL.
    pub engine:        Option<String>,
    /// Path to the script or "-" for stdin input.
    pub input:         String,
    /// Rule codes disabled on the command line.
    pub disabled:      Vec<String>,
    pub output_format: Format,
    /// Include statement snippets and request details.
    pub verbose:       bool,
    pub no_color:      bool
}

/// Parameters for the rules command.
#[derive(Debug, Clone)]
pub struct RulesParams {
    pub engine:        Option<String>,
    pub disabled:      Vec<String>,
    pub output_format: Format,
    pub no_color:      bool
}

/// Output from CLI command execution.
///
/// # Example
///
/// ```
/// use sql_review::app::CommandOutput;
///
/// let output = CommandOutput {
///     exit_code: 0,
///     stdout:    "mysql\n".to_string()
/// };
/// assert_eq!(output.exit_code, 0);
/// ```
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code for the process (0=clean, 1=warnings, 2=errors).
    pub exit_code: i32,
    /// Rendered text to print to stdout.
    pub stdout:    String
}
