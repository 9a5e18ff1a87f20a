//! Helper functions for CLI operations.
//!
//! This module provides utility functions used by the commands for tasks
//! such as reading and validating input, resolving the engine and
//! calculating exit codes.

use std::{
    fs::{self, read_to_string},
    io::{self, Read},
    path::Path
};

use super::convert::convert_format;
use crate::{
    cli::Format,
    config::Config,
    engine::Engine,
    error::{AppResult, file_read_error, input_too_large_error, unsupported_file_error},
    output::OutputOptions,
    report::Summary
};

/// File extensions accepted for script files (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["sql", "txt", "js", "mongo"];

/// Calculates the process exit code based on issue severities.
///
/// Returns an exit code reflecting the highest severity found:
/// - `0` - No issues or only informational messages
/// - `1` - At least one warning present
/// - `2` - At least one error present
///
/// # Arguments
///
/// * `summary` - Counts of the final, filtered issue list
///
/// # Returns
///
/// An integer exit code (0, 1, or 2).
///
/// # Example
///
/// ```
/// use sql_review::{app::calculate_exit_code, report::Summary};
///
/// let summary = Summary {
///     statement_count: 2,
///     warning_count: 1,
///     ..Summary::default()
/// };
/// assert_eq!(calculate_exit_code(&summary), 1);
/// ```
pub fn calculate_exit_code(summary: &Summary) -> i32 {
    if summary.error_count > 0 {
        2
    } else if summary.warning_count > 0 {
        1
    } else {
        0
    }
}

/// Rejects file paths without a supported script extension.
///
/// # Arguments
///
/// * `path` - Script file path
///
/// # Errors
///
/// Returns a bad-request error naming the file when the extension is
/// missing or not one of [`SUPPORTED_EXTENSIONS`].
pub fn check_file_extension(path: &str) -> AppResult<()> {
    let supported = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });
    if supported {
        Ok(())
    } else {
        Err(unsupported_file_error(path))
    }
}

/// Rejects scripts larger than `limit` bytes.
pub fn enforce_size_limit(size: usize, limit: usize) -> AppResult<()> {
    if size > limit {
        return Err(input_too_large_error(size, limit));
    }
    Ok(())
}

/// Reads a script from a file or stdin.
///
/// Supports reading from a file path or from standard input when the
/// path is "-". Files must carry a supported extension; both sources are
/// bounded by `max_bytes`.
///
/// # Arguments
///
/// * `path` - File path or "-" for stdin
/// * `max_bytes` - Upper bound for the script size
///
/// # Returns
///
/// The script contents as a string.
///
/// # Errors
///
/// Returns an error if the file type is not supported, the script exceeds
/// the size limit, or reading fails.
pub fn read_script_input(path: &str, max_bytes: usize) -> AppResult<String> {
    let script = if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        buffer
    } else {
        check_file_extension(path)?;
        let size = fs::metadata(path).map_err(|e| file_read_error(path, e))?.len();
        enforce_size_limit(usize::try_from(size).unwrap_or(usize::MAX), max_bytes)?;
        read_to_string(path).map_err(|e| file_read_error(path, e))?
    };
    enforce_size_limit(script.len(), max_bytes)?;
    tracing::debug!(source = path, bytes = script.len(), "script read");
    Ok(script)
}

/// Resolves the engine from the command line, then configuration.
///
/// # Arguments
///
/// * `selector` - Engine given on the command line, if any
/// * `config` - Loaded configuration
///
/// # Returns
///
/// The normalized engine, MySQL when nothing is selected.
pub fn resolve_engine(selector: Option<&str>, config: &Config) -> Engine {
    selector
        .or(config.analyzer.engine.as_deref())
        .map(Engine::normalize)
        .unwrap_or_default()
}

/// Creates output options from CLI parameters.
///
/// # Arguments
///
/// * `format` - Output format (text, json, yaml)
/// * `no_color` - Whether to disable colored output
/// * `verbose` - Whether to enable verbose output
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_exit_code_levels() {
        let mut summary = Summary::default();
        assert_eq!(calculate_exit_code(&summary), 0);
        summary.info_count = 3;
        assert_eq!(calculate_exit_code(&summary), 0);
        summary.warning_count = 1;
        assert_eq!(calculate_exit_code(&summary), 1);
        summary.error_count = 1;
        assert_eq!(calculate_exit_code(&summary), 2);
    }

    #[test]
    fn test_file_extension_check() {
        assert!(check_file_extension("deploy.sql").is_ok());
        assert!(check_file_extension("deploy.SQL").is_ok());
        assert!(check_file_extension("ops/cleanup.mongo").is_ok());
        assert!(check_file_extension("script.js").is_ok());
        assert!(check_file_extension("notes.txt").is_ok());
        assert!(check_file_extension("deploy.sh").is_err());
        assert!(check_file_extension("Makefile").is_err());
    }

    #[test]
    fn test_size_limit() {
        assert!(enforce_size_limit(10, 10).is_ok());
        assert!(enforce_size_limit(11, 10).is_err());
    }

    #[test]
    fn test_read_script_from_file() {
        let mut file = Builder::new().suffix(".sql").tempfile().unwrap();
        write!(file, "SELECT 1;").unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(read_script_input(path, 1024).unwrap(), "SELECT 1;");
        assert!(read_script_input(path, 4).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_script_input("/nonexistent/path/script.sql", 1024).is_err());
    }

    #[test]
    fn test_resolve_engine_precedence() {
        let mut config = Config::default();
        assert_eq!(resolve_engine(None, &config), Engine::MySql);
        config.analyzer.engine = Some("mongo".to_string());
        assert_eq!(resolve_engine(None, &config), Engine::MongoDb);
        assert_eq!(resolve_engine(Some("pg"), &config), Engine::PostgreSql);
    }

    #[test]
    fn test_create_output_options() {
        let opts = create_output_options(Format::Json, true, true);
        assert!(matches!(opts.format, OutputFormat::Json));
        assert!(!opts.colored);
        assert!(opts.verbose);
    }
}
