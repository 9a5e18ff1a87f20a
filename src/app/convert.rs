//! Type conversion functions for CLI to internal types.

use crate::{cli::Format, output::OutputFormat};

/// Converts a CLI format enum to the internal output format type.
///
/// # Example
///
/// ```
/// use sql_review::{app::convert_format, cli::Format, output::OutputFormat};
///
/// let format = convert_format(Format::Json);
/// assert!(matches!(format, OutputFormat::Json));
/// ```
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}
