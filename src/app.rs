//! Application logic for the `sql-review` CLI.
//!
//! This module contains the command implementations separated from the main
//! entry point to enable testing.
//!
//! # Submodules
//!
//! - [`types`] - command parameters and outputs
//! - [`convert`] - CLI to internal type conversions
//! - [`helpers`] - input reading, option resolution, exit codes
//! - [`commands`] - `check`, `rules` and `engines` execution

mod commands;
mod convert;
mod helpers;
mod types;

pub use commands::{run_check, run_engines, run_rules};
pub use convert::convert_format;
pub use helpers::{
    SUPPORTED_EXTENSIONS, calculate_exit_code, check_file_extension, create_output_options,
    enforce_size_limit, read_script_input, resolve_engine
};
pub use types::{CheckParams, CommandOutput, RulesParams};
