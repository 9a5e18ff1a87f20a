//! Command execution.
//!
//! Each command resolves its options against the loaded configuration,
//! calls into the library and renders the result. Nothing here prints;
//! the binary decides what to do with the returned [`CommandOutput`].

use super::{
    helpers::{calculate_exit_code, create_output_options, read_script_input, resolve_engine},
    types::{CheckParams, CommandOutput, RulesParams}
};
use crate::{
    cli::Format,
    config::Config,
    error::AppResult,
    output::{format_analysis, format_engines, format_rules},
    rules::{AnalyzeOptions, Analyzer, rules_for}
};

/// Executes the check command.
///
/// 1. **Input**: reads the script from a file or stdin, enforcing the file
///    type and size limits
/// 2. **Options**: merges configured and command-line disabled rules and
///    resolves the engine
/// 3. **Analysis**: runs the engine's rules
/// 4. **Rendering**: formats the report and derives the exit code
///
/// # Errors
///
/// Returns an error if the input cannot be read or is rejected. Problems
/// inside the script are reported as issues, never as errors.
///
/// # Example
///
/// ```no_run
/// use sql_review::{
///     app::{CheckParams, run_check},
///     cli::Format,
///     config::Config
/// };
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = CheckParams {
///     engine:        Some("mysql".to_string()),
///     input:         "deploy.sql".to_string(),
///     disabled:      vec![],
///     output_format: Format::Text,
///     verbose:       false,
///     no_color:      false
/// };
/// let output = run_check(params, &Config::default())?;
/// println!("Exit code: {}", output.exit_code);
/// # Ok(())
/// # }
/// ```
pub fn run_check(params: CheckParams, config: &Config) -> AppResult<CommandOutput> {
    let script = read_script_input(&params.input, config.analyzer.max_script_bytes)?;
    let engine = resolve_engine(params.engine.as_deref(), config);
    let options = AnalyzeOptions {
        disabled_rules: config.disabled_with(&params.disabled)
    };

    let analysis = Analyzer::default().analyze(engine, &script, &options);
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);

    Ok(CommandOutput {
        exit_code: calculate_exit_code(&analysis.result.summary),
        stdout:    format_analysis(&analysis, &output_opts)
    })
}

/// Executes the rules command.
///
/// Lists the engine's catalog with the effective state of every rule under
/// the configured and command-line disabled sets.
pub fn run_rules(params: RulesParams, config: &Config) -> CommandOutput {
    let engine = resolve_engine(params.engine.as_deref(), config);
    let options = AnalyzeOptions {
        disabled_rules: config.disabled_with(&params.disabled)
    };
    let states = Analyzer::default().rule_states(engine, &options);
    let output_opts = create_output_options(params.output_format, params.no_color, false);

    CommandOutput {
        exit_code: 0,
        stdout:    format_rules(&rules_for(engine), &states, &output_opts)
    }
}

/// Executes the engines command.
pub fn run_engines(format: Format) -> CommandOutput {
    CommandOutput {
        exit_code: 0,
        stdout:    format_engines(&create_output_options(format, true, false))
    }
}
