//! Result rendering.
//!
//! Text output is meant for terminals and uses [`colored`]; JSON and YAML
//! render the same serializable values the library returns.

use colored::Colorize;
use serde::Serialize;

use crate::{
    engine::Engine,
    report::Analysis,
    rules::{Issue, RuleCatalog, RuleState, Severity}
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Catalog listing for serialization
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesListing<'a> {
    pub engine:        Engine,
    pub rules_version: &'static str,
    pub rules:         &'a [RuleState]
}

/// Engine entry for serialization
#[derive(Debug, Serialize)]
pub struct EngineInfo {
    pub name:    Engine,
    pub aliases: &'static [&'static str]
}

fn structured<T: Serialize>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value).unwrap_or_default()),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Text => None
    }
}

fn paint(text: &str, opts: &OutputOptions, style: fn(&str) -> colored::ColoredString) -> String {
    if opts.colored {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn severity_tag(severity: Severity, opts: &OutputOptions) -> String {
    let tag = format!("[{}]", severity);
    if !opts.colored {
        return tag;
    }
    match severity {
        Severity::Error => tag.red().bold().to_string(),
        Severity::Warning => tag.yellow().bold().to_string(),
        Severity::Info => tag.blue().to_string()
    }
}

fn location(issue: &Issue) -> String {
    if issue.statement_index == 0 {
        String::from("script")
    } else {
        format!("#{}", issue.statement_index)
    }
}

/// Format an analysis report
pub fn format_analysis(analysis: &Analysis, opts: &OutputOptions) -> String {
    if let Some(out) = structured(analysis, opts.format) {
        return out;
    }

    let result = &analysis.result;
    let summary = &result.summary;
    let mut output = String::new();

    let header = format!(
        "=== SQL Review: {} (rules {}) ===",
        analysis.engine, result.rules_version
    );
    output.push_str(&paint(&header, opts, |s| s.bold()));
    output.push_str("\n\n");
    output.push_str(&format!(
        "Statements: {}  Errors: {}  Warnings: {}  Info: {}\n",
        summary.statement_count, summary.error_count, summary.warning_count, summary.info_count
    ));

    if !result.issues.is_empty() {
        output.push('\n');
    }
    for issue in &result.issues {
        output.push_str(&format!(
            "{} {} {}\n",
            severity_tag(issue.severity, opts),
            location(issue),
            paint(issue.rule_code, opts, |s| s.cyan())
        ));
        output.push_str(&format!("  {}\n", issue.message));
        if !issue.suggestion.is_empty() {
            output.push_str(&format!("  Suggestion: {}\n", issue.suggestion));
        }
        if opts.verbose && !issue.statement.is_empty() {
            for line in issue.statement.lines() {
                output.push_str(&format!("  | {}\n", paint(line, opts, |s| s.dimmed())));
            }
        }
    }

    output.push_str(&format!("\n{}\n", paint("Advice:", opts, |s| s.bold())));
    for line in &result.advice {
        output.push_str(&format!("  - {}\n", line));
    }

    if !analysis.forced_enabled.is_empty() {
        let codes: Vec<&str> = analysis.forced_enabled.iter().map(|c| c.as_str()).collect();
        let note = format!("\nNote: always-enabled rules cannot be disabled: {}\n", codes.join(", "));
        output.push_str(&paint(&note, opts, |s| s.yellow()));
    }
    if opts.verbose && !analysis.disabled_rules.is_empty() {
        let codes: Vec<&str> = analysis.disabled_rules.iter().map(|c| c.as_str()).collect();
        output.push_str(&format!("Disabled rules: {}\n", codes.join(", ")));
    }
    if opts.verbose {
        output.push_str(&format!("Checked at: {}\n", result.checked_at));
    }

    output
}

/// Format a rule catalog with per-rule state
pub fn format_rules(catalog: &RuleCatalog, states: &[RuleState], opts: &OutputOptions) -> String {
    let listing = RulesListing {
        engine:        catalog.engine,
        rules_version: catalog.rules_version,
        rules:         states
    };
    if let Some(out) = structured(&listing, opts.format) {
        return out;
    }

    let header = format!("=== {} rules ({}) ===", catalog.engine, catalog.rules_version);
    let mut output = paint(&header, opts, |s| s.bold());
    output.push_str("\n\n");

    let width = states.iter().map(|s| s.rule.code.len()).max().unwrap_or(0);
    for state in states {
        let marker = match (state.always_enabled, state.enabled) {
            (true, _) => "always",
            (false, true) => "on",
            (false, false) => "off"
        };
        let code = format!("{:<width$}", state.rule.code, width = width);
        output.push_str(&format!(
            "{:<7} {:<8} {}  {} ({})\n",
            marker,
            severity_tag(state.rule.severity, opts),
            paint(&code, opts, |s| s.cyan()),
            state.rule.description,
            state.rule.category
        ));
    }

    output
}

/// Format the supported engine list
pub fn format_engines(opts: &OutputOptions) -> String {
    let engines: Vec<EngineInfo> = Engine::ALL
        .iter()
        .map(|engine| EngineInfo {
            name:    *engine,
            aliases: engine.aliases()
        })
        .collect();
    if let Some(out) = structured(&engines, opts.format) {
        return out;
    }

    engines
        .iter()
        .map(|info| {
            if info.aliases.is_empty() {
                format!("{}\n", info.name)
            } else {
                format!("{} (aliases: {})\n", info.name, info.aliases.join(", "))
            }
        })
        .collect()
}
