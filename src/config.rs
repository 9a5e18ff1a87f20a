//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-review.toml` in current directory
//! 4. `~/.config/sql-review/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [analyzer]
//! engine = "mysql"             # mysql, postgresql (pg), mongodb (mongo)
//! max_script_bytes = 4194304
//!
//! [rules]
//! disabled = ["select_star", "pg_select_without_limit"]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_REVIEW_ENGINE` | Default engine selector |
//! | `SQL_REVIEW_DISABLED_RULES` | JSON array or comma-separated rule codes |
//! | `SQL_REVIEW_LOG` | Log filter (read by the binary) |

use std::{env, fs, path::PathBuf};

use compact_str::CompactString;
use indexmap::IndexSet;
use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Default upper bound for a single script.
pub const DEFAULT_MAX_SCRIPT_BYTES: usize = 4 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub rules:    RulesConfig
}

/// Analyzer defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Engine selector used when none is given on the command line
    pub engine:           Option<String>,
    pub max_script_bytes: usize
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            engine:           None,
            max_script_bytes: DEFAULT_MAX_SCRIPT_BYTES
        }
    }
}

/// Rules configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RulesConfig {
    /// Disabled rule codes
    #[serde(default)]
    pub disabled: Vec<String>
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-review.toml)
    /// 3. Config file in home directory (~/.config/sql-review/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-review")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-review.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        if let Ok(engine) = env::var("SQL_REVIEW_ENGINE") {
            config.analyzer.engine = Some(engine);
        }

        if let Ok(disabled) = env::var("SQL_REVIEW_DISABLED_RULES") {
            config.rules.disabled = parse_disabled_rules(&disabled)?
                .into_iter()
                .map(String::from)
                .collect();
        }

        tracing::debug!(
            engine = config.analyzer.engine.as_deref().unwrap_or("default"),
            disabled = config.rules.disabled.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn from_file(path: &PathBuf) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse a TOML document
    pub fn parse(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Configured disabled codes merged with extra ones, in first-seen order
    pub fn disabled_with<I, S>(&self, extra: I) -> IndexSet<CompactString>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        self.rules
            .disabled
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .map(CompactString::from)
            .chain(
                extra
                    .into_iter()
                    .map(|code| CompactString::from(code.as_ref().trim()))
            )
            .filter(|code| !code.is_empty())
            .collect()
    }
}

/// Parse a disabled-rule list.
///
/// Accepts a JSON array of strings (`["a","b"]`) or a comma-separated list
/// (`a, b`). Blank entries are dropped.
///
/// # Errors
///
/// Returns a config error when the value looks like a JSON array but is not
/// a valid array of strings.
pub fn parse_disabled_rules(raw: &str) -> AppResult<IndexSet<CompactString>> {
    let raw = raw.trim();
    let codes: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw)
            .map_err(|e| config_error(format!("Invalid disabled rule list: {}", e)))?
    } else {
        raw.split(',').map(String::from).collect()
    };
    Ok(codes
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .map(CompactString::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_list() {
        let codes = parse_disabled_rules(" select_star, ,order_by_rand ").unwrap();
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("select_star"));
        assert!(codes.contains("order_by_rand"));
    }

    #[test]
    fn test_parse_json_list() {
        let codes = parse_disabled_rules(r#"["select_star", " ", "into_outfile"]"#).unwrap();
        let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["select_star", "into_outfile"]);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_disabled_rules("[select_star").is_err());
        assert!(parse_disabled_rules("[1, 2]").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_disabled_rules("").unwrap().is_empty());
    }

    #[test]
    fn test_disabled_with_merges_and_dedups() {
        let config = Config {
            rules: RulesConfig {
                disabled: vec!["select_star".into(), " ".into()]
            },
            ..Config::default()
        };
        let merged = config.disabled_with(["order_by_rand", "select_star"]);
        let merged: Vec<&str> = merged.iter().map(|c| c.as_str()).collect();
        assert_eq!(merged, vec!["select_star", "order_by_rand"]);
    }
}
