//! Type definitions for the rule catalogs.
//!
//! - [`Severity`] - issue severity levels (Info, Warning, Error)
//! - [`RuleCategory`] - what kind of risk a rule guards against
//! - [`RuleDefinition`] - one immutable catalog entry
//! - [`Issue`] - a finding tied to a statement
//! - [`RuleCatalog`] / [`RuleState`] - catalog views for listing

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;

/// Severity level of an issue.
///
/// Ordered from lowest to highest so sorting and exit codes can compare
/// severities directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, does not affect exit code
    Info,
    /// Medium risk (exit code 1)
    Warning,
    /// High risk, should block automatic execution (exit code 2)
    Error
}

impl Severity {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error"
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR")
        }
    }
}

/// Risk area a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    InputValidation,
    ChangeScale,
    ScriptSyntax,
    DangerousDdl,
    DdlCompatibility,
    DmlSafety,
    ConditionValidity,
    QueryConvention,
    QueryPerformance,
    DataSecurity,
    Maintainability,
    Idempotency,
    TransactionConsistency,
    DdlConcurrency,
    WriteSafety,
    QuerySafety,
    DataFlow
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InputValidation => "Input validation",
            Self::ChangeScale => "Change scale",
            Self::ScriptSyntax => "Script syntax",
            Self::DangerousDdl => "Dangerous DDL",
            Self::DdlCompatibility => "DDL compatibility",
            Self::DmlSafety => "DML safety",
            Self::ConditionValidity => "Condition validity",
            Self::QueryConvention => "Query convention",
            Self::QueryPerformance => "Query performance",
            Self::DataSecurity => "Data security",
            Self::Maintainability => "Maintainability",
            Self::Idempotency => "Idempotency",
            Self::TransactionConsistency => "Transaction consistency",
            Self::DdlConcurrency => "DDL concurrency",
            Self::WriteSafety => "Write safety",
            Self::QuerySafety => "Query safety",
            Self::DataFlow => "Data flow"
        };
        f.write_str(label)
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    /// Stable rule code (e.g. `"update_without_where"`)
    pub code:        &'static str,
    pub severity:    Severity,
    pub category:    RuleCategory,
    pub description: &'static str
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// 1-based statement index, `0` for script-level findings
    pub statement_index: usize,
    pub severity:        Severity,
    pub rule_code:       &'static str,
    pub message:         String,
    pub suggestion:      &'static str,
    /// Offending statement text, empty for script-level findings
    pub statement:       String
}

impl Issue {
    /// Build an issue carrying the rule's code and severity.
    pub fn new(
        rule: &RuleDefinition,
        statement_index: usize,
        message: impl Into<String>,
        suggestion: &'static str,
        statement: impl Into<String>
    ) -> Self {
        Self {
            statement_index,
            severity: rule.severity,
            rule_code: rule.code,
            message: message.into(),
            suggestion,
            statement: statement.into()
        }
    }

    /// Script-level issue without a statement snippet.
    pub fn script(rule: &RuleDefinition, message: impl Into<String>, suggestion: &'static str) -> Self {
        Self::new(rule, 0, message, suggestion, String::new())
    }
}

/// Versioned rule set of one engine.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCatalog {
    pub engine:        Engine,
    pub rules_version: &'static str,
    pub rules:         &'static [RuleDefinition]
}

impl RuleCatalog {
    pub fn contains(&self, code: &str) -> bool {
        self.rules.iter().any(|r| r.code == code)
    }
}

/// Catalog entry together with its effective state for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleState {
    #[serde(flatten)]
    pub rule:           RuleDefinition,
    pub enabled:        bool,
    pub always_enabled: bool
}
