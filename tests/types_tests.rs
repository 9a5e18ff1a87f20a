// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_review::{
    engine::Engine,
    rules::{Issue, RuleCategory, RuleDefinition, Severity, rules_for}
};

const SAMPLE: RuleDefinition = RuleDefinition {
    code:        "sample_rule",
    severity:    Severity::Warning,
    category:    RuleCategory::QueryConvention,
    description: "Sample"
};

#[test]
fn test_severity_display() {
    assert_eq!(format!("{}", Severity::Info), "INFO");
    assert_eq!(format!("{}", Severity::Warning), "WARN");
    assert_eq!(format!("{}", Severity::Error), "ERROR");
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
}

#[test]
fn test_severity_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    assert_eq!(Severity::Error.as_str(), "error");
}

#[test]
fn test_category_serializes_snake_case() {
    let json = serde_json::to_string(&RuleCategory::DdlConcurrency).unwrap();
    assert_eq!(json, "\"ddl_concurrency\"");
    assert_eq!(RuleCategory::DdlConcurrency.to_string(), "DDL concurrency");
}

#[test]
fn test_issue_takes_rule_code_and_severity() {
    let issue = Issue::new(&SAMPLE, 3, "message", "suggestion", "SELECT 1");
    assert_eq!(issue.rule_code, "sample_rule");
    assert_eq!(issue.severity, Severity::Warning);
    assert_eq!(issue.statement_index, 3);
}

#[test]
fn test_script_issue_has_no_statement() {
    let issue = Issue::script(&SAMPLE, "message", "suggestion");
    assert_eq!(issue.statement_index, 0);
    assert!(issue.statement.is_empty());
}

#[test]
fn test_issue_serializes_camel_case() {
    let issue = Issue::new(&SAMPLE, 1, "message", "suggestion", "SELECT 1");
    let json = serde_json::to_value(&issue).unwrap();
    assert_eq!(json["statementIndex"], 1);
    assert_eq!(json["ruleCode"], "sample_rule");
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["statement"], "SELECT 1");
}

#[test]
fn test_catalog_sizes() {
    assert_eq!(rules_for(Engine::MySql).rules.len(), 19);
    assert_eq!(rules_for(Engine::PostgreSql).rules.len(), 13);
    assert_eq!(rules_for(Engine::MongoDb).rules.len(), 8);
}

#[test]
fn test_catalog_serializes() {
    let json = serde_json::to_value(rules_for(Engine::PostgreSql)).unwrap();
    assert_eq!(json["engine"], "postgresql");
    assert_eq!(json["rulesVersion"], "pg-v0.1");
    assert_eq!(json["rules"][0]["code"], "empty_input");
}

#[test]
fn test_engine_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Engine::MongoDb).unwrap(), "\"mongodb\"");
    assert_eq!(Engine::default(), Engine::MySql);
}
