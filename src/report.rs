//! Report aggregation.
//!
//! Turns the filtered issue list of one analysis into the final
//! [`CheckResult`]: stable ordering, severity counts and advice lines.

use chrono::{SecondsFormat, Utc};
use compact_str::CompactString;
use serde::Serialize;

use crate::{
    engine::Engine,
    rules::{Issue, Severity}
};

const ERROR_ADVICE: &str =
    "High-risk statements found; block automatic execution and review manually";
const WARNING_ADVICE: &str =
    "Medium-risk items found; prepare an execution plan and rollback strategy";
const CLEAN_ADVICE: &str =
    "No obvious high-risk pattern found; still spot-check business semantics";
const ROUTINE_ADVICE: &str =
    "Routine definition detected; review procedure permissions, error handling and audit logging";
const EMPTY_ADVICE: &str = "Enter a script to review and try again";

/// Per-report issue counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub statement_count: usize,
    pub error_count:     usize,
    pub warning_count:   usize,
    pub info_count:      usize
}

impl Summary {
    pub fn issue_count(&self) -> usize {
        self.error_count + self.warning_count + self.info_count
    }

    /// Highest severity present, if any issue was counted.
    pub fn highest_severity(&self) -> Option<Severity> {
        if self.error_count > 0 {
            Some(Severity::Error)
        } else if self.warning_count > 0 {
            Some(Severity::Warning)
        } else if self.info_count > 0 {
            Some(Severity::Info)
        } else {
            None
        }
    }
}

/// Result of one analysis call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub rules_version: &'static str,
    /// RFC 3339 UTC timestamp, second precision
    pub checked_at:    String,
    pub summary:       Summary,
    pub issues:        Vec<Issue>,
    pub advice:        Vec<&'static str>
}

impl CheckResult {
    pub fn new(
        rules_version: &'static str,
        summary: Summary,
        issues: Vec<Issue>,
        advice: Vec<&'static str>
    ) -> Self {
        Self {
            rules_version,
            checked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            summary,
            issues,
            advice
        }
    }
}

/// Check result together with the request context it was produced for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub engine:         Engine,
    /// Codes that stayed disabled, sorted
    pub disabled_rules: Vec<CompactString>,
    /// Always-enabled codes the caller tried to disable, sorted
    pub forced_enabled: Vec<CompactString>,
    #[serde(flatten)]
    pub result:         CheckResult
}

/// Order by statement index, then by descending severity.
///
/// The sort is stable, so issues of equal rank keep evaluation order.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        a.statement_index
            .cmp(&b.statement_index)
            .then_with(|| b.severity.cmp(&a.severity))
    });
}

pub fn summarize(statement_count: usize, issues: &[Issue]) -> Summary {
    issues.iter().fold(
        Summary {
            statement_count,
            ..Summary::default()
        },
        |mut summary, issue| {
            match issue.severity {
                Severity::Error => summary.error_count += 1,
                Severity::Warning => summary.warning_count += 1,
                Severity::Info => summary.info_count += 1
            }
            summary
        }
    )
}

/// Advice lines derived from the final counts.
pub fn build_advice(summary: &Summary, routine_detected: bool) -> Vec<&'static str> {
    let mut advice = Vec::with_capacity(3);
    if summary.error_count > 0 {
        advice.push(ERROR_ADVICE);
    }
    if summary.warning_count > 0 {
        advice.push(WARNING_ADVICE);
    }
    if advice.is_empty() {
        advice.push(CLEAN_ADVICE);
    }
    if routine_detected {
        advice.push(ROUTINE_ADVICE);
    }
    advice
}

/// Advice for an empty script.
pub fn empty_advice() -> Vec<&'static str> {
    vec![EMPTY_ADVICE]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleCategory, RuleDefinition};

    fn issue(index: usize, severity: Severity, code: &'static str) -> Issue {
        let rule = RuleDefinition {
            code,
            severity,
            category: RuleCategory::DmlSafety,
            description: ""
        };
        Issue::new(&rule, index, "", "", "")
    }

    #[test]
    fn test_sort_by_index_then_severity() {
        let mut issues = vec![
            issue(2, Severity::Info, "a"),
            issue(1, Severity::Warning, "b"),
            issue(2, Severity::Error, "c"),
            issue(0, Severity::Info, "d"),
            issue(1, Severity::Warning, "e")
        ];
        sort_issues(&mut issues);
        let codes: Vec<_> = issues.iter().map(|i| i.rule_code).collect();
        assert_eq!(codes, vec!["d", "b", "e", "c", "a"]);
    }

    #[test]
    fn test_summarize_counts_match_issues() {
        let issues = vec![
            issue(1, Severity::Error, "a"),
            issue(1, Severity::Info, "b"),
            issue(2, Severity::Info, "c")
        ];
        let summary = summarize(2, &issues);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.warning_count, 0);
        assert_eq!(summary.info_count, 2);
        assert_eq!(summary.issue_count(), issues.len());
        assert_eq!(summary.highest_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_advice_for_errors_and_warnings() {
        let summary = Summary {
            statement_count: 3,
            error_count:     1,
            warning_count:   2,
            info_count:      0
        };
        assert_eq!(build_advice(&summary, false), vec![ERROR_ADVICE, WARNING_ADVICE]);
    }

    #[test]
    fn test_clean_advice_with_routine() {
        let summary = Summary {
            statement_count: 1,
            info_count: 1,
            ..Summary::default()
        };
        assert_eq!(build_advice(&summary, true), vec![CLEAN_ADVICE, ROUTINE_ADVICE]);
        assert_eq!(summary.highest_severity(), Some(Severity::Info));
    }

    #[test]
    fn test_checked_at_is_utc_seconds() {
        let result = CheckResult::new("v1.3", Summary::default(), vec![], empty_advice());
        assert!(result.checked_at.ends_with('Z'));
        assert_eq!(result.checked_at.len(), "2024-01-01T00:00:00Z".len());
    }

    #[test]
    fn test_analysis_flattens_result() {
        let analysis = Analysis {
            engine:         Engine::MongoDb,
            disabled_rules: vec![],
            forced_enabled: vec![CompactString::from("empty_input")],
            result:         CheckResult::new("mongo-v0.1", Summary::default(), vec![], empty_advice())
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["engine"], "mongodb");
        assert_eq!(json["rulesVersion"], "mongo-v0.1");
        assert_eq!(json["forcedEnabled"][0], "empty_input");
        assert_eq!(json["summary"]["statementCount"], 0);
        assert!(json.get("result").is_none());
    }
}
