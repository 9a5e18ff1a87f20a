//! Building blocks shared by the engine evaluators.

use rayon::prelude::*;

use super::{
    text::{BEGIN_TRANSACTION, COMMIT, RISKY_WRITE, StatementText},
    types::{Issue, RuleDefinition}
};
use crate::terminator::{self, Findings};

/// Named statement-local predicate bound to a catalog entry.
pub struct StatementCheck {
    pub rule:       RuleDefinition,
    pub message:    &'static str,
    pub suggestion: &'static str,
    pub matches:    fn(&StatementText<'_>) -> bool
}

impl StatementCheck {
    fn check(&self, text: &StatementText<'_>) -> Option<Issue> {
        (self.matches)(text).then(|| {
            Issue::new(
                &self.rule,
                text.index,
                self.message,
                self.suggestion,
                text.raw
            )
        })
    }
}

/// Run every check against every statement.
///
/// Statements are processed in parallel; the result keeps statement order
/// and, within a statement, table order.
pub fn run_checks(checks: &[StatementCheck], texts: &[StatementText<'_>]) -> Vec<Issue> {
    texts
        .par_iter()
        .flat_map_iter(|text| checks.iter().filter_map(|check| check.check(text)))
        .collect()
}

/// Script-wide transaction markers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionScan {
    pub risky_write: bool,
    pub begin:       bool,
    pub commit:      bool
}

impl TransactionScan {
    pub fn scan(texts: &[StatementText<'_>]) -> Self {
        texts.iter().fold(Self::default(), |acc, text| Self {
            risky_write: acc.risky_write || RISKY_WRITE.is_match(&text.upper),
            begin:       acc.begin || BEGIN_TRANSACTION.is_match(&text.upper),
            commit:      acc.commit || COMMIT.is_match(&text.upper)
        })
    }

    /// Several statements with at least one write and no complete
    /// `BEGIN` / `COMMIT` pair.
    pub fn is_unguarded(&self, statement_count: usize) -> bool {
        self.risky_write && statement_count > 1 && !(self.begin && self.commit)
    }
}

pub const TRANSACTION_MESSAGE: &str =
    "Multiple write statements found without a complete transaction boundary";

/// Script-level warning for oversized change sets.
pub fn too_many_statements(
    rule: &RuleDefinition,
    statement_count: usize,
    threshold: usize,
    suggestion: &'static str
) -> Option<Issue> {
    (statement_count > threshold).then(|| {
        Issue::script(
            rule,
            format!("Script contains many statements ({})", statement_count),
            suggestion
        )
    })
}

/// Rules and wording for the two terminator findings of one engine.
pub struct TerminatorRules {
    pub fullwidth:          RuleDefinition,
    pub missing:            RuleDefinition,
    /// Word used in messages, `"SQL"` or `"Mongo"`.
    pub subject:            &'static str,
    pub missing_suggestion: &'static str
}

const FULLWIDTH_SUGGESTION: &str =
    "Replace the full-width terminator (；) with an ASCII semicolon (;) to avoid ambiguous parsing";

impl TerminatorRules {
    /// Turn findings into at most one issue per rule, full-width findings
    /// taking precedence over missing ones for the same statement.
    pub fn issues(&self, fullwidth: Findings, missing: Findings) -> Vec<Issue> {
        let missing = terminator::exclude(missing, &fullwidth);
        let mut issues = Vec::with_capacity(2);
        if let Some(first) = fullwidth.first() {
            issues.push(Issue::new(
                &self.fullwidth,
                first.index,
                terminator::fullwidth_message(&fullwidth, self.subject),
                FULLWIDTH_SUGGESTION,
                terminator::snippet(&fullwidth)
            ));
        }
        if let Some(first) = missing.first() {
            issues.push(Issue::new(
                &self.missing,
                first.index,
                terminator::missing_message(&missing, self.subject),
                self.missing_suggestion,
                terminator::snippet(&missing)
            ));
        }
        issues
    }
}
