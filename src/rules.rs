//! Rule catalogs, engine dispatch and evaluation.
//!
//! Every engine owns an independent, versioned catalog and an evaluator
//! implementing [`EngineAnalyzer`]. The [`Analyzer`] picks the evaluator
//! once per request, enforces the always-enabled rules, filters disabled
//! issues and hands the rest to the [`report`](crate::report) aggregator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────┐   ┌────────────┐   ┌─────────────┐   ┌────────┐
//! │ Script  │──▶│ Analyzer │──▶│ Segmenter  │──▶│ Terminators │──▶│ Checks │
//! └─────────┘   └──────────┘   └────────────┘   └─────────────┘   └────────┘
//!                    │                                                 │
//!                    └──────────────── Report ◀────────────────────────┘
//! ```
//!
//! Statement checks are plain named predicates collected into an ordered
//! table per engine and executed in parallel with [`rayon`].
//!
//! # Example
//!
//! ```
//! use sql_review::{engine::Engine, rules::{AnalyzeOptions, Analyzer}};
//!
//! let analysis = Analyzer::default().analyze(
//!     Engine::MySql,
//!     "DELETE FROM orders;",
//!     &AnalyzeOptions::default()
//! );
//! assert_eq!(analysis.result.issues[0].rule_code, "delete_without_where");
//! ```

mod checks;
mod mongo;
mod mysql;
mod postgres;
mod text;
mod types;

use compact_str::CompactString;
use indexmap::IndexSet;
pub use mongo::MongoAnalyzer;
pub use mysql::MySqlAnalyzer;
pub use postgres::PostgresAnalyzer;
pub use types::{Issue, RuleCatalog, RuleCategory, RuleDefinition, RuleState, Severity};

use crate::{
    engine::Engine,
    report::{Analysis, CheckResult, build_advice, empty_advice, sort_issues, summarize}
};

/// Rule codes that callers can never disable.
pub const ALWAYS_ENABLED_RULES: &[&str] = &[
    "empty_input",
    "missing_statement_terminator",
    "mongo_missing_statement_terminator",
    "fullwidth_statement_terminator"
];

/// Raw outcome of one engine evaluation, before filtering and aggregation.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub statement_count:  usize,
    pub issues:           Vec<Issue>,
    /// A procedure, function, trigger or event definition was found.
    pub routine_detected: bool
}

/// Evaluator of one engine.
///
/// Implementations are stateless and shared by all requests.
pub trait EngineAnalyzer: Send + Sync {
    fn engine(&self) -> Engine;

    /// Versioned, read-only rule catalog.
    fn catalog(&self) -> RuleCatalog;

    /// Issue reported for an empty or whitespace-only script.
    fn empty_input(&self) -> Issue;

    /// Segment and evaluate a non-empty script.
    ///
    /// Every issue code must belong to [`catalog`](Self::catalog) and every
    /// statement index must be `0` or a valid 1-based statement index.
    fn evaluate(&self, script: &str) -> Evaluation;
}

/// Resolve the evaluator for an engine.
pub fn analyzer_for(engine: Engine) -> &'static dyn EngineAnalyzer {
    match engine {
        Engine::MySql => &MySqlAnalyzer,
        Engine::PostgreSql => &PostgresAnalyzer,
        Engine::MongoDb => &MongoAnalyzer
    }
}

/// Catalog of an engine.
pub fn rules_for(engine: Engine) -> RuleCatalog {
    analyzer_for(engine).catalog()
}

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Rule codes whose issues are dropped from the report.
    pub disabled_rules: IndexSet<CompactString>
}

impl AnalyzeOptions {
    /// Build options from raw codes, trimming them and skipping blanks.
    pub fn with_disabled<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let disabled_rules = codes
            .into_iter()
            .map(|code| CompactString::from(code.as_ref().trim()))
            .filter(|code| !code.is_empty())
            .collect();
        Self {
            disabled_rules
        }
    }
}

/// Request entry point.
///
/// Holds the always-enabled rule set; everything else is read from the
/// static catalogs, so one analyzer can serve concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    always_enabled: &'static [&'static str]
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ALWAYS_ENABLED_RULES)
    }
}

impl Analyzer {
    pub fn new(always_enabled: &'static [&'static str]) -> Self {
        Self {
            always_enabled
        }
    }

    pub fn is_always_enabled(&self, code: &str) -> bool {
        self.always_enabled.contains(&code)
    }

    /// Remove always-enabled codes from `disabled`, returning the removed
    /// codes sorted.
    pub fn enforce_always_enabled(
        &self,
        disabled: &mut IndexSet<CompactString>
    ) -> Vec<CompactString> {
        let mut forced: Vec<CompactString> = disabled
            .iter()
            .filter(|code| self.is_always_enabled(code))
            .cloned()
            .collect();
        disabled.retain(|code| !self.is_always_enabled(code));
        forced.sort();
        if !forced.is_empty() {
            tracing::info!(rules = %forced.join(", "), "enforcing always-enabled rules");
        }
        forced
    }

    /// Analyze `script` for `engine`.
    ///
    /// Never fails: problems with the script are reported as issues.
    pub fn analyze(&self, engine: Engine, script: &str, options: &AnalyzeOptions) -> Analysis {
        let mut disabled = options.disabled_rules.clone();
        let forced_enabled = self.enforce_always_enabled(&mut disabled);
        let evaluator = analyzer_for(engine);
        let catalog = evaluator.catalog();

        let (evaluation, advice_override) = if script.trim().is_empty() {
            let evaluation = Evaluation {
                statement_count:  0,
                issues:           vec![evaluator.empty_input()],
                routine_detected: false
            };
            (evaluation, Some(empty_advice()))
        } else {
            (evaluator.evaluate(script), None)
        };

        let mut issues: Vec<Issue> = evaluation
            .issues
            .into_iter()
            .filter(|issue| !disabled.contains(issue.rule_code))
            .collect();
        sort_issues(&mut issues);
        let summary = summarize(evaluation.statement_count, &issues);
        let advice = advice_override
            .unwrap_or_else(|| build_advice(&summary, evaluation.routine_detected));

        tracing::debug!(
            engine = %evaluator.engine(),
            statements = summary.statement_count,
            issues = issues.len(),
            "script analyzed"
        );

        let mut disabled_rules: Vec<CompactString> = disabled.into_iter().collect();
        disabled_rules.sort();

        Analysis {
            engine,
            disabled_rules,
            forced_enabled,
            result: CheckResult::new(catalog.rules_version, summary, issues, advice)
        }
    }

    /// Catalog entries of `engine` with their effective state.
    pub fn rule_states(&self, engine: Engine, options: &AnalyzeOptions) -> Vec<RuleState> {
        rules_for(engine)
            .rules
            .iter()
            .map(|rule| {
                let always_enabled = self.is_always_enabled(rule.code);
                RuleState {
                    rule: *rule,
                    enabled: always_enabled || !options.disabled_rules.contains(rule.code),
                    always_enabled
                }
            })
            .collect()
    }
}

/// Analyze a script given a free-form engine selector.
///
/// ```
/// let analysis = sql_review::rules::analyze("pg", "", ["empty_input"]);
/// assert_eq!(analysis.result.summary.statement_count, 0);
/// assert_eq!(analysis.forced_enabled, vec!["empty_input"]);
/// ```
pub fn analyze<I, S>(engine: &str, script: &str, disabled_rules: I) -> Analysis
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>
{
    Analyzer::default().analyze(
        Engine::normalize(engine),
        script,
        &AnalyzeOptions::with_disabled(disabled_rules)
    )
}
