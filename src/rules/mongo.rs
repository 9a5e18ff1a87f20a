//! MongoDB catalog (`mongo-v0.1`) and evaluator.
//!
//! Mongo scripts are shell calls rather than SQL, so the checks look at a
//! compact view of each operation: lower-cased with all whitespace removed.

use super::{
    EngineAnalyzer, Evaluation,
    checks::{StatementCheck, TerminatorRules, run_checks},
    text::StatementText,
    types::{Issue, RuleCatalog, RuleCategory, RuleDefinition, Severity}
};
use crate::{
    engine::Engine,
    segment::split_mongo_operations,
    terminator::{fullwidth_terminators, missing_mongo_terminators}
};

pub const RULES_VERSION: &str = "mongo-v0.1";

pub const EMPTY_INPUT: RuleDefinition = RuleDefinition {
    code:        "empty_input",
    severity:    Severity::Error,
    category:    RuleCategory::InputValidation,
    description: "Input is empty"
};

const UPDATE_MANY_WITHOUT_FILTER: RuleDefinition = RuleDefinition {
    code:        "mongo_update_many_without_filter",
    severity:    Severity::Error,
    category:    RuleCategory::WriteSafety,
    description: "updateMany with an empty filter"
};

const DELETE_MANY_WITHOUT_FILTER: RuleDefinition = RuleDefinition {
    code:        "mongo_delete_many_without_filter",
    severity:    Severity::Error,
    category:    RuleCategory::WriteSafety,
    description: "deleteMany with an empty filter"
};

const MISSING_STATEMENT_TERMINATOR: RuleDefinition = RuleDefinition {
    code:        "mongo_missing_statement_terminator",
    severity:    Severity::Error,
    category:    RuleCategory::ScriptSyntax,
    description: "Operation in a multi-operation script appears to be missing ;"
};

const FULLWIDTH_STATEMENT_TERMINATOR: RuleDefinition = RuleDefinition {
    code:        "fullwidth_statement_terminator",
    severity:    Severity::Error,
    category:    RuleCategory::ScriptSyntax,
    description: "Full-width terminator (；) detected"
};

const FIND_WITHOUT_LIMIT: RuleDefinition = RuleDefinition {
    code:        "mongo_find_without_limit",
    severity:    Severity::Info,
    category:    RuleCategory::QueryConvention,
    description: "find without limit"
};

const WHERE_OPERATOR: RuleDefinition = RuleDefinition {
    code:        "mongo_where_operator",
    severity:    Severity::Warning,
    category:    RuleCategory::QuerySafety,
    description: "$where evaluates JavaScript on the server"
};

const AGGREGATE_OUT_MERGE: RuleDefinition = RuleDefinition {
    code:        "mongo_aggregate_out_merge",
    severity:    Severity::Warning,
    category:    RuleCategory::DataFlow,
    description: "Aggregation writes its output with $out/$merge"
};

static RULES: [RuleDefinition; 8] = [
    EMPTY_INPUT,
    UPDATE_MANY_WITHOUT_FILTER,
    DELETE_MANY_WITHOUT_FILTER,
    MISSING_STATEMENT_TERMINATOR,
    FULLWIDTH_STATEMENT_TERMINATOR,
    FIND_WITHOUT_LIMIT,
    WHERE_OPERATOR,
    AGGREGATE_OUT_MERGE
];

fn is_unfiltered_update_many(text: &StatementText<'_>) -> bool {
    text.compact().contains(".updatemany({},")
}

fn is_unfiltered_delete_many(text: &StatementText<'_>) -> bool {
    let compact = text.compact();
    compact.contains(".deletemany({})") || compact.contains(".deletemany({},")
}

fn is_find_without_limit(text: &StatementText<'_>) -> bool {
    let compact = text.compact();
    compact.contains(".find(") && !compact.contains(".limit(")
}

fn uses_where_operator(text: &StatementText<'_>) -> bool {
    text.compact().contains("$where")
}

fn is_writing_aggregate(text: &StatementText<'_>) -> bool {
    let compact = text.compact();
    compact.contains(".aggregate(") && (compact.contains("$out") || compact.contains("$merge"))
}

static CHECKS: [StatementCheck; 5] = [
    StatementCheck {
        rule:       UPDATE_MANY_WITHOUT_FILTER,
        message:    "updateMany uses an empty filter and may update every document",
        suggestion: "Add an explicit filter",
        matches:    is_unfiltered_update_many
    },
    StatementCheck {
        rule:       DELETE_MANY_WITHOUT_FILTER,
        message:    "deleteMany uses an empty filter and may delete every document",
        suggestion: "Add an explicit filter",
        matches:    is_unfiltered_delete_many
    },
    StatementCheck {
        rule:       FIND_WITHOUT_LIMIT,
        message:    "find has no limit",
        suggestion: "Add limit() to online queries to avoid huge result sets",
        matches:    is_find_without_limit
    },
    StatementCheck {
        rule:       WHERE_OPERATOR,
        message:    "$where detected, server-side JavaScript adds execution and security risk",
        suggestion: "Prefer structured query operators over JavaScript expressions",
        matches:    uses_where_operator
    },
    StatementCheck {
        rule:       AGGREGATE_OUT_MERGE,
        message:    "Aggregation uses $out/$merge and may overwrite data",
        suggestion: "Confirm the target collection, idempotency and rollback plan",
        matches:    is_writing_aggregate
    }
];

const TERMINATORS: TerminatorRules = TerminatorRules {
    fullwidth:          FULLWIDTH_STATEMENT_TERMINATOR,
    missing:            MISSING_STATEMENT_TERMINATOR,
    subject:            "Mongo",
    missing_suggestion: "Terminate every Mongo operation with ; so the script is not split incorrectly"
};

/// MongoDB evaluator.
pub struct MongoAnalyzer;

impl EngineAnalyzer for MongoAnalyzer {
    fn engine(&self) -> Engine {
        Engine::MongoDb
    }

    fn catalog(&self) -> RuleCatalog {
        RuleCatalog {
            engine:        Engine::MongoDb,
            rules_version: RULES_VERSION,
            rules:         &RULES
        }
    }

    fn empty_input(&self) -> Issue {
        Issue::script(
            &EMPTY_INPUT,
            "Script content is empty",
            "Upload a script or paste Mongo operations and retry"
        )
    }

    fn evaluate(&self, script: &str) -> Evaluation {
        let operations = split_mongo_operations(script);
        let mut issues = TERMINATORS.issues(
            fullwidth_terminators(&operations),
            missing_mongo_terminators(&operations)
        );
        let texts: Vec<StatementText<'_>> = operations.iter().map(StatementText::new).collect();
        issues.extend(run_checks(&CHECKS, &texts));

        Evaluation {
            statement_count: operations.len(),
            issues,
            routine_detected: false
        }
    }
}
