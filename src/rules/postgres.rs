//! PostgreSQL catalog (`pg-v0.1`) and evaluator.
//!
//! Shares the delimiter-aware segmenter with MySQL but owns its rule codes.
//! Routine detection does not apply here, so the terminator heuristics
//! always run.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    EngineAnalyzer, Evaluation,
    checks::{
        StatementCheck, TRANSACTION_MESSAGE, TerminatorRules, TransactionScan, run_checks,
        too_many_statements
    },
    text::{
        DELETE_STATEMENT, DROP_OBJECT, LIMIT, SELECT, SELECT_STAR, StatementText, TRUNCATE_TABLE,
        UPDATE_STATEMENT
    },
    types::{Issue, RuleCatalog, RuleCategory, RuleDefinition, Severity}
};
use crate::{
    engine::Engine,
    segment::SqlSegmenter,
    terminator::{fullwidth_terminators, missing_sql_terminators}
};

pub const RULES_VERSION: &str = "pg-v0.1";

// Kept apart from the MySQL limit (60); the two have never been aligned.
const MAX_STATEMENTS: usize = 80;

static LIKE_LEADING_WILDCARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)(LIKE|ILIKE)\s+['"]%[^'"]*['"]"#).expect("valid regex")
});

static CREATE_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*CREATE\s+(UNIQUE\s+)?INDEX\b").expect("valid regex"));

static CONCURRENTLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bCONCURRENTLY\b").expect("valid regex"));

pub const EMPTY_INPUT: RuleDefinition = RuleDefinition {
    code:        "empty_input",
    severity:    Severity::Error,
    category:    RuleCategory::InputValidation,
    description: "Input is empty"
};

const TOO_MANY_STATEMENTS: RuleDefinition = RuleDefinition {
    code:        "too_many_statements",
    severity:    Severity::Warning,
    category:    RuleCategory::ChangeScale,
    description: "Too many statements, run the change in batches"
};

const MISSING_STATEMENT_TERMINATOR: RuleDefinition = RuleDefinition {
    code:        "missing_statement_terminator",
    severity:    Severity::Error,
    category:    RuleCategory::ScriptSyntax,
    description: "Statement appears to be missing its terminator"
};

const FULLWIDTH_STATEMENT_TERMINATOR: RuleDefinition = RuleDefinition {
    code:        "fullwidth_statement_terminator",
    severity:    Severity::Error,
    category:    RuleCategory::ScriptSyntax,
    description: "Full-width terminator (；) detected"
};

const PG_DANGEROUS_DROP: RuleDefinition = RuleDefinition {
    code:        "pg_dangerous_drop",
    severity:    Severity::Error,
    category:    RuleCategory::DangerousDdl,
    description: "DROP of a table, database, view or index"
};

const PG_DANGEROUS_TRUNCATE: RuleDefinition = RuleDefinition {
    code:        "pg_dangerous_truncate",
    severity:    Severity::Error,
    category:    RuleCategory::DangerousDdl,
    description: "TRUNCATE empties the whole table"
};

const PG_UPDATE_WITHOUT_WHERE: RuleDefinition = RuleDefinition {
    code:        "pg_update_without_where",
    severity:    Severity::Error,
    category:    RuleCategory::DmlSafety,
    description: "UPDATE without WHERE"
};

const PG_DELETE_WITHOUT_WHERE: RuleDefinition = RuleDefinition {
    code:        "pg_delete_without_where",
    severity:    Severity::Error,
    category:    RuleCategory::DmlSafety,
    description: "DELETE without WHERE"
};

const PG_SELECT_STAR: RuleDefinition = RuleDefinition {
    code:        "pg_select_star",
    severity:    Severity::Warning,
    category:    RuleCategory::QueryConvention,
    description: "SELECT * hurts maintainability and performance"
};

const PG_SELECT_WITHOUT_LIMIT: RuleDefinition = RuleDefinition {
    code:        "pg_select_without_limit",
    severity:    Severity::Info,
    category:    RuleCategory::QueryConvention,
    description: "SELECT without LIMIT"
};

const PG_LIKE_LEADING_WILDCARD: RuleDefinition = RuleDefinition {
    code:        "pg_like_leading_wildcard",
    severity:    Severity::Warning,
    category:    RuleCategory::QueryPerformance,
    description: "Leading % in LIKE/ILIKE prevents index usage"
};

const PG_CREATE_INDEX_WITHOUT_CONCURRENTLY: RuleDefinition = RuleDefinition {
    code:        "pg_create_index_without_concurrently",
    severity:    Severity::Warning,
    category:    RuleCategory::DdlConcurrency,
    description: "CREATE INDEX without CONCURRENTLY"
};

const RISKY_WRITES_WITHOUT_TRANSACTION: RuleDefinition = RuleDefinition {
    code:        "risky_writes_without_transaction",
    severity:    Severity::Warning,
    category:    RuleCategory::TransactionConsistency,
    description: "Several writes not wrapped in an explicit transaction"
};

static RULES: [RuleDefinition; 13] = [
    EMPTY_INPUT,
    TOO_MANY_STATEMENTS,
    MISSING_STATEMENT_TERMINATOR,
    FULLWIDTH_STATEMENT_TERMINATOR,
    PG_DANGEROUS_DROP,
    PG_DANGEROUS_TRUNCATE,
    PG_UPDATE_WITHOUT_WHERE,
    PG_DELETE_WITHOUT_WHERE,
    PG_SELECT_STAR,
    PG_SELECT_WITHOUT_LIMIT,
    PG_LIKE_LEADING_WILDCARD,
    PG_CREATE_INDEX_WITHOUT_CONCURRENTLY,
    RISKY_WRITES_WITHOUT_TRANSACTION
];

fn is_dangerous_drop(text: &StatementText<'_>) -> bool {
    DROP_OBJECT.is_match(&text.upper)
}

fn is_truncate(text: &StatementText<'_>) -> bool {
    TRUNCATE_TABLE.is_match(&text.upper)
}

fn is_update_without_where(text: &StatementText<'_>) -> bool {
    text.is_unfiltered(&UPDATE_STATEMENT)
}

fn is_delete_without_where(text: &StatementText<'_>) -> bool {
    text.is_unfiltered(&DELETE_STATEMENT)
}

fn is_select_star(text: &StatementText<'_>) -> bool {
    SELECT_STAR.is_match(&text.upper)
}

fn is_select_without_limit(text: &StatementText<'_>) -> bool {
    SELECT.is_match(&text.upper) && !LIMIT.is_match(text.code())
}

fn has_like_leading_wildcard(text: &StatementText<'_>) -> bool {
    LIKE_LEADING_WILDCARD.is_match(text.raw)
}

fn is_blocking_index_build(text: &StatementText<'_>) -> bool {
    CREATE_INDEX.is_match(&text.upper) && !CONCURRENTLY.is_match(text.code())
}

static CHECKS: [StatementCheck; 8] = [
    StatementCheck {
        rule:       PG_DANGEROUS_DROP,
        message:    "High-risk DROP statement detected",
        suggestion: "Avoid DROP in production; take a backup and get approval first",
        matches:    is_dangerous_drop
    },
    StatementCheck {
        rule:       PG_DANGEROUS_TRUNCATE,
        message:    "TRUNCATE statement detected",
        suggestion: "TRUNCATE is high risk; confirm the recovery plan",
        matches:    is_truncate
    },
    StatementCheck {
        rule:       PG_UPDATE_WITHOUT_WHERE,
        message:    "UPDATE has no WHERE condition",
        suggestion: "Add a precise WHERE condition to avoid updating the whole table",
        matches:    is_update_without_where
    },
    StatementCheck {
        rule:       PG_DELETE_WITHOUT_WHERE,
        message:    "DELETE has no WHERE condition",
        suggestion: "Add a WHERE condition, or delete in batches",
        matches:    is_delete_without_where
    },
    StatementCheck {
        rule:       PG_SELECT_STAR,
        message:    "SELECT * may cause performance and compatibility problems",
        suggestion: "List the needed columns explicitly",
        matches:    is_select_star
    },
    StatementCheck {
        rule:       PG_SELECT_WITHOUT_LIMIT,
        message:    "SELECT has no LIMIT",
        suggestion: "Add LIMIT to online queries",
        matches:    is_select_without_limit
    },
    StatementCheck {
        rule:       PG_LIKE_LEADING_WILDCARD,
        message:    "Leading wildcard in LIKE/ILIKE may prevent index usage",
        suggestion: "Consider full-text search or a different match strategy",
        matches:    has_like_leading_wildcard
    },
    StatementCheck {
        rule:       PG_CREATE_INDEX_WITHOUT_CONCURRENTLY,
        message:    "CREATE INDEX does not use CONCURRENTLY",
        suggestion: "Use CREATE INDEX CONCURRENTLY for online changes to reduce locking",
        matches:    is_blocking_index_build
    }
];

const TERMINATORS: TerminatorRules = TerminatorRules {
    fullwidth:          FULLWIDTH_STATEMENT_TERMINATOR,
    missing:            MISSING_STATEMENT_TERMINATOR,
    subject:            "SQL",
    missing_suggestion: "Terminate every statement so automated review and execution split it correctly"
};

/// PostgreSQL evaluator.
pub struct PostgresAnalyzer;

impl EngineAnalyzer for PostgresAnalyzer {
    fn engine(&self) -> Engine {
        Engine::PostgreSql
    }

    fn catalog(&self) -> RuleCatalog {
        RuleCatalog {
            engine:        Engine::PostgreSql,
            rules_version: RULES_VERSION,
            rules:         &RULES
        }
    }

    fn empty_input(&self) -> Issue {
        Issue::script(
            &EMPTY_INPUT,
            "SQL content is empty",
            "Upload a SQL file or paste SQL statements before checking"
        )
    }

    fn evaluate(&self, script: &str) -> Evaluation {
        let statements = SqlSegmenter::default().segment(script);
        let mut issues = TERMINATORS.issues(
            fullwidth_terminators(&statements),
            missing_sql_terminators(script, &statements, false)
        );
        issues.extend(too_many_statements(
            &TOO_MANY_STATEMENTS,
            statements.len(),
            MAX_STATEMENTS,
            "Review and execute in batches to lower release risk"
        ));

        let texts: Vec<StatementText<'_>> = statements.iter().map(StatementText::new).collect();
        issues.extend(run_checks(&CHECKS, &texts));

        if TransactionScan::scan(&texts).is_unguarded(statements.len()) {
            issues.push(Issue::script(
                &RISKY_WRITES_WITHOUT_TRANSACTION,
                TRANSACTION_MESSAGE,
                "Wrap the batch in BEGIN/COMMIT to keep it consistent"
            ));
        }

        Evaluation {
            statement_count: statements.len(),
            issues,
            routine_detected: false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Statement;

    fn text_of(sql: &str) -> Statement {
        Statement {
            index:                1,
            text:                 sql.to_string(),
            offset:               0,
            end:                  0,
            terminated:           true,
            fullwidth_terminator: false
        }
    }

    #[test]
    fn test_create_index_requires_concurrently() {
        let plain = text_of("CREATE INDEX idx_users_name ON users(name)");
        let unique = text_of("create unique index idx ON users(email)");
        let online = text_of("CREATE INDEX CONCURRENTLY idx ON users(name)");
        assert!(is_blocking_index_build(&StatementText::new(&plain)));
        assert!(is_blocking_index_build(&StatementText::new(&unique)));
        assert!(!is_blocking_index_build(&StatementText::new(&online)));
    }

    #[test]
    fn test_ilike_leading_wildcard() {
        let st = text_of("SELECT id FROM users WHERE name ILIKE '%tom%'");
        assert!(has_like_leading_wildcard(&StatementText::new(&st)));
    }

    #[test]
    fn test_codes_are_engine_specific() {
        assert!(RULES.iter().any(|r| r.code == "pg_select_without_limit"));
        assert!(!RULES.iter().any(|r| r.code == "select_without_limit"));
    }

    #[test]
    fn test_never_reports_routines() {
        let evaluation = PostgresAnalyzer.evaluate("CREATE FUNCTION f() RETURNS int AS $$ SELECT 1 $$ LANGUAGE sql;");
        assert!(!evaluation.routine_detected);
    }
}
