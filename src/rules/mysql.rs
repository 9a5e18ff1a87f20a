//! MySQL catalog (`v1.3`) and evaluator.

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

pub const RULES_VERSION: &str = "v1.3";

/// Statement count above which a script should be split into batches.
const MAX_STATEMENTS: usize = 60;

static ROUTINE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bCREATE\s+(?:DEFINER\s*=\s*[^\s]+\s+)?(?:PROCEDURE|FUNCTION|TRIGGER|EVENT)\b")
        .expect("valid regex")
});

static ALTER_DROP_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*ALTER\s+TABLE\s+.+\s+DROP\s+COLUMN\b").expect("valid regex")
});

static INTO_OUTFILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bINTO\s+OUTFILE\b").expect("valid regex"));

/// Quoted pattern starting with `%`, matched on the raw text.
static LIKE_LEADING_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)LIKE\s+['"]%[^'"]*['"]"#).expect("valid regex"));

static ORDER_BY_RAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)ORDER\s+BY\s+RAND\s*\(").expect("valid regex"));

static WHERE_ONE_EQ_ONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bWHERE\s+1\s*=\s*1\b").expect("valid regex"));

static INSERT_WITHOUT_COLUMNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*INSERT\s+INTO\s+[\w.]+\s+VALUES\s*\(").expect("valid regex")
});

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*CREATE\s+TABLE\s+").expect("valid regex"));

static CREATE_TABLE_IF_NOT_EXISTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*CREATE\s+TABLE\s+IF\s+NOT\s+EXISTS\s+").expect("valid regex")
});

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

const ROUTINE_DEFINITION_DETECTED: RuleDefinition = RuleDefinition {
    code:        "routine_definition_detected",
    severity:    Severity::Info,
    category:    RuleCategory::ScriptSyntax,
    description: "Procedure, function, trigger or event definition parsed with DELIMITER syntax"
};

const DANGEROUS_DROP: RuleDefinition = RuleDefinition {
    code:        "dangerous_drop",
    severity:    Severity::Error,
    category:    RuleCategory::DangerousDdl,
    description: "DROP of a table, database, view or index"
};

const DANGEROUS_TRUNCATE: RuleDefinition = RuleDefinition {
    code:        "dangerous_truncate",
    severity:    Severity::Error,
    category:    RuleCategory::DangerousDdl,
    description: "TRUNCATE empties the whole table"
};

const ALTER_DROP_COLUMN_RULE: RuleDefinition = RuleDefinition {
    code:        "alter_drop_column",
    severity:    Severity::Warning,
    category:    RuleCategory::DdlCompatibility,
    description: "DROP COLUMN is a destructive schema change"
};

const UPDATE_WITHOUT_WHERE: RuleDefinition = RuleDefinition {
    code:        "update_without_where",
    severity:    Severity::Error,
    category:    RuleCategory::DmlSafety,
    description: "UPDATE without WHERE"
};

const DELETE_WITHOUT_WHERE: RuleDefinition = RuleDefinition {
    code:        "delete_without_where",
    severity:    Severity::Error,
    category:    RuleCategory::DmlSafety,
    description: "DELETE without WHERE"
};

const WHERE_1_EQ_1: RuleDefinition = RuleDefinition {
    code:        "where_1_eq_1",
    severity:    Severity::Warning,
    category:    RuleCategory::ConditionValidity,
    description: "WHERE 1=1 may hide a missing condition"
};

const SELECT_STAR_RULE: RuleDefinition = RuleDefinition {
    code:        "select_star",
    severity:    Severity::Warning,
    category:    RuleCategory::QueryConvention,
    description: "SELECT * hurts maintainability and performance"
};

const SELECT_WITHOUT_LIMIT: RuleDefinition = RuleDefinition {
    code:        "select_without_limit",
    severity:    Severity::Info,
    category:    RuleCategory::QueryConvention,
    description: "SELECT without LIMIT"
};

const LIKE_LEADING_WILDCARD_RULE: RuleDefinition = RuleDefinition {
    code:        "like_leading_wildcard",
    severity:    Severity::Warning,
    category:    RuleCategory::QueryPerformance,
    description: "Leading % in LIKE prevents index usage"
};

const ORDER_BY_RAND_RULE: RuleDefinition = RuleDefinition {
    code:        "order_by_rand",
    severity:    Severity::Warning,
    category:    RuleCategory::QueryPerformance,
    description: "ORDER BY RAND() is expensive on large tables"
};

const INTO_OUTFILE_RULE: RuleDefinition = RuleDefinition {
    code:        "into_outfile",
    severity:    Severity::Error,
    category:    RuleCategory::DataSecurity,
    description: "INTO OUTFILE can leak data off the server"
};

const INSERT_WITHOUT_COLUMN_LIST: RuleDefinition = RuleDefinition {
    code:        "insert_without_column_list",
    severity:    Severity::Info,
    category:    RuleCategory::Maintainability,
    description: "INSERT without an explicit column list"
};

const CREATE_TABLE_WITHOUT_IF_NOT_EXISTS: RuleDefinition = RuleDefinition {
    code:        "create_table_without_if_not_exists",
    severity:    Severity::Info,
    category:    RuleCategory::Idempotency,
    description: "CREATE TABLE without IF NOT EXISTS"
};

const RISKY_WRITES_WITHOUT_TRANSACTION: RuleDefinition = RuleDefinition {
    code:        "risky_writes_without_transaction",
    severity:    Severity::Warning,
    category:    RuleCategory::TransactionConsistency,
    description: "Several writes not wrapped in an explicit transaction"
};

static RULES: [RuleDefinition; 19] = [
    EMPTY_INPUT,
    TOO_MANY_STATEMENTS,
    MISSING_STATEMENT_TERMINATOR,
    FULLWIDTH_STATEMENT_TERMINATOR,
    ROUTINE_DEFINITION_DETECTED,
    DANGEROUS_DROP,
    DANGEROUS_TRUNCATE,
    ALTER_DROP_COLUMN_RULE,
    UPDATE_WITHOUT_WHERE,
    DELETE_WITHOUT_WHERE,
    WHERE_1_EQ_1,
    SELECT_STAR_RULE,
    SELECT_WITHOUT_LIMIT,
    LIKE_LEADING_WILDCARD_RULE,
    ORDER_BY_RAND_RULE,
    INTO_OUTFILE_RULE,
    INSERT_WITHOUT_COLUMN_LIST,
    CREATE_TABLE_WITHOUT_IF_NOT_EXISTS,
    RISKY_WRITES_WITHOUT_TRANSACTION
];

fn is_dangerous_drop(text: &StatementText<'_>) -> bool {
    DROP_OBJECT.is_match(&text.upper)
}

fn is_truncate(text: &StatementText<'_>) -> bool {
    TRUNCATE_TABLE.is_match(&text.upper)
}

fn is_alter_drop_column(text: &StatementText<'_>) -> bool {
    ALTER_DROP_COLUMN.is_match(&text.upper)
}

fn is_update_without_where(text: &StatementText<'_>) -> bool {
    text.is_unfiltered(&UPDATE_STATEMENT)
}

fn is_delete_without_where(text: &StatementText<'_>) -> bool {
    text.is_unfiltered(&DELETE_STATEMENT)
}

fn has_where_one_eq_one(text: &StatementText<'_>) -> bool {
    WHERE_ONE_EQ_ONE.is_match(text.code())
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

fn has_order_by_rand(text: &StatementText<'_>) -> bool {
    ORDER_BY_RAND.is_match(text.code())
}

fn has_into_outfile(text: &StatementText<'_>) -> bool {
    INTO_OUTFILE.is_match(text.code())
}

fn is_insert_without_columns(text: &StatementText<'_>) -> bool {
    INSERT_WITHOUT_COLUMNS.is_match(&text.upper)
}

fn is_create_table_without_guard(text: &StatementText<'_>) -> bool {
    CREATE_TABLE.is_match(&text.upper) && !CREATE_TABLE_IF_NOT_EXISTS.is_match(&text.upper)
}

static CHECKS: [StatementCheck; 13] = [
    StatementCheck {
        rule:       DANGEROUS_DROP,
        message:    "High-risk DROP statement detected",
        suggestion: "Avoid DROP in production; take a full backup and get approval first",
        matches:    is_dangerous_drop
    },
    StatementCheck {
        rule:       DANGEROUS_TRUNCATE,
        message:    "TRUNCATE statement detected",
        suggestion: "TRUNCATE is costly to roll back; confirm the change window and recovery plan",
        matches:    is_truncate
    },
    StatementCheck {
        rule:       ALTER_DROP_COLUMN_RULE,
        message:    "ALTER TABLE ... DROP COLUMN detected",
        suggestion: "Confirm upstream and downstream code compatibility and archive historical data first",
        matches:    is_alter_drop_column
    },
    StatementCheck {
        rule:       UPDATE_WITHOUT_WHERE,
        message:    "UPDATE has no WHERE condition",
        suggestion: "Add a precise WHERE condition to avoid updating the whole table",
        matches:    is_update_without_where
    },
    StatementCheck {
        rule:       DELETE_WITHOUT_WHERE,
        message:    "DELETE has no WHERE condition",
        suggestion: "Add a WHERE condition, or delete in batches and keep a rollback point",
        matches:    is_delete_without_where
    },
    StatementCheck {
        rule:       WHERE_1_EQ_1,
        message:    "WHERE 1=1 detected, the condition may be ineffective",
        suggestion: "Review the dynamic SQL assembly to avoid accidental updates or deletes",
        matches:    has_where_one_eq_one
    },
    StatementCheck {
        rule:       SELECT_STAR_RULE,
        message:    "SELECT * may cause performance and compatibility problems",
        suggestion: "List the needed columns explicitly to reduce I/O and schema coupling",
        matches:    is_select_star
    },
    StatementCheck {
        rule:       SELECT_WITHOUT_LIMIT,
        message:    "SELECT has no LIMIT",
        suggestion: "Add LIMIT to online queries to avoid large result sets",
        matches:    is_select_without_limit
    },
    StatementCheck {
        rule:       LIKE_LEADING_WILDCARD_RULE,
        message:    "Leading wildcard in LIKE may prevent index usage",
        suggestion: "Consider full-text search, a reverse index or a different match strategy",
        matches:    has_like_leading_wildcard
    },
    StatementCheck {
        rule:       ORDER_BY_RAND_RULE,
        message:    "ORDER BY RAND() performs poorly on large tables",
        suggestion: "Sample random primary key ranges or use a pre-generated random pool",
        matches:    has_order_by_rand
    },
    StatementCheck {
        rule:       INTO_OUTFILE_RULE,
        message:    "INTO OUTFILE detected, data may leave the database server",
        suggestion: "Confirm export compliance, audit logging and least-privilege accounts",
        matches:    has_into_outfile
    },
    StatementCheck {
        rule:       INSERT_WITHOUT_COLUMN_LIST,
        message:    "INSERT has no explicit column list",
        suggestion: "Use INSERT INTO t(col1, col2, ...) VALUES (...) for maintainability",
        matches:    is_insert_without_columns
    },
    StatementCheck {
        rule:       CREATE_TABLE_WITHOUT_IF_NOT_EXISTS,
        message:    "CREATE TABLE does not use IF NOT EXISTS",
        suggestion: "Add IF NOT EXISTS so the script can be replayed safely",
        matches:    is_create_table_without_guard
    }
];

const TERMINATORS: TerminatorRules = TerminatorRules {
    fullwidth:          FULLWIDTH_STATEMENT_TERMINATOR,
    missing:            MISSING_STATEMENT_TERMINATOR,
    subject:            "SQL",
    missing_suggestion: "Terminate every statement so automated review and execution split it correctly"
};

/// MySQL evaluator.
pub struct MySqlAnalyzer;

impl EngineAnalyzer for MySqlAnalyzer {
    fn engine(&self) -> Engine {
        Engine::MySql
    }

    fn catalog(&self) -> RuleCatalog {
        RuleCatalog {
            engine:        Engine::MySql,
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
        let routine_detected = ROUTINE_DEFINITION.is_match(script);
        let mut issues = Vec::new();

        if routine_detected {
            issues.push(Issue::script(
                &ROUTINE_DEFINITION_DETECTED,
                "Stored procedure, function or trigger definition detected",
                "Parsed with DELIMITER syntax; review writes and permission checks inside the routine body"
            ));
        }
        issues.extend(TERMINATORS.issues(
            fullwidth_terminators(&statements),
            missing_sql_terminators(script, &statements, routine_detected)
        ));
        issues.extend(too_many_statements(
            &TOO_MANY_STATEMENTS,
            statements.len(),
            MAX_STATEMENTS,
            "Split the script by business module and review in batches to simplify rollback"
        ));

        let texts: Vec<StatementText<'_>> = statements.iter().map(StatementText::new).collect();
        issues.extend(run_checks(&CHECKS, &texts));

        if TransactionScan::scan(&texts).is_unguarded(statements.len()) {
            issues.push(Issue::script(
                &RISKY_WRITES_WITHOUT_TRANSACTION,
                TRANSACTION_MESSAGE,
                "Wrap the batch in BEGIN/COMMIT to keep the change consistent"
            ));
        }

        Evaluation {
            statement_count: statements.len(),
            issues,
            routine_detected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Statement;

    fn matches(check: fn(&StatementText<'_>) -> bool, sql: &str) -> bool {
        let statement = Statement {
            index:                1,
            text:                 sql.to_string(),
            offset:               0,
            end:                  0,
            terminated:           true,
            fullwidth_terminator: false
        };
        check(&StatementText::new(&statement))
    }

    #[test]
    fn test_checks_follow_catalog_order() {
        let positions: Vec<usize> = CHECKS
            .iter()
            .map(|c| RULES.iter().position(|r| r.code == c.rule.code).unwrap_or(usize::MAX))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_dangerous_drop() {
        assert!(matches(is_dangerous_drop, "drop table users"));
        assert!(!matches(is_dangerous_drop, "DROP PROCEDURE p"));
    }

    #[test]
    fn test_alter_drop_column() {
        assert!(matches(is_alter_drop_column, "ALTER TABLE users DROP COLUMN age"));
        assert!(!matches(is_alter_drop_column, "ALTER TABLE users ADD COLUMN age INT"));
    }

    #[test]
    fn test_update_without_where() {
        assert!(matches(is_update_without_where, "UPDATE users SET status='off'"));
        assert!(!matches(is_update_without_where, "UPDATE users SET status='off' WHERE id = 1"));
    }

    #[test]
    fn test_select_without_limit() {
        assert!(matches(is_select_without_limit, "SELECT id FROM t"));
        assert!(!matches(is_select_without_limit, "SELECT id FROM t LIMIT 10"));
        assert!(matches(is_select_without_limit, "SELECT ' LIMIT 5' FROM t"));
    }

    #[test]
    fn test_like_leading_wildcard() {
        assert!(matches(has_like_leading_wildcard, "SELECT 1 FROM t WHERE n LIKE '%tom'"));
        assert!(!matches(has_like_leading_wildcard, "SELECT 1 FROM t WHERE n LIKE 'tom%'"));
    }

    #[test]
    fn test_into_outfile_and_rand() {
        assert!(matches(has_into_outfile, "SELECT * FROM t INTO OUTFILE '/tmp/x'"));
        assert!(matches(has_order_by_rand, "SELECT id FROM t ORDER BY RAND() LIMIT 1"));
    }

    #[test]
    fn test_insert_and_create_table() {
        assert!(matches(is_insert_without_columns, "INSERT INTO db.t VALUES (1)"));
        assert!(!matches(is_insert_without_columns, "INSERT INTO t(a) VALUES (1)"));
        assert!(matches(is_create_table_without_guard, "CREATE TABLE t (id INT)"));
        assert!(!matches(is_create_table_without_guard, "CREATE TABLE IF NOT EXISTS t (id INT)"));
    }

    #[test]
    fn test_where_one_eq_one() {
        assert!(matches(has_where_one_eq_one, "DELETE FROM t WHERE 1 = 1"));
    }

    #[test]
    fn test_routine_pattern() {
        assert!(ROUTINE_DEFINITION.is_match("CREATE DEFINER=`root`@`%` TRIGGER trg"));
        assert!(ROUTINE_DEFINITION.is_match("create procedure p()"));
        assert!(!ROUTINE_DEFINITION.is_match("CREATE TABLE p (id INT)"));
    }
}
