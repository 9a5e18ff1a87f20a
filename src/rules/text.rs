//! Normalized statement views and the patterns shared by the SQL engines.

use std::sync::{LazyLock, OnceLock};

use regex::Regex;

use crate::segment::{CommentStyle, Statement, strip_comments_and_strings};

/// `UPDATE <table> SET ...`
pub static UPDATE_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*UPDATE\s+.+?\s+SET\s+.+$").expect("valid regex"));

/// `DELETE FROM ...`
pub static DELETE_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*DELETE\s+FROM\s+.+$").expect("valid regex"));

/// Applied to the literal-free code view.
pub static WHERE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bWHERE\b").expect("valid regex"));

pub static SELECT_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*SELECT\s+\*\s+FROM\s+").expect("valid regex"));

pub static SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*SELECT\s+").expect("valid regex"));

pub static LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\s+LIMIT\s+\d+").expect("valid regex"));

pub static DROP_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*DROP\s+(TABLE|DATABASE|VIEW|INDEX)\b").expect("valid regex"));

pub static TRUNCATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*TRUNCATE\s+TABLE\b").expect("valid regex"));

pub static BEGIN_TRANSACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*(BEGIN|START\s+TRANSACTION)\b").expect("valid regex"));

pub static COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*COMMIT\b").expect("valid regex"));

/// Statements that change data or structure.
pub static RISKY_WRITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*(UPDATE|DELETE|INSERT|ALTER|DROP|TRUNCATE)\b").expect("valid regex"));

/// One statement seen through the views rule predicates need.
#[derive(Debug)]
pub struct StatementText<'a> {
    pub index: usize,
    /// Statement text as segmented.
    pub raw:   &'a str,
    /// Upper-cased `raw`.
    pub upper: String,
    code:      OnceLock<String>,
    compact:   OnceLock<String>
}

impl<'a> StatementText<'a> {
    pub fn new(statement: &'a Statement) -> Self {
        Self {
            index:   statement.index,
            raw:     &statement.text,
            upper:   statement.text.to_uppercase(),
            code:    OnceLock::new(),
            compact: OnceLock::new()
        }
    }

    /// Upper-cased text with comments removed and literals blanked out.
    pub fn code(&self) -> &str {
        self.code
            .get_or_init(|| strip_comments_and_strings(&self.upper, CommentStyle::Sql))
    }

    /// Lower-cased text with all whitespace removed.
    pub fn compact(&self) -> &str {
        self.compact.get_or_init(|| {
            self.raw
                .to_lowercase()
                .split_whitespace()
                .collect::<String>()
        })
    }

    /// `UPDATE ... SET ...` or `DELETE FROM ...` with no `WHERE` keyword
    /// outside string literals.
    pub fn is_unfiltered(&self, statement: &Regex) -> bool {
        statement.is_match(&self.upper) && !WHERE_KEYWORD.is_match(self.code())
    }
}
