use std::sync::LazyLock;

use regex::Regex;

use super::{FULLWIDTH_SEMICOLON, Statement, StatementBuilder};

/// Any keyword that can open a SQL statement.
static STATEMENT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^\s*(SELECT|INSERT|UPDATE|DELETE|CREATE|ALTER|DROP|TRUNCATE|WITH|CALL|REPLACE|MERGE|BEGIN|START\s+TRANSACTION|COMMIT|ROLLBACK)\b"
    )
    .expect("valid regex")
});

/// Statement openers that never continue another statement. `SELECT` and
/// `WITH` are left out: they legitimately follow a CTE or a subquery line.
static HARD_STATEMENT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^\s*(INSERT|UPDATE|DELETE|CREATE|ALTER|DROP|TRUNCATE|CALL|REPLACE|MERGE|BEGIN|START\s+TRANSACTION|COMMIT|ROLLBACK)\b"
    )
    .expect("valid regex")
});

/// Count line-leading statement keywords in `code`, returned as
/// `(all, hard)`.
pub fn count_statement_starts(code: &str) -> (usize, usize) {
    (
        STATEMENT_START.find_iter(code).count(),
        HARD_STATEMENT_START.find_iter(code).count()
    )
}

/// Re-split a script on physical lines.
///
/// A line opening with a statement keyword closes whatever was open before
/// it (unterminated); a line ending in `;` or the full-width semicolon closes
/// the current statement as terminated. Blank lines and `--` / `#` comment
/// lines are skipped, block comments closed on the line they open are
/// dropped from its start, and kept lines are trimmed, then joined with `\n`.
pub fn split_by_line_starts(script: &str) -> Vec<Statement> {
    let mut builder = StatementBuilder::default();
    let mut offset = 0;

    for raw in script.split(['\n', '\r']) {
        let base = offset;
        offset += raw.len() + 1;

        let line = skip_leading_block_comments(raw.trim());
        if line.is_empty() || line.starts_with("--") || line.starts_with('#') {
            continue;
        }
        if !builder.is_empty() && STATEMENT_START.is_match(line) {
            builder.flush(false, false);
        }
        let lead = raw.trim_end().len() - line.len();
        builder.push_line(base + lead, line);

        if line.ends_with(';') {
            builder.flush(true, false);
        } else if line.ends_with(FULLWIDTH_SEMICOLON) {
            builder.flush(true, true);
        }
    }

    builder.finish()
}

fn skip_leading_block_comments(mut line: &str) -> &str {
    while let Some(rest) = line.strip_prefix("/*") {
        match rest.find("*/") {
            Some(close) => line = rest[close + 2..].trim_start(),
            None => break
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_hard_and_soft_starts() {
        assert_eq!(count_statement_starts("WITH cte AS (\n SELECT 1\n)\nSELECT * FROM cte"), (3, 0));
        assert_eq!(count_statement_starts("SELECT 1\nCOMMIT"), (2, 1));
        assert_eq!(count_statement_starts("UPDATE t SET a=1\nDELETE FROM t"), (2, 2));
    }

    #[test]
    fn test_keyword_line_closes_previous_statement() {
        let got = split_by_line_starts("UPDATE users SET status='inactive'\nDELETE FROM orders;\nSELECT 1;");
        assert_eq!(got.len(), 3);
        assert!(!got[0].terminated);
        assert_eq!(got[0].text, "UPDATE users SET status='inactive'");
        assert!(got[1].terminated);
    }

    #[test]
    fn test_continuation_lines_are_trimmed_and_joined() {
        let got = split_by_line_starts("UPDATE t SET a = 1 WHERE b <\n   '180 days'\nDELETE FROM o;");
        assert_eq!(got[0].text, "UPDATE t SET a = 1 WHERE b <\n'180 days'");
    }

    #[test]
    fn test_offsets_follow_trimmed_line() {
        let script = "BEGIN;\r\n   SELECT 1\nCOMMIT;";
        let got = split_by_line_starts(script);
        assert_eq!(got.len(), 3);
        assert!(script[got[1].offset..].starts_with("SELECT 1"));
        assert!(script[got[2].offset..].starts_with("COMMIT"));
    }

    #[test]
    fn test_leading_block_comment_is_skipped() {
        let script = "SELECT 1;\n  /* a */ /* b */ UPDATE t SET a = 1\n/* only */\nDELETE FROM t;";
        let got = split_by_line_starts(script);
        assert_eq!(got.len(), 3);
        assert_eq!(got[1].text, "UPDATE t SET a = 1");
        assert!(script[got[1].offset..].starts_with("UPDATE"));
        assert_eq!(&script[got[1].offset..got[1].end], "UPDATE t SET a = 1");
        assert!(!got[1].terminated);
    }

    #[test]
    fn test_fullwidth_line_end() {
        let got = split_by_line_starts("SELECT 1\u{FF1B}\nSELECT 2;");
        assert!(got[0].fullwidth_terminator);
        assert!(!got[1].fullwidth_terminator);
    }
}
