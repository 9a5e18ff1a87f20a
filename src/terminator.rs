//! Terminator heuristics.
//!
//! Runs after segmentation and looks for two script-syntax problems:
//! statements closed with the full-width semicolon, and statements that
//! appear to be missing their terminator altogether. A single statement is
//! reported for at most one of the two.

use smallvec::SmallVec;

use crate::segment::{
    CommentStyle, FULLWIDTH_SEMICOLON, Statement, count_statement_starts, split_by_line_starts,
    strip_comments_and_strings
};

/// A statement flagged by one of the terminator checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminatorFinding {
    /// Index of the segmented statement the finding belongs to.
    pub index:     usize,
    /// Byte offset just past the offending statement, identifying it within
    /// its segmented statement.
    pub end:       usize,
    /// Offending statement text.
    pub statement: String
}

pub type Findings = SmallVec<[TerminatorFinding; 4]>;

/// Statements whose closing character was the full-width semicolon.
pub fn fullwidth_terminators(statements: &[Statement]) -> Findings {
    statements
        .iter()
        .filter(|s| s.fullwidth_terminator)
        .map(finding)
        .collect()
}

/// Statements of a SQL script that look like they lost their terminator.
///
/// Scripts with routine definitions or `DELIMITER` directives are exempt.
/// When one segmented statement holds several independent statement starts
/// the raw script is re-split line by line and every unterminated piece is
/// reported against the segmented statement it ends in. Otherwise only
/// the final statement is reported, and only if the script does not end
/// with a terminator.
pub fn missing_sql_terminators(script: &str, statements: &[Statement], routine: bool) -> Findings {
    if routine {
        return Findings::new();
    }
    let stripped = strip_comments_and_strings(script, CommentStyle::Sql);
    let stripped = stripped.trim();
    if stripped.is_empty() || stripped.to_uppercase().contains("DELIMITER ") {
        return Findings::new();
    }

    if has_merged_statements(statements) {
        let pieces = split_by_line_starts(script);
        if pieces.len() <= 1 {
            return Findings::new();
        }
        tracing::debug!(pieces = pieces.len(), "merged statements, using line-start split");
        return pieces
            .iter()
            .filter(|piece| !piece.terminated)
            .map(|piece| TerminatorFinding {
                index:     owning_statement(statements, piece.end),
                end:       piece.end,
                statement: piece.text.clone()
            })
            .collect();
    }

    if stripped.ends_with([';', FULLWIDTH_SEMICOLON]) {
        return Findings::new();
    }
    statements.last().map(finding).into_iter().collect()
}

/// Unterminated operations of a multi-operation Mongo script.
pub fn missing_mongo_terminators(operations: &[Statement]) -> Findings {
    if operations.len() <= 1 {
        return Findings::new();
    }
    operations
        .iter()
        .filter(|op| !op.terminated)
        .map(finding)
        .collect()
}

/// Drop every missing-terminator finding that names a statement already
/// in `covered`.
///
/// Statements are matched by their end offset, so an unterminated piece of a
/// merged statement survives even when the same segmented statement closes
/// with a full-width terminator.
pub fn exclude(missing: Findings, covered: &[TerminatorFinding]) -> Findings {
    missing
        .into_iter()
        .filter(|item| {
            !covered
                .iter()
                .any(|c| c.index == item.index && c.end == item.end)
        })
        .collect()
}

/// Newline-joined text of every finding.
pub fn snippet(findings: &[TerminatorFinding]) -> String {
    findings
        .iter()
        .map(|f| f.statement.as_str())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn missing_message(findings: &[TerminatorFinding], subject: &str) -> String {
    match distinct_indices(findings).as_slice() {
        [] => format!("Multiple {} statements appear to be missing a terminator (;)", subject),
        [index] => format!(
            "{} statement {} appears to be missing a terminator (;)",
            subject, index
        ),
        many => format!(
            "{} statements {} appear to be missing a terminator (;)",
            subject,
            join_indices(many)
        )
    }
}

pub fn fullwidth_message(findings: &[TerminatorFinding], subject: &str) -> String {
    match distinct_indices(findings).as_slice() {
        [] => "Full-width terminator (；) detected, use an ASCII semicolon (;)".to_string(),
        [index] => format!(
            "{} statement {} uses a full-width terminator (；)",
            subject, index
        ),
        many => format!(
            "{} statements {} use a full-width terminator (；)",
            subject,
            join_indices(many)
        )
    }
}

fn finding(statement: &Statement) -> TerminatorFinding {
    TerminatorFinding {
        index:     statement.index,
        end:       statement.end,
        statement: statement.text.clone()
    }
}

fn has_merged_statements(statements: &[Statement]) -> bool {
    statements.iter().any(|statement| {
        let code = strip_comments_and_strings(&statement.text, CommentStyle::Sql);
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        let (all, hard) = count_statement_starts(code);
        hard >= 2 || (hard >= 1 && all >= 2)
    })
}

/// Index of the last segmented statement starting before `end`.
fn owning_statement(statements: &[Statement], end: usize) -> usize {
    statements
        .iter()
        .rev()
        .find(|s| s.offset < end)
        .or(statements.first())
        .map_or(1, |s| s.index)
}

fn distinct_indices(findings: &[TerminatorFinding]) -> SmallVec<[usize; 4]> {
    let mut indices: SmallVec<[usize; 4]> = findings.iter().map(|f| f.index).collect();
    indices.dedup();
    indices
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{SqlSegmenter, split_mongo_operations};

    fn sql_missing(script: &str) -> Findings {
        let statements = SqlSegmenter::default().segment(script);
        missing_sql_terminators(script, &statements, false)
    }

    #[test]
    fn test_merged_statements_are_attributed_to_their_segment() {
        let missing = sql_missing("UPDATE users SET status='inactive'\nDELETE FROM users WHERE id = 10");
        assert_eq!(missing.len(), 2);
        assert!(missing.iter().all(|f| f.index == 1));
        assert_eq!(missing[0].statement, "UPDATE users SET status='inactive'");
    }

    #[test]
    fn test_single_statement_without_terminator() {
        let missing = sql_missing("SELECT * FROM users WHERE name LIKE '%tom%'");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].index, 1);
    }

    #[test]
    fn test_trailing_comment_after_terminator_is_fine() {
        assert!(sql_missing("SELECT 1; -- done").is_empty());
    }

    #[test]
    fn test_cte_is_not_merged() {
        assert!(sql_missing("WITH cte AS (\n  SELECT id, name FROM users\n)\nSELECT * FROM cte;").is_empty());
    }

    #[test]
    fn test_missing_before_commit() {
        let script = "START TRANSACTION;\nUPDATE users SET status='inactive' WHERE id = 1;\nDELETE FROM orders WHERE id = 2;\nSELECT * FROM users WHERE name LIKE '%tom%'\nCOMMIT;";
        let missing = sql_missing(script);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].index, 4);
        assert!(!missing[0].statement.contains("COMMIT"));
    }

    #[test]
    fn test_routine_and_delimiter_scripts_are_exempt() {
        let script = "UPDATE a SET b = 1\nDELETE FROM a";
        let statements = SqlSegmenter::default().segment(script);
        assert!(missing_sql_terminators(script, &statements, true).is_empty());
        assert!(sql_missing("DELIMITER $$\nSELECT 1$$\nDELIMITER ;\nSELECT 2").is_empty());
    }

    #[test]
    fn test_fullwidth_excludes_missing() {
        let statements = SqlSegmenter::default().segment("SELECT 1\u{FF1B}\nSELECT 2;");
        let fullwidth = fullwidth_terminators(&statements);
        assert_eq!(fullwidth.len(), 1);
        assert_eq!(fullwidth[0].end, 8);
        assert!(exclude(fullwidth.clone(), &fullwidth).is_empty());
    }

    #[test]
    fn test_fullwidth_keeps_unterminated_piece_of_same_statement() {
        let script = "UPDATE a SET b = 1\nDELETE FROM a WHERE id = 1\u{FF1B}\nSELECT 1 LIMIT 1;";
        let statements = SqlSegmenter::default().segment(script);
        let fullwidth = fullwidth_terminators(&statements);
        assert_eq!(fullwidth.len(), 1);
        assert_eq!(fullwidth[0].index, 1);

        let missing = exclude(missing_sql_terminators(script, &statements, false), &fullwidth);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].index, 1);
        assert_eq!(missing[0].statement, "UPDATE a SET b = 1");
    }

    #[test]
    fn test_comment_prefixed_piece_belongs_to_next_statement() {
        let missing = sql_missing(
            "SELECT 1 LIMIT 1;\n/* note */ UPDATE a SET b = 1 WHERE id = 1\nDELETE FROM a WHERE id = 2;"
        );
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].index, 2);
        assert_eq!(missing[0].statement, "UPDATE a SET b = 1 WHERE id = 1");
    }

    #[test]
    fn test_mongo_single_operation_never_missing() {
        let ops = split_mongo_operations("db.users.find({})");
        assert!(missing_mongo_terminators(&ops).is_empty());
    }

    #[test]
    fn test_mongo_missing_middle_operation() {
        let ops = split_mongo_operations("db.a.find({});\ndb.b.deleteMany({ x: 1 })\ndb.c.find({});");
        let missing = missing_mongo_terminators(&ops);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].index, 2);
    }

    #[test]
    fn test_messages_list_indices_once() {
        let findings = [
            TerminatorFinding {
                index:     1,
                end:       0,
                statement: "UPDATE a SET b = 1".into()
            },
            TerminatorFinding {
                index:     1,
                end:       0,
                statement: "DELETE FROM a".into()
            },
            TerminatorFinding {
                index:     3,
                end:       0,
                statement: "SELECT 1".into()
            }
        ];
        assert_eq!(
            missing_message(&findings, "SQL"),
            "SQL statements 1, 3 appear to be missing a terminator (;)"
        );
        assert_eq!(snippet(&findings), "UPDATE a SET b = 1\nDELETE FROM a\nSELECT 1");
        assert_eq!(
            fullwidth_message(&findings[2..], "Mongo"),
            "Mongo statement 3 uses a full-width terminator (；)"
        );
    }
}
