//! Script segmentation.
//!
//! Turns raw script text into an ordered list of [`Statement`]s. Three
//! splitters live here:
//!
//! - [`SqlSegmenter`] - delimiter based, honours `DELIMITER` directives and
//!   treats the full-width semicolon as an alternate terminator
//! - [`split_mongo_operations`] - bracket-depth aware splitter for shell calls
//! - [`split_by_line_starts`] - line oriented fallback used to pull apart
//!   statements that were glued together without a terminator
//!
//! All of them run on top of the [`lexer`] state machine, so quotes and
//! comments are handled identically everywhere.

mod heuristic;
pub mod lexer;
mod mongo;
mod sql;

pub use heuristic::{count_statement_starts, split_by_line_starts};
pub use lexer::{CommentStyle, strip_comments_and_strings};
pub use mongo::split_mongo_operations;
use serde::Serialize;
pub use sql::SqlSegmenter;

/// U+FF1B, the full-width semicolon.
pub const FULLWIDTH_SEMICOLON: char = '\u{FF1B}';

/// One statement fragment of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// 1-based position in the script.
    pub index:                usize,
    /// Trimmed text without the terminator and without comments.
    pub text:                 String,
    /// Byte offset in the script of the first character of `text`.
    pub offset:               usize,
    /// Byte offset in the script just past the last character of `text`.
    pub end:                  usize,
    pub terminated:           bool,
    pub fullwidth_terminator: bool
}

/// Accumulates characters of the statement currently being read.
#[derive(Debug, Default)]
struct StatementBuilder {
    items:  Vec<Statement>,
    buffer: String,
    start:  Option<usize>,
    end:    usize
}

impl StatementBuilder {
    fn push(&mut self, offset: usize, ch: char) {
        if !ch.is_whitespace() {
            self.start.get_or_insert(offset);
            self.end = offset + ch.len_utf8();
        }
        self.buffer.push(ch);
    }

    fn push_line(&mut self, offset: usize, line: &str) {
        if self.start.is_none() {
            self.start = Some(offset);
        } else {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
        self.end = offset + line.len();
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn flush(&mut self, terminated: bool, fullwidth_terminator: bool) {
        let text = self.buffer.trim();
        if let Some(offset) = self.start
            && !text.is_empty()
        {
            self.items.push(Statement {
                index: self.items.len() + 1,
                text: text.to_owned(),
                offset,
                end: self.end,
                terminated,
                fullwidth_terminator
            });
        }
        self.buffer.clear();
        self.start = None;
        self.end = 0;
    }

    fn finish(mut self) -> Vec<Statement> {
        self.flush(false, false);
        self.items
    }
}
