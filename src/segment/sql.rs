use super::{
    FULLWIDTH_SEMICOLON, Statement, StatementBuilder,
    lexer::{Class, CommentStyle, LexState, Lexer}
};

const DEFAULT_DELIMITER: &str = ";";

/// Delimiter based SQL splitter.
#[derive(Debug, Clone, Copy)]
pub struct SqlSegmenter {
    /// Honour `DELIMITER <token>` lines.
    pub delimiter_directives: bool
}

impl Default for SqlSegmenter {
    fn default() -> Self {
        Self {
            delimiter_directives: true
        }
    }
}

impl SqlSegmenter {
    /// Split `script` into statements.
    ///
    /// Terminators inside quotes and comments are ignored. While the active
    /// delimiter is `;` a full-width semicolon also ends a statement and marks
    /// it with `fullwidth_terminator`. Comments are dropped from the output.
    pub fn segment(&self, script: &str) -> Vec<Statement> {
        let mut lexer = Lexer::new(CommentStyle::Sql);
        let mut builder = StatementBuilder::default();
        let mut delimiter = DEFAULT_DELIMITER.to_owned();
        let mut line_offset = 0;

        for line in script.split_inclusive('\n') {
            let base = line_offset;
            line_offset += line.len();

            if self.delimiter_directives
                && lexer.state() == LexState::Code
                && let Some(token) = parse_delimiter_directive(line)
            {
                tracing::trace!(delimiter = token, "delimiter switched");
                delimiter = token.to_owned();
                continue;
            }

            let mut chars = line.char_indices().peekable();
            while let Some((pos, ch)) = chars.next() {
                let next = chars.peek().map(|&(_, c)| c);
                let lexeme = lexer.advance(ch, next);
                if lexeme.width == 2 {
                    chars.next();
                }
                match lexeme.class {
                    Class::Comment => continue,
                    Class::Quoted => {
                        builder.push(base + pos, ch);
                        continue;
                    }
                    Class::Code => {}
                }

                if line[pos..].starts_with(delimiter.as_str()) {
                    builder.flush(true, false);
                    for _ in 1..delimiter.chars().count() {
                        chars.next();
                    }
                    lexer.clear_escape();
                    continue;
                }
                if ch == FULLWIDTH_SEMICOLON && delimiter == DEFAULT_DELIMITER {
                    builder.flush(true, true);
                    continue;
                }
                builder.push(base + pos, ch);
            }
        }

        builder.finish()
    }
}

/// Parse a `DELIMITER <token>` line, returning the new token.
fn parse_delimiter_directive(line: &str) -> Option<&str> {
    let mut fields = line.split_whitespace();
    let keyword = fields.next()?;
    if !keyword.eq_ignore_ascii_case("DELIMITER") {
        return None;
    }
    fields.next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(script: &str) -> Vec<String> {
        SqlSegmenter::default()
            .segment(script)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn test_quoted_semicolon_does_not_split() {
        let got = texts("INSERT INTO t(v) VALUES('a;b');\nSELECT id FROM t LIMIT 1;");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], "INSERT INTO t(v) VALUES('a;b')");
    }

    #[test]
    fn test_delimiter_directive_switches_terminator() {
        let script = "DELIMITER $$\nCREATE PROCEDURE p_demo()\nBEGIN\n  SELECT 1;\n  SELECT 2;\nEND$$\nDELIMITER ;\nSELECT 3;";
        let got = texts(script);
        assert_eq!(got.len(), 2);
        assert!(got[0].starts_with("CREATE PROCEDURE"));
        assert!(got[0].ends_with("END"));
        assert_eq!(got[1], "SELECT 3");
    }

    #[test]
    fn test_backslash_delimiter_does_not_escape_following_literal() {
        let got = texts("DELIMITER \\\\\nSELECT 1\\\\\nSELECT 'x'\\\\\nDELIMITER ;");
        assert_eq!(got, vec!["SELECT 1", "SELECT 'x'"]);
    }

    #[test]
    fn test_directives_ignored_when_disabled() {
        let segmenter = SqlSegmenter {
            delimiter_directives: false
        };
        let got = segmenter.segment("DELIMITER $$\nSELECT 1$$");
        assert_eq!(got.len(), 1);
        assert!(got[0].text.starts_with("DELIMITER"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let got = texts("-- head\nSELECT 1; # tail\n/* a; b */ SELECT 2;");
        assert_eq!(got, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_fullwidth_terminator_is_flagged() {
        let got = SqlSegmenter::default().segment("SELECT 1\u{FF1B}\nSELECT 2;");
        assert_eq!(got.len(), 2);
        assert!(got[0].terminated);
        assert!(got[0].fullwidth_terminator);
        assert!(!got[1].fullwidth_terminator);
    }

    #[test]
    fn test_fullwidth_inside_custom_delimiter_is_text() {
        let got = texts("DELIMITER //\nSELECT '\u{FF1B}' \u{FF1B} 1//");
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn test_trailing_fragment_is_unterminated() {
        let got = SqlSegmenter::default().segment("SELECT 1;\n  SELECT 2  \n");
        assert_eq!(got.len(), 2);
        assert!(got[0].terminated);
        assert!(!got[1].terminated);
        assert_eq!(got[1].text, "SELECT 2");
    }

    #[test]
    fn test_offsets_point_at_statement_text() {
        let script = "  SELECT 1;\n\nUPDATE t SET a = 1;";
        for statement in SqlSegmenter::default().segment(script) {
            assert!(script[statement.offset..].starts_with(&statement.text));
        }
    }

    #[test]
    fn test_whitespace_only_pieces_are_skipped() {
        assert!(texts(" ; ;\n;").is_empty());
    }
}
