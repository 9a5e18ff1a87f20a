//! Character-level lexer shared by every segmenter.
//!
//! The lexer owns a single [`LexState`] so two quoting or comment modes can
//! never be active at once. Callers feed it one character at a time together
//! with the following character and receive a [`Lexeme`] telling them how the
//! character should be treated.

/// Comment syntax understood by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `--` and `#` line comments, `/* */` block comments.
    Sql,
    /// `//` line comments, `/* */` block comments.
    Script
}

/// Active lexical mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Code,
    SingleQuote,
    DoubleQuote,
    Backtick,
    LineComment,
    BlockComment
}

impl LexState {
    fn closing_quote(self) -> Option<char> {
        match self {
            Self::SingleQuote => Some('\''),
            Self::DoubleQuote => Some('"'),
            Self::Backtick => Some('`'),
            _ => None
        }
    }
}

/// How a scanned character takes part in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Code,
    /// Part of a string literal or quoted identifier, quotes included.
    Quoted,
    /// Part of a comment, delimiters included.
    Comment
}

/// Result of feeding one character to the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub class: Class,
    /// Number of characters consumed: 2 when `next` was swallowed as part of
    /// a two-character comment delimiter.
    pub width: usize
}

impl Lexeme {
    const fn one(class: Class) -> Self {
        Self {
            class,
            width: 1
        }
    }

    const fn two(class: Class) -> Self {
        Self {
            class,
            width: 2
        }
    }
}

/// Explicit lexer state machine.
#[derive(Debug, Clone)]
pub struct Lexer {
    style:       CommentStyle,
    state:       LexState,
    backslashes: usize
}

impl Lexer {
    pub fn new(style: CommentStyle) -> Self {
        Self {
            style,
            state: LexState::Code,
            backslashes: 0
        }
    }

    pub fn state(&self) -> LexState {
        self.state
    }

    /// Forget the pending backslash run. Callers that consume characters
    /// without feeding them to [`Lexer::advance`] call this afterwards.
    pub fn clear_escape(&mut self) {
        self.backslashes = 0;
    }

    /// Feed `ch` (and peek at `next`) and return its classification.
    pub fn advance(&mut self, ch: char, next: Option<char>) -> Lexeme {
        let lexeme = match self.state {
            LexState::LineComment => {
                if ch == '\n' || ch == '\r' {
                    self.state = LexState::Code;
                    Lexeme::one(Class::Code)
                } else {
                    Lexeme::one(Class::Comment)
                }
            }
            LexState::BlockComment => {
                if ch == '*' && next == Some('/') {
                    self.state = LexState::Code;
                    Lexeme::two(Class::Comment)
                } else {
                    Lexeme::one(Class::Comment)
                }
            }
            LexState::SingleQuote | LexState::DoubleQuote | LexState::Backtick => {
                if Some(ch) == self.state.closing_quote() && !self.is_escaped(ch) {
                    self.state = LexState::Code;
                }
                Lexeme::one(Class::Quoted)
            }
            LexState::Code => self.advance_code(ch, next)
        };
        self.backslashes = match (lexeme.class, ch) {
            (Class::Comment, _) => 0,
            (_, '\\') => self.backslashes + 1,
            _ => 0
        };
        lexeme
    }

    fn advance_code(&mut self, ch: char, next: Option<char>) -> Lexeme {
        match (self.style, ch, next) {
            (CommentStyle::Sql, '-', Some('-')) | (CommentStyle::Script, '/', Some('/')) => {
                self.state = LexState::LineComment;
                return Lexeme::two(Class::Comment);
            }
            (CommentStyle::Sql, '#', _) => {
                self.state = LexState::LineComment;
                return Lexeme::one(Class::Comment);
            }
            (_, '/', Some('*')) => {
                self.state = LexState::BlockComment;
                return Lexeme::two(Class::Comment);
            }
            _ => {}
        }
        let opened = match ch {
            '\'' => LexState::SingleQuote,
            '"' => LexState::DoubleQuote,
            '`' => LexState::Backtick,
            _ => return Lexeme::one(Class::Code)
        };
        if self.is_escaped(ch) {
            return Lexeme::one(Class::Code);
        }
        self.state = opened;
        Lexeme::one(Class::Quoted)
    }

    /// A quote is escaped when preceded by an odd run of backslashes.
    /// Backticks delimit identifiers in SQL and are never escaped there.
    fn is_escaped(&self, quote: char) -> bool {
        if quote == '`' && self.style == CommentStyle::Sql {
            return false;
        }
        self.backslashes % 2 == 1
    }
}

/// Remove comments and blank out string contents.
///
/// Comment text disappears but the newlines inside it survive. Every
/// character of a quoted literal, quotes included, becomes a space, again
/// keeping newlines, so keyword positions in the remaining code stay put.
pub fn strip_comments_and_strings(text: &str, style: CommentStyle) -> String {
    let mut lexer = Lexer::new(style);
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let lexeme = lexer.advance(ch, chars.peek().copied());
        match lexeme.class {
            Class::Code => out.push(ch),
            Class::Quoted if ch == '\n' => out.push('\n'),
            Class::Quoted => out.push(' '),
            Class::Comment if ch == '\n' => out.push('\n'),
            Class::Comment => {}
        }
        if lexeme.width == 2 {
            chars.next();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(text: &str, style: CommentStyle) -> Vec<Class> {
        let mut lexer = Lexer::new(style);
        let mut out = Vec::new();
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let lexeme = lexer.advance(ch, chars.peek().copied());
            for _ in 0..lexeme.width {
                out.push(lexeme.class);
            }
            if lexeme.width == 2 {
                chars.next();
            }
        }
        out
    }

    #[test]
    fn test_quoted_semicolon_is_not_code() {
        let got = classes("'a;b';", CommentStyle::Sql);
        assert_eq!(got[2], Class::Quoted);
        assert_eq!(got[5], Class::Code);
    }

    #[test]
    fn test_odd_backslash_run_escapes_quote() {
        let mut lexer = Lexer::new(CommentStyle::Sql);
        for ch in "'it\\'s".chars() {
            lexer.advance(ch, None);
        }
        assert_eq!(lexer.state(), LexState::SingleQuote);
    }

    #[test]
    fn test_cleared_backslash_run_does_not_escape() {
        let mut lexer = Lexer::new(CommentStyle::Sql);
        for ch in "'a\\".chars() {
            lexer.advance(ch, None);
        }
        lexer.clear_escape();
        lexer.advance('\'', None);
        assert_eq!(lexer.state(), LexState::Code);
    }

    #[test]
    fn test_even_backslash_run_closes_quote() {
        let mut lexer = Lexer::new(CommentStyle::Sql);
        for ch in "'dir\\\\'".chars() {
            lexer.advance(ch, None);
        }
        assert_eq!(lexer.state(), LexState::Code);
    }

    #[test]
    fn test_sql_backtick_ignores_backslash() {
        let mut lexer = Lexer::new(CommentStyle::Sql);
        for ch in "`a\\`".chars() {
            lexer.advance(ch, None);
        }
        assert_eq!(lexer.state(), LexState::Code);
    }

    #[test]
    fn test_hash_is_comment_only_for_sql() {
        assert_eq!(classes("#x", CommentStyle::Sql)[1], Class::Comment);
        assert_eq!(classes("#x", CommentStyle::Script)[1], Class::Code);
    }

    #[test]
    fn test_line_comment_newline_is_code() {
        let got = classes("// c\nx", CommentStyle::Script);
        assert_eq!(got[4], Class::Code);
        assert_eq!(got[5], Class::Code);
    }

    #[test]
    fn test_strip_keeps_newlines_and_positions() {
        let stripped =
            strip_comments_and_strings("SELECT 'a\nb' -- note\n/* x\ny */;", CommentStyle::Sql);
        assert_eq!(stripped, "SELECT   \n   \n\n;");
    }

    #[test]
    fn test_strip_script_comments() {
        let stripped = strip_comments_and_strings("db.x.find() // tail", CommentStyle::Script);
        assert_eq!(stripped, "db.x.find() ");
    }
}
