use super::{
    FULLWIDTH_SEMICOLON, Statement, StatementBuilder,
    lexer::{Class, CommentStyle, Lexer}
};

/// Nesting of `()`, `{}` and `[]` outside quotes and comments.
#[derive(Debug, Default, Clone, Copy)]
struct Depth {
    paren:   usize,
    brace:   usize,
    bracket: usize
}

impl Depth {
    fn track(&mut self, ch: char) {
        match ch {
            '(' => self.paren += 1,
            ')' => self.paren = self.paren.saturating_sub(1),
            '{' => self.brace += 1,
            '}' => self.brace = self.brace.saturating_sub(1),
            '[' => self.bracket += 1,
            ']' => self.bracket = self.bracket.saturating_sub(1),
            _ => {}
        }
    }

    fn is_top_level(self) -> bool {
        self.paren == 0 && self.brace == 0 && self.bracket == 0
    }
}

/// Split a MongoDB shell script into operations.
///
/// Only top-level characters split: `;` and the full-width semicolon end an
/// operation as terminated, a newline ends it unterminated. Anything nested
/// inside call arguments, documents or arrays stays together, so multi-line
/// calls survive intact.
pub fn split_mongo_operations(script: &str) -> Vec<Statement> {
    let mut lexer = Lexer::new(CommentStyle::Script);
    let mut builder = StatementBuilder::default();
    let mut depth = Depth::default();
    let mut chars = script.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        let lexeme = lexer.advance(ch, next);
        if lexeme.width == 2 {
            chars.next();
        }
        match lexeme.class {
            Class::Comment => continue,
            Class::Quoted => {
                builder.push(pos, ch);
                continue;
            }
            Class::Code => {}
        }

        if ch == FULLWIDTH_SEMICOLON && depth.is_top_level() {
            builder.flush(true, true);
            continue;
        }
        depth.track(ch);
        if depth.is_top_level() {
            match ch {
                ';' => {
                    builder.flush(true, false);
                    continue;
                }
                '\n' | '\r' => {
                    builder.flush(false, false);
                    continue;
                }
                _ => {}
            }
        }
        builder.push(pos, ch);
    }

    builder.finish()
}
