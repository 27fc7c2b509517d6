//! A line-oriented tokenizer for Helix source.
//!
//! It produces just enough structure for the declaration compiler: glyphs that
//! matter to headers get their own [`TokenKind`], everything else is an
//! identifier, literal or generic operator. `~~` starts a line comment.

use derive_more::Display;
use helix_core::Span;

use crate::token::{Node, TokenKind};

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum LexError {
    #[display("unterminated string literal")]
    UnterminatedString { span: Span },
    #[display("unexpected character {ch:?}")]
    UnexpectedCharacter { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span } | LexError::UnexpectedCharacter { span, .. } => {
                *span
            }
        }
    }
}

impl std::error::Error for LexError {}

const TWO_CHAR_OPERATORS: [&str; 6] = ["==", "!=", "<=", ">=", "**", "//"];

/// Tokenize a whole source file.
pub fn lex(source: &str) -> Result<Vec<Node>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Node>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let source = self.source;
        let text = &source[start..self.pos];
        self.tokens
            .push(Node::new(kind, text, Span::new(start, self.pos)));
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn run(mut self) -> Result<Vec<Node>, LexError> {
        while let Some(c) = self.peek_char() {
            let start = self.pos;
            match c {
                '\n' => {
                    self.pos += 1;
                    self.push(TokenKind::Newline, start);
                }
                c if c.is_whitespace() => self.pos += c.len_utf8(),
                '~' if self.rest().starts_with("~~") => self.eat_while(|c| c != '\n'),
                c if c.is_alphabetic() || c == '_' => {
                    self.eat_while(|c| c.is_alphanumeric() || c == '_');
                    self.push(TokenKind::Ident, start);
                }
                c if c.is_ascii_digit() => {
                    self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                    self.push(TokenKind::Number, start);
                }
                '"' | '\'' => self.string(c)?,
                _ => self.glyph(c)?,
            }
        }
        Ok(self.tokens)
    }

    fn string(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.pos;
        self.pos += 1;
        let mut escaped = false;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.pos += c.len_utf8();
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                self.push(TokenKind::Str, start);
                return Ok(());
            }
        }
        Err(LexError::UnterminatedString {
            span: Span::new(start, self.pos),
        })
    }

    fn glyph(&mut self, c: char) -> Result<(), LexError> {
        let start = self.pos;
        if self.rest().starts_with("->") {
            self.pos += 2;
            self.push(TokenKind::Arrow, start);
            return Ok(());
        }
        if TWO_CHAR_OPERATORS.iter().any(|op| self.rest().starts_with(*op)) {
            self.pos += 2;
            self.push(TokenKind::Operator, start);
            return Ok(());
        }

        let kind = match c {
            ',' => TokenKind::Comma,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '=' => TokenKind::Eq,
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ';' => TokenKind::Semicolon,
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '~' | '!' | '.' | '?' => {
                TokenKind::Operator
            }
            other => {
                return Err(LexError::UnexpectedCharacter {
                    ch: other,
                    span: Span::new(start, start + other.len_utf8()),
                });
            }
        };
        self.pos += c.len_utf8();
        self.push(kind, start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_function_header() {
        use TokenKind::*;
        assert_eq!(
            kinds("fn foo(a: int) -> int {"),
            vec![
                Ident, Ident, OpenParen, Ident, Colon, Ident, CloseParen, Arrow, Ident, OpenBrace
            ]
        );
    }

    #[test]
    fn test_nested_generics_are_split() {
        let tokens = lex("List<Map<K,V>>").unwrap();
        let texts: Vec<_> = tokens.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, ["List", "<", "Map", "<", "K", ",", "V", ">", ">"]);
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens = lex("@cache\nfn x").unwrap();
        assert_eq!(tokens[1].span, Span::new(1, 6));
        assert_eq!(tokens[2].kind, TokenKind::Newline);
        assert_eq!(tokens[3].span, Span::new(7, 9));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("fn ~~ trailing words\n"),
            vec![TokenKind::Ident, TokenKind::Newline]
        );
    }

    #[test]
    fn test_two_char_operators() {
        let tokens = lex("fn ==(other)").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[1].text, "==");
    }

    #[test]
    fn test_string_literal() {
        let tokens = lex(r#"@route("/a, b")"#).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::Str);
        assert_eq!(tokens[3].text, r#""/a, b""#);
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex("\"abc\n").unwrap_err();
        assert_eq!(err.span(), Span::new(0, 4));
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex("fn $").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { ch: '$', .. }));
    }
}
