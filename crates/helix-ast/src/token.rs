use derive_more::Display;
use helix_core::Span;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    #[display("identifier")]
    Ident,
    #[display("number")]
    Number,
    #[display("string")]
    Str,
    #[display("','")]
    Comma,
    #[display("'('")]
    OpenParen,
    #[display("')'")]
    CloseParen,
    #[display("'<'")]
    Lt,
    #[display("'>'")]
    Gt,
    #[display("'='")]
    Eq,
    #[display("':'")]
    Colon,
    #[display("'@'")]
    At,
    #[display("'->'")]
    Arrow,
    #[display("'{{'")]
    OpenBrace,
    #[display("'}}'")]
    CloseBrace,
    #[display("'['")]
    OpenBracket,
    #[display("']'")]
    CloseBracket,
    #[display("';'")]
    Semicolon,
    #[display("operator")]
    Operator,
    #[display("newline")]
    Newline,
}

impl TokenKind {
    /// Kinds that open a nested group for bracket balancing.
    pub fn is_open_group(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
        )
    }

    pub fn is_close_group(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
        )
    }
}

/// A single token as produced by the lexer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Node {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
