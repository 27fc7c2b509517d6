use derive_more::Display;
use helix_core::Span;

use crate::token::{Node, TokenKind};

/// `advance` was called with no token left.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display("unexpected end of input")]
pub struct UnexpectedEnd {
    /// Zero-width span just past the last token.
    pub span: Span,
}

impl std::error::Error for UnexpectedEnd {}

/// Forward-only view over a token slice.
///
/// Positions are plain indices, so a caller can save [`position`] and
/// [`reset`] to it for lookahead.
///
/// [`position`]: TokenCursor::position
/// [`reset`]: TokenCursor::reset
#[derive(Clone, Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [Node],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Node]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a Node> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|node| node.kind)
    }

    /// The token `offset` places after the current one.
    pub fn nth(&self, offset: usize) -> Option<&'a Node> {
        self.tokens.get(self.pos + offset)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Return the current token and move past it.
    pub fn advance(&mut self) -> Result<&'a Node, UnexpectedEnd> {
        let node = self.peek().ok_or(UnexpectedEnd {
            span: self.end_span(),
        })?;
        self.pos += 1;
        Ok(node)
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<&'a Node> {
        let node = self.peek().filter(|node| node.kind == kind)?;
        self.pos += 1;
        Some(node)
    }

    /// Skip the current token, if any.
    pub fn bump(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline).is_some() {}
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    pub fn remaining(&self) -> &'a [Node] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    /// Span of the current token, or the end of input when exhausted.
    pub fn current_span(&self) -> Span {
        self.peek().map(|node| node.span).unwrap_or_else(|| self.end_span())
    }

    pub fn end_span(&self) -> Span {
        self.tokens
            .last()
            .map(|node| Span::point(node.span.end))
            .unwrap_or_default()
    }
}
