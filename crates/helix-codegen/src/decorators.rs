use helix_ast::{TokenCursor, TokenKind};
use helix_core::Span;

use crate::text::append_token;

/// One `@name(args)` prefix, as literal text without the `@`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decorator {
    pub text: String,
    pub span: Span,
}

/// Consume decorators in front of a declaration.
///
/// Each decorator is `@` followed by a (possibly dotted) name and an optional
/// argument list that is copied verbatim. Newlines after a decorator are
/// dropped. Something that only looks like a decorator (a bare `@`, an `@`
/// separated from its name, or an argument list that never closes) is left
/// in place for the caller to reject.
pub fn collect(cursor: &mut TokenCursor<'_>) -> Vec<Decorator> {
    let mut decorators = Vec::new();
    while cursor.at(TokenKind::At) {
        let start = cursor.position();
        match decorator(cursor) {
            Some(decorator) => {
                tracing::trace!(text = %decorator.text, "collected decorator");
                decorators.push(decorator);
                cursor.skip_newlines();
            }
            None => {
                cursor.reset(start);
                break;
            }
        }
    }
    decorators
}

fn decorator(cursor: &mut TokenCursor<'_>) -> Option<Decorator> {
    let at = cursor.eat(TokenKind::At)?;
    let name = cursor.eat(TokenKind::Ident)?;
    if name.span.start != at.span.end {
        return None;
    }
    let mut span = at.span.merge(name.span);
    let mut text = name.text.clone();

    // Dotted names: `@functools.cache`
    while cursor.peek().is_some_and(|node| node.text == ".")
        && cursor.nth(1).is_some_and(|node| node.is(TokenKind::Ident))
    {
        for _ in 0..2 {
            let node = cursor.advance().ok()?;
            text.push_str(&node.text);
            span = span.merge(node.span);
        }
    }

    if cursor.at(TokenKind::OpenParen) {
        let mut depth = 0usize;
        loop {
            let node = cursor.advance().ok()?;
            if node.is(TokenKind::Newline) {
                continue;
            }
            if node.kind.is_open_group() {
                depth += 1;
            } else if node.kind.is_close_group() {
                depth = depth.saturating_sub(1);
            }
            append_token(&mut text, node.kind, &node.text, true);
            span = span.merge(node.span);
            if depth == 0 {
                break;
            }
        }
    }

    Some(Decorator { text, span })
}
