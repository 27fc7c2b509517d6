//! Token-level representation of Helix source.
//!
//! Declarations reach the compiler as flat slices of [`Node`]s. The "next"
//! node is simply the following slice element, which keeps lookahead and
//! backtracking to an index reset.
pub mod cursor;
pub mod keywords;
pub mod lexer;
pub mod token;

pub use cursor::{TokenCursor, UnexpectedEnd};
pub use keywords::{KeywordTable, Modifier, RecognizedModifiers};
pub use lexer::{LexError, lex};
pub use token::{Node, TokenKind};

pub use helix_core::{Span, Spanned};
