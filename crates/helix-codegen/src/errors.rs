//! Error types for function declaration compilation

use derive_more::Display;
use helix_ast::UnexpectedEnd;
use helix_core::Span;

pub type FunctionResult<T> = Result<T, FunctionError>;

/// A failure to compile one declaration, with the offending source position.
#[derive(Clone, Debug, Display, PartialEq)]
#[display("{kind}")]
pub struct FunctionError {
    kind: Box<FunctionErrorKind>,
    span: Span,
}

impl FunctionError {
    pub fn new(kind: FunctionErrorKind, span: Span) -> Self {
        Self {
            kind: Box::new(kind),
            span,
        }
    }

    pub fn kind(&self) -> &FunctionErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn unbalanced_generics(span: Span) -> Self {
        Self::new(FunctionErrorKind::UnbalancedGenerics, span)
    }

    pub(crate) fn expected_function_keyword(keyword: &str, found: &str, span: Span) -> Self {
        Self::new(
            FunctionErrorKind::ExpectedFunctionKeyword {
                keyword: keyword.to_string(),
                found: found.to_string(),
            },
            span,
        )
    }

    pub(crate) fn malformed_header(msg: impl std::fmt::Display, span: Span) -> Self {
        Self::new(FunctionErrorKind::MalformedFunctionHeader(msg.to_string()), span)
    }
}

impl From<UnexpectedEnd> for FunctionError {
    fn from(error: UnexpectedEnd) -> Self {
        FunctionError::new(FunctionErrorKind::UnexpectedEndOfInput, error.span)
    }
}

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum FunctionErrorKind {
    #[display("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[display("Unbalanced generic brackets in parameter list")]
    UnbalancedGenerics,

    #[display("Expected the `{keyword}` keyword, found `{found}`")]
    ExpectedFunctionKeyword { keyword: String, found: String },

    #[display("Expected an open parenthesis after the function name, found `{_0}`")]
    ExpectedOpenParen(String),

    #[display("Malformed function header: {_0}")]
    MalformedFunctionHeader(String),

    #[display("Function `{name}` is already defined in this scope")]
    DuplicateFunctionDefinition { name: String, previous: Span },

    #[display("Expected a colon and a type after parameter `{_0}`")]
    MissingParameterType(String),

    #[display("The type void is not allowed for parameter `{_0}`")]
    VoidParameter(String),

    #[display("Parameter `{_0}` is declared more than once")]
    DuplicateParameter(String),

    #[display("The `{_0}` modifier cannot be used outside a class")]
    StaticOutsideClass(String),

    #[display("The `{_0}` and `{_1}` modifiers cannot be used together")]
    ConflictingModifiers(String, String),

    #[display("Cannot overload operator `{_0}` outside a class")]
    OperatorOutsideClass(String),

    #[display("Function `{_0}` has no body; bodiless declarations are only allowed inside a class")]
    BodilessGlobalFunction(String),
}

impl std::error::Error for FunctionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_kind() {
        let err = FunctionError::new(
            FunctionErrorKind::DuplicateFunctionDefinition {
                name: "foo".into(),
                previous: Span::new(0, 3),
            },
            Span::new(3, 6),
        );
        assert_eq!(err.to_string(), "Function `foo` is already defined in this scope");
        assert_eq!(err.span(), Span::new(3, 6));
    }

    #[test]
    fn test_unexpected_end_conversion() {
        let err: FunctionError = UnexpectedEnd {
            span: Span::point(9),
        }
        .into();
        assert_eq!(err.kind(), &FunctionErrorKind::UnexpectedEndOfInput);
        assert_eq!(err.span(), Span::point(9));
    }
}
