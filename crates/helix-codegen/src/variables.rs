//! Parameter list extraction.
//!
//! Generic arguments share their bracket glyphs with comparison operators, so
//! a parameter boundary is a `,` (or the closing `)`) seen at generic depth
//! zero. `Map<K,V>` therefore stays one type.

use helix_ast::{Node, TokenCursor, TokenKind};
use helix_core::Span;
use indexmap::IndexMap;

use crate::errors::{FunctionError, FunctionErrorKind, FunctionResult};
use crate::text::append_token;

/// Receivers that may appear without a type annotation.
const UNTYPED_RECEIVERS: [&str; 3] = ["self", "cls", "super"];

/// Type and default of one parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableInfo {
    /// Literal type text, generic arguments included.
    pub type_expr: String,
    pub is_generic: bool,
    /// Default value text, recorded but never interpreted.
    pub default_value: Option<String>,
    /// False for receivers like `self` that were written without a type.
    pub annotated: bool,
}

impl VariableInfo {
    pub fn new(type_expr: impl Into<String>) -> Self {
        let type_expr = type_expr.into();
        Self {
            is_generic: type_expr.contains('<'),
            type_expr,
            default_value: None,
            annotated: true,
        }
    }
}

/// Parameter name → info, in source order.
pub type VariableTable = IndexMap<String, VariableInfo>;

/// Nesting level of `<...>` brackets.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct GenericDepth(usize);

impl GenericDepth {
    pub(crate) fn open(&mut self) {
        self.0 += 1;
    }

    pub(crate) fn close(&mut self, span: Span) -> FunctionResult<()> {
        self.0 = self
            .0
            .checked_sub(1)
            .ok_or_else(|| FunctionError::unbalanced_generics(span))?;
        Ok(())
    }

    pub(crate) fn is_top_level(self) -> bool {
        self.0 == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Section {
    Name,
    Type,
    Default,
}

/// The parameter currently being accumulated.
#[derive(Debug)]
struct Pending {
    section: Section,
    name: String,
    type_expr: String,
    default_value: Option<String>,
    saw_colon: bool,
    is_generic: bool,
    span: Option<Span>,
}

impl Pending {
    fn new() -> Self {
        Self {
            section: Section::Name,
            name: String::new(),
            type_expr: String::new(),
            default_value: None,
            saw_colon: false,
            is_generic: false,
            span: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_empty() && !self.saw_colon && self.default_value.is_none()
    }

    fn push(&mut self, node: &Node) {
        self.span = Some(match self.span {
            Some(span) => span.merge(node.span),
            None => node.span,
        });
        match self.section {
            Section::Name => append_token(&mut self.name, node.kind, &node.text, false),
            Section::Type => append_token(&mut self.type_expr, node.kind, &node.text, false),
            Section::Default => {
                let default = self.default_value.get_or_insert_with(String::new);
                append_token(default, node.kind, &node.text, true);
            }
        }
    }

    fn commit(self, table: &mut VariableTable, fallback: Span) -> FunctionResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        let span = self.span.unwrap_or(fallback);
        if self.name.is_empty() {
            return Err(FunctionError::malformed_header(
                "expected a parameter name",
                span,
            ));
        }

        let info = if !self.saw_colon {
            if !UNTYPED_RECEIVERS.contains(&self.name.as_str()) {
                return Err(FunctionError::new(
                    FunctionErrorKind::MissingParameterType(self.name),
                    span,
                ));
            }
            VariableInfo {
                type_expr: "Any".to_string(),
                is_generic: false,
                default_value: self.default_value,
                annotated: false,
            }
        } else {
            if self.type_expr.is_empty() {
                return Err(FunctionError::new(
                    FunctionErrorKind::MissingParameterType(self.name),
                    span,
                ));
            }
            if self.type_expr == "void" {
                return Err(FunctionError::new(
                    FunctionErrorKind::VoidParameter(self.name),
                    span,
                ));
            }
            VariableInfo {
                type_expr: self.type_expr,
                is_generic: self.is_generic,
                default_value: self.default_value,
                annotated: true,
            }
        };

        if table.contains_key(&self.name) {
            return Err(FunctionError::new(
                FunctionErrorKind::DuplicateParameter(self.name),
                span,
            ));
        }
        table.insert(self.name, info);
        Ok(())
    }
}

/// Extract a parameter list.
///
/// `cursor` must sit just after the opening `(`; on success it sits just after
/// the matching `)`.
pub fn extract(cursor: &mut TokenCursor<'_>) -> FunctionResult<VariableTable> {
    let mut table = VariableTable::new();
    let mut pending = Pending::new();
    let mut generics = GenericDepth::default();
    // Bracket nesting inside a default value, e.g. `= [1, 2]`.
    let mut groups = 0usize;

    loop {
        let node = cursor.advance()?;
        let top_level = generics.is_top_level() && groups == 0;

        match node.kind {
            TokenKind::Newline => {}
            TokenKind::Comma if top_level => {
                std::mem::replace(&mut pending, Pending::new()).commit(&mut table, node.span)?;
            }
            TokenKind::CloseParen if groups == 0 => {
                if !generics.is_top_level() {
                    return Err(FunctionError::unbalanced_generics(node.span));
                }
                pending.commit(&mut table, node.span)?;
                return Ok(table);
            }
            kind if pending.section == Section::Default => {
                if kind.is_open_group() {
                    groups += 1;
                } else if kind.is_close_group() {
                    groups = groups.saturating_sub(1);
                }
                pending.push(node);
            }
            TokenKind::Lt => {
                generics.open();
                pending.is_generic = true;
                pending.push(node);
            }
            TokenKind::Gt => {
                generics.close(node.span)?;
                pending.push(node);
            }
            TokenKind::Eq if generics.is_top_level() => {
                pending.section = Section::Default;
                pending.default_value = Some(String::new());
            }
            TokenKind::Colon if pending.section == Section::Name => {
                pending.section = Section::Type;
                pending.saw_colon = true;
            }
            _ => pending.push(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_ast::lex;

    /// Extract from source that starts right after the opening paren.
    fn extract_str(params: &str) -> FunctionResult<VariableTable> {
        let tokens = lex(params).unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        extract(&mut cursor)
    }

    fn types(table: &VariableTable) -> Vec<(&str, &str)> {
        table
            .iter()
            .map(|(name, info)| (name.as_str(), info.type_expr.as_str()))
            .collect()
    }

    #[test]
    fn test_default_value_is_not_part_of_type() {
        let table = extract_str("a: int, b: List<int> = []) )").unwrap();
        assert_eq!(types(&table), [("a", "int"), ("b", "List<int>")]);
        assert_eq!(table["b"].default_value.as_deref(), Some("[]"));
        assert!(table["b"].is_generic);
        assert!(!table["a"].is_generic);
    }

    #[test]
    fn test_nested_generics_keep_commas() {
        let table = extract_str("m: Map<K, List<Map<K,V>>>, n: int)").unwrap();
        assert_eq!(
            types(&table),
            [("m", "Map<K,List<Map<K,V>>>"), ("n", "int")]
        );
    }

    #[test]
    fn test_entry_count_matches_top_level_commas() {
        let params = "a: A, b: B<C, D>, c: E<F<G, H>, I>, d: J)";
        let table = extract_str(params).unwrap();
        let top_level_commas = 3;
        assert_eq!(table.len(), top_level_commas + 1);
        let names: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_list() {
        assert!(extract_str(")").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_comma_is_ignored() {
        let table = extract_str("a: int,\n)").unwrap();
        assert_eq!(types(&table), [("a", "int")]);
    }

    #[test]
    fn test_extra_closing_angle_fails() {
        let err = extract_str("a: List<int>>) {").unwrap_err();
        assert_eq!(err.kind(), &FunctionErrorKind::UnbalancedGenerics);
        assert_eq!(err.span(), Span::new(12, 13));
    }

    #[test]
    fn test_unclosed_generic_fails_at_list_end() {
        let err = extract_str("a: List<int) {").unwrap_err();
        assert_eq!(err.kind(), &FunctionErrorKind::UnbalancedGenerics);
    }

    #[test]
    fn test_balanced_generics_never_fail() {
        for params in [
            "a: A<B>)",
            "a: A<B<C>>)",
            "a: A<B, C<D>>, e: E<F>)",
            "a: A<B<C<D<E>>>>)",
        ] {
            assert!(extract_str(params).is_ok(), "{params}");
        }
    }

    #[test]
    fn test_default_with_commas_in_brackets() {
        let table = extract_str("xs: List<int> = [1, 2, 3], f: Fn = g(a, b))").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["xs"].default_value.as_deref(), Some("[1, 2, 3]"));
        assert_eq!(table["f"].default_value.as_deref(), Some("g(a, b)"));
    }

    #[test]
    fn test_comparison_in_default_is_not_generic() {
        let table = extract_str("flag: bool = a < b, n: int)").unwrap();
        assert_eq!(types(&table), [("flag", "bool"), ("n", "int")]);
        assert_eq!(table["flag"].default_value.as_deref(), Some("a<b"));
    }

    #[test]
    fn test_untyped_receiver() {
        let table = extract_str("self, x: int)").unwrap();
        assert_eq!(types(&table), [("self", "Any"), ("x", "int")]);
        assert!(!table["self"].annotated);
    }

    #[test]
    fn test_missing_type_fails() {
        let err = extract_str("x, y: int)").unwrap_err();
        assert_eq!(
            err.kind(),
            &FunctionErrorKind::MissingParameterType("x".into())
        );
        assert_eq!(err.span(), Span::new(0, 1));
    }

    #[test]
    fn test_void_parameter_fails() {
        let err = extract_str("x: void)").unwrap_err();
        assert_eq!(err.kind(), &FunctionErrorKind::VoidParameter("x".into()));
    }

    #[test]
    fn test_duplicate_parameter_fails() {
        let err = extract_str("x: int, x: str)").unwrap_err();
        assert_eq!(err.kind(), &FunctionErrorKind::DuplicateParameter("x".into()));
    }

    #[test]
    fn test_unterminated_list() {
        let err = extract_str("x: int, y: str").unwrap_err();
        assert_eq!(err.kind(), &FunctionErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_cursor_stops_after_close_paren() {
        let tokens = lex("a: int) -> int {").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        extract(&mut cursor).unwrap();
        assert_eq!(cursor.peek_kind(), Some(TokenKind::Arrow));
    }
}
