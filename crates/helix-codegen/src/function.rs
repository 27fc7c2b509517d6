//! Compilation of one function declaration.
//!
//! ## Stages
//!
//! ```text
//! decorators ─► modifiers ─► `fn` keyword ─► name ─► `(` params `)`
//!     ─► [-> return type] ─► body marker ─► validate ─► register ─► emit
//! ```
//!
//! Every check runs before the parent scope is touched, so a failed
//! declaration leaves the scope tree exactly as it was.

use helix_ast::{Modifier, Node, RecognizedModifiers, TokenCursor, TokenKind};
use helix_core::Span;

use crate::decorators::{self, Decorator};
use crate::emit::{EmitOp, FunctionEmitter, Param};
use crate::errors::{FunctionError, FunctionErrorKind, FunctionResult};
use crate::modifiers::{self, ModifierFlags};
use crate::scope::{FunctionMeta, ScopeChain, ScopeTree};
use crate::text::append_token;
use crate::variables::{self, GenericDepth, VariableTable};

pub const DEFAULT_INDENT: &str = "    ";

/// Operator glyphs that may name a method, and their target spelling.
const OPERATOR_METHODS: [(&str, &str); 18] = [
    ("==", "__eq__"),
    ("!=", "__ne__"),
    ("<", "__lt__"),
    ("<=", "__le__"),
    (">", "__gt__"),
    (">=", "__ge__"),
    ("+", "__add__"),
    ("-", "__sub__"),
    ("*", "__mul__"),
    ("/", "__truediv__"),
    ("//", "__floordiv__"),
    ("%", "__mod__"),
    ("**", "__pow__"),
    ("&", "__and__"),
    ("|", "__or__"),
    ("^", "__xor__"),
    ("~", "__invert__"),
    ("@", "__matmul__"),
];

fn operator_method(glyph: &str) -> Option<&'static str> {
    OPERATOR_METHODS
        .iter()
        .find(|(op, _)| *op == glyph)
        .map(|(_, method)| *method)
}

/// How the header ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyMarker {
    /// `{`: a body follows.
    Block,
    /// `;`: a prototype without a body.
    None,
}

/// Result of compiling one declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledFunction {
    /// Registered name (operators already renamed).
    pub name: String,
    pub name_span: Span,
    pub output_text: String,
    pub variables: VariableTable,
    pub return_type: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub decorators: Vec<Decorator>,
    pub body: BodyMarker,
    /// Declaration of the same name in an enclosing scope, if any.
    pub shadows: Option<Span>,
}

/// Compiles function declarations against a scope tree.
///
/// The recognized modifier set is read from the tree's root scope once, when
/// the compiler is created.
#[derive(Clone, Debug)]
pub struct FunctionCompiler {
    function_keyword: String,
    recognized: RecognizedModifiers,
    static_keyword: String,
    private_keyword: String,
    async_keyword: String,
    unsafe_keyword: String,
    indent_unit: String,
}

impl FunctionCompiler {
    pub fn new(tree: &ScopeTree) -> Self {
        let keywords = tree.keywords();
        Self {
            function_keyword: keywords.function_keyword().to_string(),
            recognized: tree.recognized_modifiers(),
            static_keyword: keywords.modifier_keyword(Modifier::Static).to_string(),
            private_keyword: keywords.modifier_keyword(Modifier::Private).to_string(),
            async_keyword: keywords.modifier_keyword(Modifier::Async).to_string(),
            unsafe_keyword: keywords.modifier_keyword(Modifier::Unsafe).to_string(),
            indent_unit: DEFAULT_INDENT.to_string(),
        }
    }

    pub fn with_indent_unit(mut self, indent_unit: impl Into<String>) -> Self {
        self.indent_unit = indent_unit.into();
        self
    }

    /// Restrict the modifiers this compiler recognizes.
    pub fn with_recognized_modifiers(mut self, recognized: RecognizedModifiers) -> Self {
        self.recognized = recognized;
        self
    }

    /// Compile the declaration in `tokens` and register it in `chain.parent`.
    pub fn compile(
        &self,
        tokens: &[Node],
        tree: &mut ScopeTree,
        chain: ScopeChain,
    ) -> FunctionResult<CompiledFunction> {
        let mut cursor = TokenCursor::new(tokens);
        cursor.skip_newlines();

        let decorators = decorators::collect(&mut cursor);

        let modifiers_span = cursor.current_span();
        let modifiers = modifiers::parse(&mut cursor, &self.recognized);
        let flags = ModifierFlags::from_modifiers(&modifiers);

        let keyword = cursor.advance()?;
        if keyword.kind != TokenKind::Ident || keyword.text != self.function_keyword {
            return Err(FunctionError::expected_function_keyword(
                &self.function_keyword,
                &keyword.text,
                keyword.span,
            ));
        }
        let modifiers_span = modifiers_span.merge(keyword.span);

        let name_node = cursor.advance()?;
        let (name, is_operator) = match name_node.kind {
            TokenKind::Ident => (name_node.text.clone(), false),
            _ => match operator_method(&name_node.text) {
                Some(method) => (method.to_string(), true),
                None => {
                    return Err(FunctionError::malformed_header(
                        format!("expected a function name, found `{}`", name_node.text),
                        name_node.span,
                    ));
                }
            },
        };

        let open = cursor.advance()?;
        if open.kind != TokenKind::OpenParen {
            return Err(FunctionError::new(
                FunctionErrorKind::ExpectedOpenParen(open.text.clone()),
                open.span,
            ));
        }
        let variables = variables::extract(&mut cursor)?;

        let return_type = match cursor.eat(TokenKind::Arrow) {
            Some(arrow) => Some(return_type(&mut cursor, arrow.span)?),
            None => None,
        };
        let body = body_marker(&mut cursor)?;

        let parent = &tree[chain.parent];
        if is_operator && !parent.kind.is_class_like() {
            return Err(FunctionError::new(
                FunctionErrorKind::OperatorOutsideClass(name_node.text.clone()),
                name_node.span,
            ));
        }
        if flags.is_static && !parent.kind.is_class_like() {
            return Err(FunctionError::new(
                FunctionErrorKind::StaticOutsideClass(self.static_keyword.clone()),
                modifiers_span,
            ));
        }
        if flags.is_private && flags.is_static {
            return Err(FunctionError::new(
                FunctionErrorKind::ConflictingModifiers(
                    self.private_keyword.clone(),
                    self.static_keyword.clone(),
                ),
                modifiers_span,
            ));
        }
        if flags.is_async && flags.is_unsafe {
            return Err(FunctionError::new(
                FunctionErrorKind::ConflictingModifiers(
                    self.async_keyword.clone(),
                    self.unsafe_keyword.clone(),
                ),
                modifiers_span,
            ));
        }
        if body == BodyMarker::None && parent.indent_level == 0 {
            return Err(FunctionError::new(
                FunctionErrorKind::BodilessGlobalFunction(name),
                name_node.span,
            ));
        }
        if let Some(previous) = parent.functions.get(&name) {
            if !flags.is_unsafe {
                return Err(FunctionError::new(
                    FunctionErrorKind::DuplicateFunctionDefinition {
                        name,
                        previous: previous.span,
                    },
                    name_node.span,
                ));
            }
            tracing::warn!(
                %name,
                previous = ?previous.span,
                "unsafe redefinition replaces earlier declaration"
            );
        }

        let shadows = parent
            .parent
            .and_then(|outer| tree.resolve_function(outer, &name))
            .map(|(_, meta)| meta.span);
        let is_abstract = parent.kind.is_abstract();
        let indent_level = parent.indent_level;

        let meta = FunctionMeta {
            variables: variables.clone(),
            return_type: return_type.clone(),
            is_static: flags.is_static,
            is_async: flags.is_async,
            is_unsafe: flags.is_unsafe,
            is_private: flags.is_private,
            is_protected: flags.is_protected,
            is_final: flags.is_final,
            span: name_node.span,
        };
        register(tree, chain, &name, meta);

        let mut emitter = FunctionEmitter::new(self.indent_unit.as_str(), indent_level);
        for decorator in &decorators {
            emitter.push(EmitOp::Decorator(decorator.text.clone()));
        }
        if flags.is_final {
            emitter.push(EmitOp::Decorator("final".to_string()));
        }
        if is_abstract {
            emitter.push(EmitOp::Decorator("abstractmethod".to_string()));
        }
        if flags.is_static {
            emitter.push(EmitOp::Keyword("static"));
        }
        if flags.is_async {
            emitter.push(EmitOp::Keyword("async"));
        }
        emitter
            .push(EmitOp::Name(name.clone()))
            .push(EmitOp::Params(Param::from_table(&variables)));
        if let Some(ty) = &return_type {
            emitter.push(EmitOp::ReturnType(ty.clone()));
        }
        emitter.push(EmitOp::BodyMarker);
        if body == BodyMarker::None {
            emitter.push(EmitOp::EmptyBody);
        }

        Ok(CompiledFunction {
            name,
            name_span: name_node.span,
            output_text: emitter.render(),
            variables,
            return_type,
            modifiers,
            decorators,
            body,
            shadows,
        })
    }
}

/// Record `meta` in the parent scope and its parameters in the body scope.
fn register(tree: &mut ScopeTree, chain: ScopeChain, name: &str, meta: FunctionMeta) {
    let current = &mut tree[chain.current];
    for (param, info) in &meta.variables {
        current
            .variables
            .insert(param.clone(), info.type_expr.clone());
    }
    tracing::debug!(
        name,
        scope = ?chain.parent,
        params = meta.variables.len(),
        "registered function"
    );
    tree[chain.parent].functions.insert(name.to_string(), meta);
}

/// Read the type after `->`, up to the body marker.
fn return_type(cursor: &mut TokenCursor<'_>, arrow: Span) -> FunctionResult<String> {
    let mut text = String::new();
    let mut generics = GenericDepth::default();
    let mut span = arrow;
    while let Some(node) = cursor.peek() {
        let stop = matches!(
            node.kind,
            TokenKind::OpenBrace | TokenKind::Semicolon | TokenKind::Newline
        );
        if stop && generics.is_top_level() {
            break;
        }
        match node.kind {
            TokenKind::Newline => {
                cursor.bump();
                continue;
            }
            TokenKind::Lt => generics.open(),
            TokenKind::Gt => generics.close(node.span)?,
            _ => {}
        }
        append_token(&mut text, node.kind, &node.text, false);
        span = span.merge(node.span);
        cursor.bump();
    }
    if !generics.is_top_level() {
        return Err(FunctionError::unbalanced_generics(span));
    }
    if text.is_empty() {
        return Err(FunctionError::malformed_header(
            "expected a return type after `->`",
            arrow,
        ));
    }
    Ok(text)
}

/// Consume the body marker and make sure nothing follows it.
fn body_marker(cursor: &mut TokenCursor<'_>) -> FunctionResult<BodyMarker> {
    cursor.skip_newlines();
    let Some(marker) = cursor.peek() else {
        return Err(FunctionError::malformed_header(
            "expected `{` or `;` after the parameter list",
            cursor.end_span(),
        ));
    };
    let body = match marker.kind {
        TokenKind::OpenBrace => BodyMarker::Block,
        TokenKind::Semicolon => BodyMarker::None,
        _ => {
            return Err(FunctionError::malformed_header(
                format!("unexpected `{}` after the parameter list", marker.text),
                marker.span,
            ));
        }
    };
    cursor.bump();
    cursor.skip_newlines();
    if let Some(extra) = cursor.peek() {
        return Err(FunctionError::malformed_header(
            format!("unexpected `{}` after the function header", extra.text),
            extra.span,
        ));
    }
    Ok(body)
}
