//! Per-file compilation driver.
//!
//! ## Stages
//!
//! ```text
//! source ─► lex ─► split into lines and declaration units
//!     │
//!     ├─► declaration unit ─► FunctionCompiler::compile ─► emitted text
//!     │
//!     └─► other lines ─► brace tracking (scopes for class-like blocks)
//! ```
//!
//! A declaration unit is any decorator lines followed by a function header,
//! up to and including its `{` or `;`. Everything else is only scanned for
//! braces so that each declaration is compiled against the scope it sits in.
//!
//! Failures never stop the pass: each one becomes a [`Diagnostic`] and
//! splitting resumes after the failing unit.

use std::path::Path;

use helix_ast::{Node, RecognizedModifiers, TokenKind, lex};
use helix_codegen::{
    CompiledFunction, FunctionCompiler, FunctionErrorKind, ScopeId, ScopeKind,
    ScopeTree,
};
use helix_core::{CompilationPhase, Diagnostic, Span};

use crate::config::HelixConfig;
use crate::error::{DriverError, DriverResult};

/// Everything produced for one source file.
#[derive(Clone, Debug)]
pub struct CompilationResult {
    pub functions: Vec<CompiledFunction>,
    pub diagnostics: Vec<Diagnostic>,
    pub scopes: ScopeTree,
}

impl CompilationResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Emitted text of every compiled function, separated by blank lines.
    pub fn output(&self) -> String {
        self.functions
            .iter()
            .map(|function| function.output_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A source file read from disk along with its compilation result.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
    pub result: CompilationResult,
}

pub fn compile_file(path: &Path, config: &HelixConfig) -> DriverResult<SourceFile> {
    let source = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
    let name = path.display().to_string();
    let result = compile_source(&source, &name, config);
    Ok(SourceFile {
        path: name,
        source,
        result,
    })
}

#[tracing::instrument(skip(source, config))]
pub fn compile_source(source: &str, name: &str, config: &HelixConfig) -> CompilationResult {
    let tree = ScopeTree::new(name, config.keyword_table());
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(err) => {
            return CompilationResult {
                functions: Vec::new(),
                diagnostics: vec![Diagnostic::error(
                    CompilationPhase::Lexing,
                    err.span(),
                    err.to_string(),
                )],
                scopes: tree,
            };
        }
    };

    let compiler = FunctionCompiler::new(&tree).with_indent_unit(config.indent_unit());
    let splitter = Splitter {
        function_keyword: tree.keywords().function_keyword().to_string(),
        recognized: tree.recognized_modifiers(),
    };
    let mut pass = FilePass::new(source, tree, config.transpiler.warnings);

    let mut pos = 0;
    while pos < tokens.len() {
        if tokens[pos].kind == TokenKind::Newline {
            pos += 1;
            continue;
        }
        if splitter.starts_declaration(&tokens[pos..]) {
            let unit = splitter.declaration_end(&tokens, pos);
            if unit.has_keyword {
                pass.compile_declaration(&compiler, &tokens[pos..unit.end]);
            } else {
                pass.diagnostics.push(Diagnostic::error(
                    CompilationPhase::DeclarationSplitting,
                    tokens[pos].span,
                    "decorators must be followed by a function declaration",
                ));
            }
            pos = unit.end;
        } else {
            pos = pass.scan_line(&tokens, pos);
        }
    }

    let end = tokens.last().map_or(Span::point(0), |last| Span::point(last.span.end));
    pass.finish(end)
}

/// Recognizes where declaration units start and end.
struct Splitter {
    function_keyword: String,
    recognized: RecognizedModifiers,
}

struct UnitEnd {
    /// Exclusive token index.
    end: usize,
    has_keyword: bool,
}

impl Splitter {
    fn is_function_keyword(&self, node: &Node) -> bool {
        node.kind == TokenKind::Ident && node.text == self.function_keyword
    }

    /// A line starting with `@`, or with modifiers then the function keyword.
    fn starts_declaration(&self, line: &[Node]) -> bool {
        if line.first().is_some_and(|node| node.kind == TokenKind::At) {
            return true;
        }
        line.iter()
            .find(|node| !(node.kind == TokenKind::Ident && self.recognized.contains(&node.text)))
            .is_some_and(|node| self.is_function_keyword(node))
    }

    fn declaration_end(&self, tokens: &[Node], start: usize) -> UnitEnd {
        let mut depth = 0usize;
        let mut has_keyword = false;
        for (i, node) in tokens.iter().enumerate().skip(start) {
            match node.kind {
                TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
                TokenKind::CloseParen | TokenKind::CloseBracket => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::OpenBrace | TokenKind::Semicolon if depth == 0 => {
                    return UnitEnd {
                        end: i + 1,
                        has_keyword,
                    };
                }
                TokenKind::Newline if depth == 0 => {
                    let next = tokens[i..]
                        .iter()
                        .position(|n| n.kind != TokenKind::Newline)
                        .map(|offset| &tokens[i + offset..]);
                    let continues = match next {
                        None => false,
                        // header split before its body marker
                        Some(rest) if has_keyword => matches!(
                            rest[0].kind,
                            TokenKind::OpenBrace | TokenKind::Semicolon
                        ),
                        Some(rest) => self.starts_declaration(rest),
                    };
                    if !continues {
                        return UnitEnd { end: i, has_keyword };
                    }
                }
                _ if depth == 0 && self.is_function_keyword(node) => has_keyword = true,
                _ => {}
            }
        }
        UnitEnd {
            end: tokens.len(),
            has_keyword,
        }
    }
}

/// Mutable state of one file's pass.
struct FilePass<'a> {
    source: &'a str,
    tree: ScopeTree,
    /// One entry per open `{`; blocks that open no scope repeat the enclosing one.
    open: Vec<(ScopeId, Span)>,
    /// A type declaration whose `{` has not been seen yet.
    pending: Option<(ScopeKind, String)>,
    functions: Vec<CompiledFunction>,
    diagnostics: Vec<Diagnostic>,
    warnings: bool,
}

impl<'a> FilePass<'a> {
    fn new(source: &'a str, tree: ScopeTree, warnings: bool) -> Self {
        Self {
            source,
            tree,
            open: Vec::new(),
            pending: None,
            functions: Vec::new(),
            diagnostics: Vec::new(),
            warnings,
        }
    }

    fn current_scope(&self) -> ScopeId {
        self.open.last().map_or(self.tree.root(), |(id, _)| *id)
    }

    fn compile_declaration(&mut self, compiler: &FunctionCompiler, unit: &[Node]) {
        self.pending = None;
        let parent = self.current_scope();
        let body = self.tree.push_child(parent, ScopeKind::Function, "");
        let chain = self.tree.chain_for(body);
        let opens_block = unit
            .last()
            .is_some_and(|node| node.kind == TokenKind::OpenBrace);

        match compiler.compile(unit, &mut self.tree, chain) {
            Ok(compiled) => {
                self.tree[body].name = compiled.name.clone();
                if let Some(earlier) = compiled.shadows.filter(|_| self.warnings) {
                    self.diagnostics.push(Diagnostic::warning(
                        CompilationPhase::Registration,
                        compiled.name_span,
                        format!(
                            "function `{}` shadows the definition on line {}",
                            compiled.name,
                            earlier.line_in(self.source)
                        ),
                    ));
                }
                self.functions.push(compiled);
            }
            Err(err) => {
                let (phase, message) = match err.kind() {
                    FunctionErrorKind::DuplicateFunctionDefinition { previous, .. } => (
                        CompilationPhase::Registration,
                        format!(
                            "{err}; first defined on line {}",
                            previous.line_in(self.source)
                        ),
                    ),
                    _ => (CompilationPhase::FunctionCompilation, err.to_string()),
                };
                tracing::debug!(error = %err, "declaration failed");
                self.diagnostics
                    .push(Diagnostic::error(phase, err.span(), message));
            }
        }

        if opens_block {
            let brace = unit.last().map_or(Span::point(0), |node| node.span);
            self.open.push((body, brace));
        }
    }

    /// Track braces on an ordinary line; returns the index of its newline.
    ///
    /// A type declaration may put its `{` on the following line.
    fn scan_line(&mut self, tokens: &[Node], start: usize) -> usize {
        let line_end = tokens[start..]
            .iter()
            .position(|node| node.kind == TokenKind::Newline)
            .map_or(tokens.len(), |offset| start + offset);
        let line = &tokens[start..line_end];

        match type_declaration(line) {
            Some(declaration) => self.pending = Some(declaration),
            None if line.first().is_some_and(|node| node.kind == TokenKind::OpenBrace) => {}
            None => self.pending = None,
        }
        for node in line {
            match node.kind {
                TokenKind::OpenBrace => {
                    let scope = match self.pending.take() {
                        Some((kind, name)) => {
                            let parent = self.current_scope();
                            self.tree.push_child(parent, kind, name)
                        }
                        None => self.current_scope(),
                    };
                    self.open.push((scope, node.span));
                }
                TokenKind::CloseBrace => {
                    if self.open.pop().is_none() {
                        self.diagnostics.push(Diagnostic::error(
                            CompilationPhase::DeclarationSplitting,
                            node.span,
                            "unmatched `}`",
                        ));
                    }
                }
                _ => {}
            }
        }
        line_end
    }

    fn finish(mut self, end: Span) -> CompilationResult {
        for (_, brace) in self.open.drain(..).rev() {
            self.diagnostics.push(Diagnostic::error(
                CompilationPhase::DeclarationSplitting,
                brace.merge(end),
                "unclosed `{`",
            ));
        }
        CompilationResult {
            functions: self.functions,
            diagnostics: self.diagnostics,
            scopes: self.tree,
        }
    }
}

/// `class Point {`, `abstract class Shape {`, `interface Drawable {` ...
fn type_declaration(line: &[Node]) -> Option<(ScopeKind, String)> {
    let first = line.first()?;
    if first.kind != TokenKind::Ident {
        return None;
    }
    let kind = ScopeKind::from_keyword(&first.text)?;
    let name = line
        .iter()
        .skip(1)
        .find(|node| node.kind == TokenKind::Ident && ScopeKind::from_keyword(&node.text).is_none())
        .map(|node| node.text.clone())
        .unwrap_or_default();
    Some((kind, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn compile(source: &str) -> CompilationResult {
        compile_source(source, "test.hlx", &HelixConfig::default())
    }

    fn messages(result: &CompilationResult) -> Vec<String> {
        result
            .diagnostics
            .iter()
            .map(|diag| diag.message.clone())
            .collect()
    }

    #[test]
    fn test_top_level_functions() {
        let result = compile(
            "fn add(a: int, b: int) -> int {\n    return a + b\n}\n\nasync fn fetch(url: str) {\n}\n",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.output(),
            "def add(a: int, b: int) -> int:\n\nasync def fetch(url: str):"
        );
    }

    #[test]
    fn test_methods_are_indented_inside_class() {
        let result = compile(
            "class Point {\n    fn norm(self) -> float {\n        return 0\n    }\n    static fn origin() -> Point {\n    }\n}\n",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.output(),
            "    def norm(self) -> float:\n\n    static def origin() -> Point:"
        );

        let root = result.scopes.root();
        assert!(result.scopes[root].functions.is_empty());
    }

    #[test]
    fn test_class_brace_on_next_line() {
        let result = compile("class Point\n{\n    static fn origin() {\n    }\n}\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.output(), "    static def origin():");

        let root = result.scopes.root();
        assert!(result.scopes[root].functions.is_empty());
    }

    #[test]
    fn test_type_declaration_without_brace_opens_nothing() {
        let result = compile("class Marker\nx = 1\n{\n    static fn f() {\n    }\n}\n");
        assert_eq!(
            messages(&result),
            vec!["The `static` modifier cannot be used outside a class"]
        );
    }

    #[test]
    fn test_interface_methods_are_abstract() {
        let result = compile("interface Shape {\n    fn area(self) -> float;\n}\n");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(
            result.output(),
            "    @abstractmethod\n    def area(self) -> float:\n        pass"
        );
    }

    #[test]
    fn test_decorators_and_multiline_params() {
        let result = compile(
            "@cache(ttl = 60)\n@trace\nfn load(\n    path: str,\n    retries: int = 3\n) {\n}\n",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_snapshot!(result.output(), @r"
        @cache(ttl=60)
        @trace
        def load(path: str, retries: int):
        ");
    }

    #[test]
    fn test_collects_errors_and_continues() {
        let result = compile(
            "fn first(x) {\n}\nfn ok(a: int) {\n}\nstatic fn helper() {\n}\nfn ok(b: int) {\n}\n",
        );
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "ok");
        assert_eq!(
            messages(&result),
            vec![
                "Expected a colon and a type after parameter `x`",
                "The `static` modifier cannot be used outside a class",
                "Function `ok` is already defined in this scope; first defined on line 3",
            ]
        );
        assert_eq!(result.diagnostics[2].phase, CompilationPhase::Registration);
        assert!(result.has_errors());
    }

    #[test]
    fn test_nested_function_shadow_warning() {
        let source = "fn helper() {\n}\nfn outer() {\n    fn helper() {\n    }\n}\n";
        let result = compile(source);
        assert!(!result.has_errors());
        assert_eq!(result.diagnostics.len(), 1);
        assert_snapshot!(
            result.diagnostics[0].message,
            @"function `helper` shadows the definition on line 1"
        );
        assert_eq!(result.functions[2].output_text, "    def helper():");

        let mut quiet = HelixConfig::default();
        quiet.transpiler.warnings = false;
        let result = compile_source(source, "test.hlx", &quiet);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unbalanced_braces() {
        let result = compile("}\nfn open() {\n");
        assert_eq!(messages(&result), vec!["unmatched `}`", "unclosed `{`"]);
    }

    #[test]
    fn test_dangling_decorator() {
        let result = compile("@dataclass\nclass Point {\n}\n");
        assert_eq!(
            messages(&result),
            vec!["decorators must be followed by a function declaration"]
        );
        assert!(result.scopes.len() > 1);
    }

    #[test]
    fn test_lex_error() {
        let result = compile("fn broken(s: str = \"oops) {\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].phase, CompilationPhase::Lexing);
        assert!(result.functions.is_empty());
    }

    #[test]
    fn test_remapped_function_keyword() {
        let config = HelixConfig::from_toml("[keywords]\nfunction = \"func\"\n").unwrap();
        let result = compile_source(
            "func greet(name: str) {\n}\nfn ignored() {\n}\n",
            "test.hlx",
            &config,
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.output(), "def greet(name: str):");
    }

    #[test]
    fn test_type_declaration() {
        let line = lex("abstract class Shape {").unwrap();
        assert_eq!(
            type_declaration(&line),
            Some((ScopeKind::Abstract, "Shape".to_string()))
        );
        assert_eq!(type_declaration(&lex("return x").unwrap()), None);
    }
}
