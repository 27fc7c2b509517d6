//! Lexical scopes and the function registry.
//!
//! Scopes live in a [`ScopeTree`] arena and are addressed by [`ScopeId`], so a
//! [`ScopeChain`] can alias the same scope in several roles (a top-level
//! function has `parent == root`) without any shared ownership.
//!
//! The root scope carries the project's [`KeywordTable`]; the set of
//! recognized modifiers is read from it once per compilation pass.

use helix_ast::{KeywordTable, RecognizedModifiers};
use helix_core::Span;
use indexmap::IndexMap;

use crate::variables::VariableTable;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Root,
    Function,
    Class,
    Interface,
    Struct,
    Union,
    Enum,
    Abstract,
}

impl ScopeKind {
    /// Scope kinds whose bodies hold methods.
    pub fn is_class_like(self) -> bool {
        !matches!(self, ScopeKind::Root | ScopeKind::Function)
    }

    /// Scope kinds whose methods are abstract.
    pub fn is_abstract(self) -> bool {
        matches!(self, ScopeKind::Interface | ScopeKind::Abstract)
    }

    /// The scope kind a type-declaration keyword opens.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(ScopeKind::Class),
            "interface" => Some(ScopeKind::Interface),
            "struct" => Some(ScopeKind::Struct),
            "union" => Some(ScopeKind::Union),
            "enum" => Some(ScopeKind::Enum),
            "abstract" => Some(ScopeKind::Abstract),
            _ => None,
        }
    }
}

/// Signature metadata registered for a compiled function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionMeta {
    pub variables: VariableTable,
    pub return_type: Option<String>,
    pub is_static: bool,
    pub is_async: bool,
    pub is_unsafe: bool,
    pub is_private: bool,
    pub is_protected: bool,
    pub is_final: bool,
    /// Span of the function name in its declaration.
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
    pub indent_level: usize,
    pub parent: Option<ScopeId>,
    pub functions: IndexMap<String, FunctionMeta>,
    /// Variable name → type text.
    pub variables: IndexMap<String, String>,
}

impl Scope {
    fn new(kind: ScopeKind, name: String, indent_level: usize, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            name,
            indent_level,
            parent,
            functions: IndexMap::new(),
            variables: IndexMap::new(),
        }
    }
}

/// Arena of all scopes of one compilation unit.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    keywords: KeywordTable,
}

impl ScopeTree {
    pub fn new(name: impl Into<String>, keywords: KeywordTable) -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Root, name.into(), 0, None)],
            keywords,
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn recognized_modifiers(&self) -> RecognizedModifiers {
        self.keywords.recognized_modifiers()
    }

    /// Open a scope nested one indentation level inside `parent`.
    pub fn push_child(&mut self, parent: ScopeId, kind: ScopeKind, name: impl Into<String>) -> ScopeId {
        let indent_level = self[parent].indent_level + 1;
        let id = ScopeId(self.scopes.len());
        self.scopes
            .push(Scope::new(kind, name.into(), indent_level, Some(parent)));
        id
    }

    /// The chain for a declaration whose body scope is `current`.
    pub fn chain_for(&self, current: ScopeId) -> ScopeChain {
        ScopeChain {
            current,
            parent: self[current].parent.unwrap_or(current),
            root: self.root(),
        }
    }

    /// Find `name` in `from` or the nearest enclosing scope that defines it.
    pub fn resolve_function(&self, from: ScopeId, name: &str) -> Option<(ScopeId, &FunctionMeta)> {
        let mut scope = Some(from);
        while let Some(id) = scope {
            if let Some(meta) = self[id].functions.get(name) {
                return Some((id, meta));
            }
            scope = self[id].parent;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl std::ops::Index<ScopeId> for ScopeTree {
    type Output = Scope;

    fn index(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }
}

impl std::ops::IndexMut<ScopeId> for ScopeTree {
    fn index_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }
}

/// The three scopes a declaration is compiled against.
///
/// `current` is the function's own body scope, `parent` the scope the
/// function is registered in, `root` the compilation unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScopeChain {
    pub current: ScopeId,
    pub parent: ScopeId,
    pub root: ScopeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(span: Span) -> FunctionMeta {
        FunctionMeta {
            variables: VariableTable::new(),
            return_type: None,
            is_static: false,
            is_async: false,
            is_unsafe: false,
            is_private: false,
            is_protected: false,
            is_final: false,
            span,
        }
    }

    #[test]
    fn test_push_child_nests_indent() {
        let mut tree = ScopeTree::new("main.hlx", KeywordTable::default());
        let class = tree.push_child(tree.root(), ScopeKind::Class, "Point");
        let method = tree.push_child(class, ScopeKind::Function, "norm");
        assert_eq!(tree[class].indent_level, 1);
        assert_eq!(tree[method].indent_level, 2);
        assert_eq!(tree[method].parent, Some(class));
    }

    #[test]
    fn test_chain_for_top_level_function() {
        let mut tree = ScopeTree::new("main.hlx", KeywordTable::default());
        let body = tree.push_child(tree.root(), ScopeKind::Function, "main");
        let chain = tree.chain_for(body);
        assert_eq!(chain.parent, tree.root());
        assert_eq!(chain.root, tree.root());
        assert_eq!(chain.current, body);
    }

    #[test]
    fn test_resolve_walks_outwards() {
        let mut tree = ScopeTree::new("main.hlx", KeywordTable::default());
        let root = tree.root();
        tree[root]
            .functions
            .insert("helper".into(), meta(Span::new(3, 9)));
        let outer = tree.push_child(root, ScopeKind::Function, "outer");
        let inner = tree.push_child(outer, ScopeKind::Function, "inner");

        let (found, meta) = tree.resolve_function(inner, "helper").unwrap();
        assert_eq!(found, root);
        assert_eq!(meta.span, Span::new(3, 9));
        assert!(tree.resolve_function(inner, "missing").is_none());
    }

    #[test]
    fn test_scope_kinds() {
        assert!(ScopeKind::Class.is_class_like());
        assert!(!ScopeKind::Function.is_class_like());
        assert!(ScopeKind::Interface.is_abstract());
        assert_eq!(ScopeKind::from_keyword("struct"), Some(ScopeKind::Struct));
        assert_eq!(ScopeKind::from_keyword("fn"), None);
    }
}
