//! Target text emission for a function declaration.
//!
//! The compiler records what to print as a list of [`EmitOp`]s; rendering
//! turns that list into lines. Decorator lines always precede the header, and
//! header fragments are printed in the order they were recorded.

use crate::variables::VariableTable;

/// Type spelling that the target has no name for.
const UNKNOWN_TYPE: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitOp {
    /// A decorator line, text without the leading `@`.
    Decorator(String),
    /// A target keyword in front of `def`.
    Keyword(&'static str),
    Name(String),
    Params(Vec<Param>),
    ReturnType(String),
    /// `:` closing the header.
    BodyMarker,
    /// Placeholder body for a declaration without one.
    EmptyBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// `None` renders the bare name.
    pub type_expr: Option<String>,
}

impl Param {
    pub fn from_table(variables: &VariableTable) -> Vec<Param> {
        variables
            .iter()
            .map(|(name, info)| Param {
                name: name.clone(),
                type_expr: info.annotated.then(|| info.type_expr.clone()),
            })
            .collect()
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Rename whole `unknown` identifiers; `unknownFoo` stays as written.
fn target_type(type_expr: &str) -> String {
    let mut out = String::with_capacity(type_expr.len());
    let mut rest = type_expr;
    while let Some(c) = rest.chars().next() {
        let len = if is_ident_char(c) {
            rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len())
        } else {
            c.len_utf8()
        };
        let (piece, tail) = rest.split_at(len);
        out.push_str(if piece == UNKNOWN_TYPE { "Any" } else { piece });
        rest = tail;
    }
    out
}

#[derive(Clone, Debug)]
pub struct FunctionEmitter {
    indent_unit: String,
    indent_level: usize,
    ops: Vec<EmitOp>,
}

impl FunctionEmitter {
    pub fn new(indent_unit: impl Into<String>, indent_level: usize) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            indent_level,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: EmitOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn ops(&self) -> &[EmitOp] {
        &self.ops
    }

    fn indent(&self, extra: usize) -> String {
        self.indent_unit.repeat(self.indent_level + extra)
    }

    pub fn render(&self) -> String {
        let mut decorators = Vec::new();
        let mut header = String::new();
        let mut trailer = Vec::new();

        for op in &self.ops {
            match op {
                EmitOp::Decorator(text) => decorators.push(format!("{}@{text}", self.indent(0))),
                EmitOp::Keyword(keyword) => {
                    header.push_str(keyword);
                    header.push(' ');
                }
                EmitOp::Name(name) => {
                    header.push_str("def ");
                    header.push_str(name);
                }
                EmitOp::Params(params) => {
                    let rendered: Vec<String> = params
                        .iter()
                        .map(|param| match &param.type_expr {
                            Some(ty) => format!("{}: {}", param.name, target_type(ty)),
                            None => param.name.clone(),
                        })
                        .collect();
                    header.push('(');
                    header.push_str(&rendered.join(", "));
                    header.push(')');
                }
                EmitOp::ReturnType(ty) => {
                    header.push_str(" -> ");
                    header.push_str(&target_type(ty));
                }
                EmitOp::BodyMarker => header.push(':'),
                EmitOp::EmptyBody => trailer.push(format!("{}pass", self.indent(1))),
            }
        }

        let mut lines = decorators;
        if !header.is_empty() {
            lines.push(format!("{}{header}", self.indent(0)));
        }
        lines.extend(trailer);
        lines.join("\n")
    }
}
