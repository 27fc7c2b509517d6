//! Function declaration compiler for Helix.
//!
//! Given the tokens of one `fn` declaration and the scopes it appears in,
//! [`FunctionCompiler::compile`] strips decorators and modifiers, extracts the
//! parameter table, registers the function in its parent scope and renders the
//! target-language header.

pub mod decorators;
pub mod emit;
pub mod errors;
pub mod function;
pub mod modifiers;
pub mod scope;
mod text;
pub mod variables;

pub use decorators::Decorator;
pub use emit::{EmitOp, FunctionEmitter, Param};
pub use errors::{FunctionError, FunctionErrorKind, FunctionResult};
pub use function::{BodyMarker, CompiledFunction, DEFAULT_INDENT, FunctionCompiler};
pub use modifiers::ModifierFlags;
pub use scope::{FunctionMeta, Scope, ScopeChain, ScopeId, ScopeKind, ScopeTree};
pub use variables::{VariableInfo, VariableTable};
