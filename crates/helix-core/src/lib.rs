//! Helix compiler utilities.
pub mod diagnostic;
pub mod span;

pub use diagnostic::{CompilationPhase, Diagnostic, DiagnosticSeverity};
pub use span::{Span, Spanned};
