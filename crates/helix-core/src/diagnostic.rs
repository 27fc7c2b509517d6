//! Diagnostic messages emitted during compilation.

use derive_more::Display;

use crate::Span;

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub severity: DiagnosticSeverity,
    pub phase: CompilationPhase,
}

impl Diagnostic {
    pub fn error(phase: CompilationPhase, span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            severity: DiagnosticSeverity::Error,
            phase,
        }
    }

    pub fn warning(phase: CompilationPhase, span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            severity: DiagnosticSeverity::Warning,
            phase,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Severity level of a diagnostic.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    #[display("ERROR")]
    Error,
    #[display("WARNING")]
    Warning,
    #[display("INFO")]
    Info,
}

/// Compilation phase where a diagnostic was emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompilationPhase {
    Lexing,
    DeclarationSplitting,
    FunctionCompilation,
    Registration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(DiagnosticSeverity::Error.to_string(), "ERROR");
        assert_eq!(DiagnosticSeverity::Warning.to_string(), "WARNING");
        assert_eq!(DiagnosticSeverity::Info.to_string(), "INFO");
    }

    #[test]
    fn test_error_constructor() {
        let diag = Diagnostic::error(CompilationPhase::Lexing, Span::new(1, 2), "bad");
        assert!(diag.is_error());
        assert_eq!(diag.message, "bad");
    }
}
