//! Diagnostic formatting for the Helix CLI.

use ariadne::{Color, Label, Report, ReportKind, Source};
use helix_core::{CompilationPhase, Diagnostic, DiagnosticSeverity};

/// Get the display color for a compilation phase.
pub fn phase_color(phase: CompilationPhase) -> Color {
    match phase {
        CompilationPhase::Lexing => Color::Red,
        CompilationPhase::DeclarationSplitting => Color::Magenta,
        CompilationPhase::FunctionCompilation => Color::Yellow,
        CompilationPhase::Registration => Color::Cyan,
    }
}

pub fn report_kind(severity: DiagnosticSeverity) -> ReportKind<'static> {
    match severity {
        DiagnosticSeverity::Error => ReportKind::Error,
        DiagnosticSeverity::Warning => ReportKind::Warning,
        DiagnosticSeverity::Info => ReportKind::Advice,
    }
}

/// Normalize a span to ensure end > start (required by ariadne).
pub fn normalize_span(start: usize, end: usize) -> (usize, usize) {
    (start, end.max(start + 1))
}

/// Print a diagnostic to stderr.
pub fn print_diagnostic(diag: &Diagnostic, source: &str, file_path: &str) {
    let (start, end) = normalize_span(diag.span.start, diag.span.end);

    Report::build(report_kind(diag.severity), (file_path, start..end))
        .with_code(format!("{:?}", diag.phase))
        .with_message(&diag.message)
        .with_label(
            Label::new((file_path, start..end))
                .with_message(&diag.message)
                .with_color(phase_color(diag.phase)),
        )
        .finish()
        .eprint((file_path, Source::from(source)))
        .ok();
}
