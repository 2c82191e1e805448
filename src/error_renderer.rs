//! Error rendering using ariadne
//!
//! Syntax, type and evaluation errors all lower to a [`Diagnostic`]; this module draws
//! it over the formula text with the offending fragment underlined.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<formula>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use formula::{Bindings, Engine, render_error};
///
/// let engine = Engine::default();
/// if let Err(e) = engine.compile("1 - \"hello\"", &Bindings::new()) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes
///
/// Same as `render_error_to_string` without ANSI escapes, so the output can be
/// compared in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let diagnostic = error.to_diagnostic();
    match error.source_text() {
        Some(source) => render_diagnostic(source, &diagnostic, writer, use_color),
        // Nothing to point into; fall back to the plain message.
        None => writeln!(writer, "{}: {}", diagnostic.severity, error),
    }
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    let span = clamp(diag.span.0.clone(), source.len());
    let mut report = Report::build(kind, (SOURCE_ID, span.clone()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new((SOURCE_ID, span))
            .with_message(&diag.message)
            .with_color(color),
    );

    for related in &diag.related {
        let color = colors.next();
        report = report.with_label(
            Label::new((SOURCE_ID, clamp(related.span.0.clone(), source.len())))
                .with_message(&related.message)
                .with_color(color),
        );
    }

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

// Nested `eval` failures may carry spans of the inner text; keep them inside the outer one.
fn clamp(span: std::ops::Range<usize>, len: usize) -> std::ops::Range<usize> {
    let start = span.start.min(len);
    start..span.end.clamp(start, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bindings, Engine, ValueKind};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn compile_error(source: &str) -> Error {
        let mut row = Bindings::new();
        row.declare("name", ValueKind::String);
        match Engine::default().compile(source, &row) {
            Ok(_) => panic!("'{}' should not compile", source),
            Err(e) => e,
        }
    }

    #[test]
    fn test_render_syntax_error() {
        let output = render_error_to_string_no_color(&compile_error("1 + * 2"));
        assert!(output.contains("Error"));
        assert!(output.contains("1 + * 2"));
    }

    #[test]
    fn test_render_type_error_points_at_fragment() {
        let output = render_error_to_string_no_color(&compile_error("1 + sqrt([name])"));
        assert!(output.contains("E003"), "{}", output);
        assert!(output.contains("1 + sqrt([name])"));
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_evaluation_error() {
        let engine = Engine::default();
        let row = Bindings::new();
        let formula = engine.compile("%{nope}", &row).unwrap();
        let err = formula.run(&row).unwrap_err();
        let output = render_error_to_string_no_color(&err);
        assert!(output.contains("R002"), "{}", output);
        assert!(output.contains("%{nope}"));
    }

    #[test]
    fn test_plain_fallback_without_source() {
        use formula_core::evaluator::{EvaluationError, EvaluationErrorKind};

        let err = Error::Evaluation(EvaluationError::new(EvaluationErrorKind::UnknownMacro(
            "x".to_string(),
        )));
        assert_eq!(
            render_error_to_string_no_color(&err),
            indoc! {"
                error: Evaluation error: unknown macro 'x'
            "}
        );
    }

    #[test]
    fn test_clamp_keeps_span_inside_source() {
        assert_eq!(clamp(3..40, 10), 3..10);
        assert_eq!(clamp(12..15, 10), 10..10);
        assert_eq!(clamp(2..4, 10), 2..4);
    }
}
