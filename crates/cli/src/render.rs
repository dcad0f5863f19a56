//! Terminal rendering of resolver diagnostics.
//!
//! Diagnostics that carry a span are drawn as ariadne reports over the field
//! value; the rest (unknown field, bad amount) print as one plain line.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use mt_narrative_diagnostics::{Diagnostic, Severity};

/// How command results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured output; diagnostics go to stderr.
    Pretty,
    /// One JSON document on stdout.
    Json,
}

impl Format {
    /// Use the `--output` value when given, otherwise pretty on a TTY and
    /// JSON when stdout is piped.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

/// Report kind, colour and plain-text label for a severity.
fn style(severity: &Severity) -> (ReportKind<'static>, Color, &'static str) {
    match severity {
        Severity::Error => (ReportKind::Error, Color::Red, "error"),
        Severity::Info => (ReportKind::Advice, Color::Blue, "info"),
        _ => (ReportKind::Warning, Color::Yellow, "warn"),
    }
}

/// Write `diagnostics` for the field value `source` to stderr.
pub(crate) fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        let (kind, color, label) = style(&diag.severity);
        let note = context_note(diag);

        let Some(span) = &diag.span else {
            eprintln!("{label}[{}]: {}", diag.id, diag.message);
            if let Some(note) = note {
                eprintln!("  = note: {note}");
            }
            if let Some(help) = diag.explain() {
                eprintln!("  = help: {help}");
            }
            continue;
        };

        // Spans index the value as read; keep them inside it.
        let start = span.start.min(source.len());
        let end = span.end.clamp(start, source.len());

        let mut report = Report::build(kind, (filename, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(Config::default().with_compact(false))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(line_label(diag))
                    .with_color(color),
            );
        if let Some(note) = note {
            report = report.with_note(note);
        }
        if let Some(help) = diag.explain() {
            report = report.with_help(help);
        }
        report.finish().eprint(&mut cache).ok();
    }
}

/// `key=value` pairs of the diagnostic context, e.g. `codeword=bad, field=77A`.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|ctx| !ctx.is_empty())?;
    let pairs: Vec<String> = ctx.iter().map(|(k, v)| format!("{k}={v}")).collect();
    Some(pairs.join(", "))
}

/// Label for the underlined line: the rejected codeword when known,
/// otherwise the message.
fn line_label(diag: &Diagnostic) -> String {
    match diag.context_value("codeword") {
        Some("") => "no closing '/' after the codeword".to_string(),
        Some(codeword) => format!("'{codeword}' is not a codeword for this field"),
        None => diag.message.clone(),
    }
}

/// Print per-severity counts to stderr, e.g. `1 error, 2 warnings, 3 info`.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let count = |want: Severity| diagnostics.iter().filter(|d| d.severity == want).count();
    let errors = count(Severity::Error);
    let warnings = diagnostics.len() - errors - count(Severity::Info);
    let infos = count(Severity::Info);

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{errors} error{s}").fg(Color::Red).to_string());
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!("{warnings} warning{s}").fg(Color::Yellow).to_string());
    }
    if infos > 0 {
        parts.push(format!("{infos} info").fg(Color::Blue).to_string());
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}
