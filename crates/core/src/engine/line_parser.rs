//! Line-anchored narrative parsing.
//!
//! Each non-empty line is read in one of two modes. In unstructured mode the
//! line is copied verbatim into the unstructured fragments. In structured
//! mode the line is classified by its leading slashes:
//!
//! - `//text` continues the open item,
//! - `/CODE/text` opens a new item when `CODE` passes the format's codeword
//!   rule,
//! - anything else either extends the open item (formats whose continuation
//!   lines need no `//`) or becomes an unstructured fragment for that line
//!   only.
//!
//! Structured mode is entered once, by the shape of the value's first
//! characters, and a rejected line never leaves it: the next line is judged
//! afresh against the currently open item.

use std::collections::BTreeMap;

use mt_narrative_diagnostics::{Diagnostic, DiagnosticSink, Span, codes};
use mt_narrative_formats::{Continuation, LineFormat};

use super::lines::{Line, non_empty_lines};
use crate::amount::split_currency_amount;
use crate::error::NarrativeError;
use crate::model::{Narrative, StructuredNarrative};
use crate::validate::{is_valid_codeword, normalize_country};

/// Parse `value` with a line-anchored format.
///
/// Absent or empty values give an empty [`Narrative`]. Fallback events are
/// reported to `sink`, tagged with `field` when given.
///
/// # Errors
///
/// [`NarrativeError::InvalidAmount`] when a currency-bearing codeword line
/// carries an unparseable amount.
pub fn parse_lines(
    value: Option<&str>,
    format: &LineFormat,
    field: Option<&str>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Narrative, NarrativeError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(Narrative::new());
    };
    let mut parser = LineParser {
        format,
        field,
        sink,
        mode: Mode::initial(value),
        open: None,
        narrative: Narrative::new(),
    };
    for line in non_empty_lines(value) {
        parser.line(line)?;
    }
    Ok(parser.finish())
}

// ─── State ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Every line is an unstructured fragment.
    Unstructured,
    /// Lines are checked for codewords and continuations.
    Structured,
}

impl Mode {
    fn initial(value: &str) -> Self {
        if value.starts_with('/') && !value.starts_with("//") {
            Mode::Structured
        } else {
            Mode::Unstructured
        }
    }
}

/// The item currently receiving continuation text. It moves into the
/// narrative when the next codeword opens or input ends.
struct OpenItem {
    item: StructuredNarrative,
    first_supplement_added: bool,
}

impl OpenItem {
    fn new(item: StructuredNarrative) -> Self {
        Self {
            item,
            first_supplement_added: false,
        }
    }

    /// Until the first supplement exists, text before the first `/` is
    /// narrative and text after it is the first supplement. Afterwards the
    /// whole text is one more supplement.
    fn add_with_supplement(&mut self, text: &str) {
        if self.first_supplement_added {
            self.item.push_supplement(text);
            return;
        }
        let (narrative, supplement) = text.split_once('/').unwrap_or((text, ""));
        self.item.push_narrative(narrative);
        if !supplement.is_empty() {
            self.item.push_supplement(supplement);
            self.first_supplement_added = true;
        }
    }
}

/// Shape of a line read in structured mode.
enum Shape<'l> {
    /// `//text`
    Continuation(&'l str),
    /// `/token/rest`; `token` is `None` when no closing slash follows.
    Slash { token: Option<&'l str>, rest: &'l str },
    /// No leading slash.
    Text,
}

impl<'l> Shape<'l> {
    fn of(line: &'l str) -> Self {
        if let Some(text) = line.strip_prefix("//") {
            return Shape::Continuation(text);
        }
        match line.strip_prefix('/') {
            Some(after) => match after.split_once('/') {
                Some((token, rest)) => Shape::Slash {
                    token: Some(token),
                    rest,
                },
                None => Shape::Slash {
                    token: None,
                    rest: "",
                },
            },
            None => Shape::Text,
        }
    }
}

struct LineParser<'a, 's> {
    format: &'a LineFormat,
    field: Option<&'a str>,
    sink: &'s mut dyn DiagnosticSink,
    mode: Mode,
    open: Option<OpenItem>,
    narrative: Narrative,
}

impl LineParser<'_, '_> {
    fn line(&mut self, line: Line<'_>) -> Result<(), NarrativeError> {
        if self.mode == Mode::Unstructured {
            self.narrative.push_unstructured(line.text);
            return Ok(());
        }

        match Shape::of(line.text) {
            Shape::Continuation(text) => self.continuation(line, text),
            Shape::Slash {
                token: Some(token),
                rest,
            } if is_valid_codeword(token, &self.format.codeword) => {
                self.open_item(token, rest)?;
            }
            Shape::Slash { token, .. } => {
                if !self.extend_with_line(line) {
                    self.reject_codeword(line, token.unwrap_or(""));
                }
            }
            Shape::Text => {
                if !self.extend_with_line(line) {
                    self.narrative.push_unstructured(line.text);
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Narrative {
        if let Some(open) = self.open.take() {
            self.narrative.push_structured(open.item);
        }
        self.narrative
    }

    // ── Transitions ─────────────────────────────────────────────────────

    fn open_item(&mut self, token: &str, rest: &str) -> Result<(), NarrativeError> {
        let mut item = StructuredNarrative::new(token.trim());
        let mut text = rest;

        if self.format.supports_country {
            let (before, after) = rest.split_once("//").unwrap_or((rest, ""));
            if let Some(country) = normalize_country(before) {
                item.set_country(country);
                text = after;
            }
        }

        let remainder: String;
        if self.format.supports_currency {
            let split = split_currency_amount(text)?;
            if let Some(currency) = split.currency {
                item.set_currency(currency);
            }
            if let Some(amount) = split.amount {
                item.set_amount(amount);
            }
            remainder = split.remainder.unwrap_or_default();
            text = &remainder;
        }

        let mut open = OpenItem::new(item);
        if self.format.supports_supplement {
            open.add_with_supplement(text);
        } else {
            open.item.push_narrative(text);
        }

        if let Some(previous) = self.open.replace(open) {
            self.narrative.push_structured(previous.item);
        }
        self.mode = Mode::Structured;
        Ok(())
    }

    fn continuation(&mut self, line: Line<'_>, text: &str) {
        let with_supplement = self.format.continuation == Continuation::DoubleSlash
            && self.format.supports_supplement;
        let Some(open) = self.open.as_mut() else {
            self.emit(
                codes::ORPHAN_CONTINUATION,
                "continuation line before any codeword; kept as unstructured text".into(),
                line.span,
                None,
            );
            self.narrative.push_unstructured(line.text);
            return;
        };
        if with_supplement {
            open.add_with_supplement(text);
        } else {
            open.item.push_narrative(text);
        }
    }

    /// Formats without `//` continuation append any non-codeword line to the
    /// open item. Returns false when the line was not consumed.
    fn extend_with_line(&mut self, line: Line<'_>) -> bool {
        if self.format.continuation != Continuation::AnyText {
            return false;
        }
        match self.open.as_mut() {
            Some(open) => {
                open.item.push_narrative(line.text);
                true
            }
            None => false,
        }
    }

    fn reject_codeword(&mut self, line: Line<'_>, token: &str) {
        self.emit(
            codes::CODEWORD_REJECTED,
            format!("'{token}' is not a valid codeword; line kept as unstructured text"),
            line.span,
            Some(("codeword", token)),
        );
        self.narrative.push_unstructured(line.text);
    }

    fn emit(&mut self, id: &'static str, message: String, span: Span, extra: Option<(&str, &str)>) {
        let mut context = BTreeMap::new();
        if let Some(field) = self.field {
            context.insert("field".to_string(), field.to_string());
        }
        if let Some((key, value)) = extra {
            context.insert(key.to_string(), value.to_string());
        }
        let mut diagnostic = Diagnostic::from_code(id, message, Some(span));
        if !context.is_empty() {
            diagnostic = diagnostic.with_context(context);
        }
        self.sink.emit(diagnostic);
    }
}
