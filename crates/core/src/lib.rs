//! Structured narrative resolution.
//!
//! Decodes the free-text narrative fields of fixed-format financial messages
//! into a [`Narrative`]: an ordered list of [`StructuredNarrative`] items
//! (codeword plus optional country, currency, amount, narrative and supplement
//! text) and a separate list of unstructured fragments.
//!
//! The main entry points are [`resolve`] for a field identifier and value,
//! [`resolve_free_format`] for the free-format engine, and
//! [`NarrativeResolver`] when a custom [`FormatTable`] or a
//! [`DiagnosticSink`] is needed.

#![warn(missing_docs)]

/// Currency / amount / text splitting.
pub mod amount;
/// Line-anchored and free-format parsing engines.
pub mod engine;
/// Error types.
pub mod error;
/// Narrative result types.
pub mod model;
/// Field-identifier dispatch.
pub mod resolver;
/// Codeword and country predicates.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────

pub use amount::{CurrencyAmount, split_currency_amount};
pub use error::NarrativeError;
pub use model::{Narrative, StructuredNarrative};
pub use resolver::{NarrativeField, NarrativeResolver, RawField, resolve, resolve_free_format};
pub use validate::{is_valid_codeword, normalize_country};

// Formats and diagnostics (re-exported from their crates)
pub use mt_narrative_diagnostics::{Diagnostic, DiagnosticSink, NullSink, Severity, Span, codes};
pub use mt_narrative_formats::{
    CodewordClass, CodewordRule, Continuation, FieldEntry, FormatTable, LineFormat,
    NarrativeFormat, ValueSource,
};

/// Serialize a narrative to a pretty-printed JSON string.
///
/// # Errors
///
/// Propagates `serde_json` failures.
pub fn to_pretty_json(narrative: &Narrative) -> serde_json::Result<String> {
    serde_json::to_string_pretty(narrative)
}
