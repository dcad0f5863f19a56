//! Field-identifier dispatch.

use std::collections::BTreeMap;

use mt_narrative_diagnostics::{Diagnostic, DiagnosticSink, NullSink, codes};
use mt_narrative_formats::{FieldEntry, FormatTable, NarrativeFormat, ValueSource};

use crate::engine::{parse_free_format, parse_lines};
use crate::error::NarrativeError;
use crate::model::Narrative;

/// The view of a message field the resolver needs: its identifier and raw
/// text.
pub trait NarrativeField {
    /// Field identifier, e.g. `77A`.
    fn name(&self) -> &str;

    /// The full raw value, lines separated by `\n`.
    fn value(&self) -> Option<&str>;

    /// The pre-extracted supplementary-details component, for fields whose
    /// narrative lives there.
    fn supplementary_details(&self) -> Option<&str> {
        None
    }
}

/// A [`NarrativeField`] built from owned strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawField {
    name: String,
    value: Option<String>,
    supplementary_details: Option<String>,
}

impl RawField {
    /// Field `name` carrying `value`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            supplementary_details: None,
        }
    }

    /// Attach a supplementary-details component.
    pub fn with_supplementary_details(mut self, details: impl Into<String>) -> Self {
        self.supplementary_details = Some(details.into());
        self
    }
}

impl NarrativeField for RawField {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn supplementary_details(&self) -> Option<&str> {
        self.supplementary_details.as_deref()
    }
}

/// Resolves field values to [`Narrative`]s using a [`FormatTable`].
#[derive(Debug, Clone, Copy)]
pub struct NarrativeResolver<'t> {
    table: &'t FormatTable,
}

impl Default for NarrativeResolver<'static> {
    fn default() -> Self {
        Self::new(FormatTable::builtin())
    }
}

impl<'t> NarrativeResolver<'t> {
    /// Resolver over `table`.
    pub fn new(table: &'t FormatTable) -> Self {
        Self { table }
    }

    /// The table used for format selection.
    pub fn table(&self) -> &'t FormatTable {
        self.table
    }

    /// Format entry for `field`, if known.
    pub fn select(&self, field: &str) -> Option<&'t FieldEntry> {
        self.table.select(field)
    }

    /// Resolve `value` as the narrative of `field`.
    ///
    /// Unknown fields emit an `UNRECOGNIZED_FIELD` warning and give an empty
    /// narrative. Absent or empty values give an empty narrative.
    ///
    /// # Errors
    ///
    /// [`NarrativeError::InvalidAmount`] for an unparseable amount in a
    /// currency-bearing format.
    pub fn resolve(
        &self,
        field: &str,
        value: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Narrative, NarrativeError> {
        match self.select_or_report(field, sink) {
            Some(entry) => dispatch(entry.format, value, Some(field), sink),
            None => Ok(Narrative::new()),
        }
    }

    /// Resolve `value` with an explicit format, bypassing the table.
    ///
    /// # Errors
    ///
    /// See [`NarrativeResolver::resolve`].
    pub fn resolve_as(
        &self,
        format: NarrativeFormat,
        value: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Narrative, NarrativeError> {
        dispatch(format, value, None, sink)
    }

    /// Resolve a field, reading the component its table entry names.
    ///
    /// # Errors
    ///
    /// See [`NarrativeResolver::resolve`].
    pub fn resolve_field(
        &self,
        field: &dyn NarrativeField,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Narrative, NarrativeError> {
        let name = field.name();
        let Some(entry) = self.select_or_report(name, sink) else {
            return Ok(Narrative::new());
        };
        let value = match entry.source {
            ValueSource::FullValue => field.value(),
            ValueSource::SupplementaryDetails => field.supplementary_details(),
        };
        dispatch(entry.format, value, Some(name), sink)
    }

    fn select_or_report(&self, field: &str, sink: &mut dyn DiagnosticSink) -> Option<&'t FieldEntry> {
        let entry = self.table.select(field);
        if entry.is_none() {
            let mut context = BTreeMap::new();
            context.insert("field".to_string(), field.to_string());
            sink.emit(
                Diagnostic::from_code(
                    codes::UNRECOGNIZED_FIELD,
                    format!("field '{field}' has no narrative format"),
                    None,
                )
                .with_context(context),
            );
        }
        entry
    }
}

fn dispatch(
    format: NarrativeFormat,
    value: Option<&str>,
    field: Option<&str>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Narrative, NarrativeError> {
    match format.line_format() {
        Some(line_format) => parse_lines(value, &line_format, field, sink),
        None => Ok(parse_free_format(value)),
    }
}

/// Resolve `value` as the narrative of `field` with the built-in table,
/// discarding diagnostics.
///
/// # Errors
///
/// See [`NarrativeResolver::resolve`].
pub fn resolve(field: &str, value: Option<&str>) -> Result<Narrative, NarrativeError> {
    NarrativeResolver::default().resolve(field, value, &mut NullSink)
}

/// Resolve `value` with the free-format engine.
pub fn resolve_free_format(value: Option<&str>) -> Narrative {
    parse_free_format(value)
}
