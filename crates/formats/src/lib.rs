//! Narrative formats and the field-identifier format table.
//!
//! Every narrative-bearing field follows one of eight formatting conventions.
//! Seven of them are line-anchored and described by a [`LineFormat`]; the
//! eighth is the free format, where codewords may appear anywhere in the
//! text. [`FormatTable`] maps field identifiers to a [`FieldEntry`] naming the
//! format and which part of the field value carries the narrative.

#![warn(missing_docs)]

/// Format variants and their line-format parameters.
pub mod format;
/// Field-identifier lookup table and its JSON/JSONC configuration.
pub mod table;

pub use format::{CodewordClass, CodewordRule, Continuation, LineFormat, NarrativeFormat};
pub use table::{FieldEntry, FormatConfigError, FormatTable, TABLE_SCHEMA_VERSION, ValueSource};
