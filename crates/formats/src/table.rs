use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::NarrativeFormat;

/// Schema version written by [`FormatTable::to_config_json`] and accepted by the loader.
pub const TABLE_SCHEMA_VERSION: &str = "1.0.0";

/// Errors that can occur when loading or validating a format table.
#[derive(Debug, Error)]
pub enum FormatConfigError {
    /// Reading the config file failed.
    #[error("cannot read format table {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("invalid format table JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field entry or header value failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The field identifier or header key that failed validation.
        field: String,
        /// A human-readable explanation of why the value is invalid.
        reason: String,
    },
}

/// Which part of a field's value carries the narrative text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// The whole field value.
    #[default]
    FullValue,
    /// Only the supplementary-details sub-field (statement lines, field 61).
    SupplementaryDetails,
}

/// Format selected for one field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// The narrative format.
    pub format: NarrativeFormat,
    /// Which part of the value is resolved.
    #[serde(default, skip_serializing_if = "is_full_value")]
    pub source: ValueSource,
}

fn is_full_value(source: &ValueSource) -> bool {
    *source == ValueSource::FullValue
}

impl FieldEntry {
    /// Entry resolving the whole field value.
    pub const fn full(format: NarrativeFormat) -> Self {
        Self {
            format,
            source: ValueSource::FullValue,
        }
    }
}

/// Lookup from field identifier to [`FieldEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatTable {
    fields: BTreeMap<String, FieldEntry>,
}

const BUILTIN: &[(NarrativeFormat, &[&str])] = &[
    (NarrativeFormat::Format1, &["77A", "74", "86"]),
    (NarrativeFormat::Format2, &["72Z", "72", "77", "77J"]),
    (NarrativeFormat::Format3, &["73A", "71D", "71B", "73"]),
    (NarrativeFormat::Format4, &["77B"]),
    (NarrativeFormat::Format5, &["75", "76"]),
    (NarrativeFormat::Format6, &["49N", "45B", "46B", "49M"]),
    (NarrativeFormat::Format7, &["70", "77D", "37N"]),
    (NarrativeFormat::Format8, &["29A", "79"]),
];

static BUILTIN_TABLE: LazyLock<FormatTable> = LazyLock::new(|| {
    let mut table = FormatTable::default();
    for (format, fields) in BUILTIN {
        for field in *fields {
            table.insert(*field, FieldEntry::full(*format));
        }
    }
    table.insert(
        "61",
        FieldEntry {
            format: NarrativeFormat::Format8,
            source: ValueSource::SupplementaryDetails,
        },
    );
    table
});

/// On-disk shape of a format table.
#[derive(Debug, Serialize, Deserialize)]
struct TableConfig {
    schema_version: String,
    #[serde(default = "default_true")]
    extends_builtin: bool,
    #[serde(default)]
    fields: BTreeMap<String, FieldEntry>,
}

fn default_true() -> bool {
    true
}

impl FormatTable {
    /// The built-in table covering every narrative field of the standard.
    pub fn builtin() -> &'static FormatTable {
        &BUILTIN_TABLE
    }

    /// Look up the entry for a field identifier.
    pub fn select(&self, field: &str) -> Option<&FieldEntry> {
        self.fields.get(field)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, field: impl Into<String>, entry: FieldEntry) -> Option<FieldEntry> {
        self.fields.insert(field.into(), entry)
    }

    /// Iterate entries ordered by field identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of field identifiers in the table.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field identifiers that use `format`, in identifier order.
    pub fn fields_for(&self, format: NarrativeFormat) -> Vec<&str> {
        self.iter()
            .filter(|(_, e)| e.format == format)
            .map(|(k, _)| k)
            .collect()
    }

    /// Parse and validate a table from JSON or JSONC text.
    ///
    /// With `"extends_builtin": true` (the default) the listed fields are
    /// layered over [`FormatTable::builtin`]; otherwise the table holds only
    /// the listed fields.
    pub fn from_json_str(input: &str) -> Result<Self, FormatConfigError> {
        let stripped = mt_narrative_jsonc_strip::strip_jsonc(input);
        let config: TableConfig = serde_json::from_str(&stripped)?;

        if config.schema_version != TABLE_SCHEMA_VERSION {
            return Err(FormatConfigError::InvalidField {
                field: "schema_version".into(),
                reason: format!(
                    "unsupported version {:?}, expected {:?}",
                    config.schema_version, TABLE_SCHEMA_VERSION
                ),
            });
        }

        let mut table = if config.extends_builtin {
            Self::builtin().clone()
        } else {
            Self::default()
        };
        for (field, entry) in config.fields {
            validate_field_id(&field)?;
            if entry.source == ValueSource::SupplementaryDetails && !entry.format.is_free_format() {
                return Err(FormatConfigError::InvalidField {
                    field,
                    reason: format!(
                        "supplementary_details source requires format8, got {}",
                        entry.format
                    ),
                });
            }
            table.insert(field, entry);
        }
        Ok(table)
    }

    /// Read and parse a table file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FormatConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Serialize as a standalone (non-extending) config document.
    pub fn to_config_json(&self) -> Result<String, FormatConfigError> {
        let config = TableConfig {
            schema_version: TABLE_SCHEMA_VERSION.into(),
            extends_builtin: false,
            fields: self.fields.clone(),
        };
        Ok(serde_json::to_string_pretty(&config)?)
    }
}

/// Field identifiers are two or three characters: a leading digit followed by
/// digits or upper-case letters (`79`, `77A`, `336`).
fn validate_field_id(field: &str) -> Result<(), FormatConfigError> {
    let bytes = field.as_bytes();
    let well_formed = (2..=3).contains(&bytes.len())
        && bytes[0].is_ascii_digit()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());
    if well_formed {
        Ok(())
    } else {
        Err(FormatConfigError::InvalidField {
            field: field.to_string(),
            reason: "field identifier must be 2-3 characters: a digit then digits or upper-case letters".into(),
        })
    }
}
