//! # Core Type Definitions
//!
//! This module contains the core types of the BioSpace query engine:
//! - Record identifiers (`RecordId`)
//! - The publication record (`Record`) and its raw-row view (`RecordRow`)
//! - Error types (`BiospaceError`)
//!
//! ## Schema
//!
//! Five columns are referenced by the engine and get dedicated fields:
//! `Title`, `Summary`, `Category`, `Organism`, `Impact`. Every other column
//! is carried verbatim in `Record::extra`, in header order.

use crate::primitives::{
    FIELD_CATEGORY, FIELD_ID, FIELD_IMPACT, FIELD_ORGANISM, FIELD_SUMMARY, FIELD_TITLE,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIER
// =============================================================================

/// Stable identifier of a record: its zero-based position in load order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize,
)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl RecordId {
    /// Convert a raw, possibly negative, identifier.
    ///
    /// Returns `None` for negative values, which can never name a record.
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        usize::try_from(raw).ok().map(Self)
    }

    /// Get the position this identifier refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One row of the publications dataset.
///
/// Records are immutable once the store is built. Missing cells are always
/// the empty string, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// Synthetic `_id`, equal to the load-order position.
    pub id: RecordId,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub organism: String,
    pub impact: String,
    /// Passthrough columns in header order.
    pub extra: Vec<(String, String)>,
    /// Every source column, in header order.
    layout: Vec<Column>,
}

/// Where a source column's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Known(&'static str),
    Extra(usize),
}

impl Record {
    /// Build a record from column/value pairs.
    ///
    /// Known columns are routed to their dedicated fields, everything else
    /// lands in `extra`. A `_id` column in the source is dropped since the
    /// identifier is always synthetic. The pair order is kept for
    /// serialization.
    pub fn from_columns<I, K, V>(id: RecordId, columns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self {
            id,
            ..Self::default()
        };

        for (name, value) in columns {
            let name = name.into();
            let value = value.into();
            let known = match name.as_str() {
                FIELD_TITLE => Some((FIELD_TITLE, &mut record.title)),
                FIELD_SUMMARY => Some((FIELD_SUMMARY, &mut record.summary)),
                FIELD_CATEGORY => Some((FIELD_CATEGORY, &mut record.category)),
                FIELD_ORGANISM => Some((FIELD_ORGANISM, &mut record.organism)),
                FIELD_IMPACT => Some((FIELD_IMPACT, &mut record.impact)),
                FIELD_ID => continue,
                _ => None,
            };

            match known {
                Some((field, slot)) => {
                    *slot = value;
                    if !record.layout.contains(&Column::Known(field)) {
                        record.layout.push(Column::Known(field));
                    }
                }
                None => {
                    record.layout.push(Column::Extra(record.extra.len()));
                    record.extra.push((name, value));
                }
            }
        }

        record
    }

    /// Look up a column value by its exact header name.
    ///
    /// Returns `None` for columns the source did not have and for `_id`,
    /// which is not a text column.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            FIELD_TITLE | FIELD_SUMMARY | FIELD_CATEGORY | FIELD_ORGANISM | FIELD_IMPACT => self
                .layout
                .iter()
                .find_map(|column| match column {
                    Column::Known(field) if *field == name => self.known(field),
                    _ => None,
                }),
            _ => self
                .extra
                .iter()
                .find(|(column, _)| column == name)
                .map(|(_, value)| value.as_str()),
        }
    }

    /// View of this record as the raw table row, without `_id`.
    #[must_use]
    pub fn as_row(&self) -> RecordRow<'_> {
        RecordRow(self)
    }

    fn known(&self, field: &str) -> Option<&str> {
        match field {
            FIELD_TITLE => Some(&self.title),
            FIELD_SUMMARY => Some(&self.summary),
            FIELD_CATEGORY => Some(&self.category),
            FIELD_ORGANISM => Some(&self.organism),
            FIELD_IMPACT => Some(&self.impact),
            _ => None,
        }
    }

    fn serialize_columns<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for column in &self.layout {
            match *column {
                Column::Known(field) => {
                    if let Some(value) = self.known(field) {
                        map.serialize_entry(field, value)?;
                    }
                }
                Column::Extra(index) => {
                    if let Some((name, value)) = self.extra.get(index) {
                        map.serialize_entry(name, value)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Records serialize as a flat object of column name to value, in header
/// order, followed by `_id`.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.layout.len() + 1))?;
        self.serialize_columns(&mut map)?;
        map.serialize_entry(FIELD_ID, &self.id)?;
        map.end()
    }
}

/// A record as it appears in the source table, with no synthetic `_id`.
#[derive(Debug, Clone, Copy)]
pub struct RecordRow<'a>(&'a Record);

impl Serialize for RecordRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.layout.len()))?;
        self.0.serialize_columns(&mut map)?;
        map.end()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the BioSpace engine.
///
/// - Empty filters, unknown sort fields and empty pages are NOT errors
/// - The core never panics; all errors are returned as values
#[derive(Debug, Error)]
pub enum BiospaceError {
    /// The dataset could not be read or parsed. Fatal at startup.
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// No record carries the requested identifier.
    #[error("Record not found: {0}")]
    NotFound(i64),

    /// A request parameter could not be parsed or is out of range.
    #[error("Invalid parameter '{name}': {value:?}")]
    InvalidParameter { name: &'static str, value: String },
}

impl BiospaceError {
    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DatasetUnavailable(_) => "dataset_unavailable",
            Self::NotFound(_) => "not_found",
            Self::InvalidParameter { .. } => "invalid_parameter",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
