//! # Record Store
//!
//! The immutable, ordered collection of publication records.
//!
//! - Built exactly once, from a CSV table with a header row
//! - `store.all()[i].id == RecordId(i)` for every record
//! - Never mutated, appended to or reordered after construction
//!
//! The store is shared read-only between concurrent queries; no locking is
//! required because there is no writer after construction.

use crate::primitives::{FIELD_ID, MAX_DATASET_BYTES, is_null_marker};
use crate::types::{BiospaceError, Record, RecordId};
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

/// Byte order mark some spreadsheet exports put in front of UTF-8 text.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The immutable record sequence.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordStore {
    /// Load the dataset from a CSV file.
    ///
    /// Fails with `DatasetUnavailable` if the file is missing, is not a
    /// regular file, exceeds `MAX_DATASET_BYTES`, or is not a readable table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BiospaceError> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path).map_err(|e| {
            BiospaceError::DatasetUnavailable(format!("Cannot access '{}': {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(BiospaceError::DatasetUnavailable(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }

        if metadata.len() > MAX_DATASET_BYTES {
            return Err(BiospaceError::DatasetUnavailable(format!(
                "File size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_DATASET_BYTES
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            BiospaceError::DatasetUnavailable(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Self::from_bytes(&bytes)
    }

    /// Load the dataset from any byte source.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, BiospaceError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| BiospaceError::DatasetUnavailable(format!("Read failed: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Build a store from in-memory rows of column/value pairs.
    ///
    /// Identifiers are assigned in iteration order, exactly as for a file.
    pub fn from_rows<I, R, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut records = Vec::new();

        for (position, row) in rows.into_iter().enumerate() {
            let cells: Vec<(String, String)> = row
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect();

            for (name, _) in &cells {
                if name != FIELD_ID && !columns.contains(name) {
                    columns.push(name.clone());
                }
            }

            records.push(Record::from_columns(RecordId(position), cells));
        }

        Self { columns, records }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BiospaceError> {
        let text = decode_text(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();

        if columns.iter().all(String::is_empty) {
            return Err(BiospaceError::DatasetUnavailable(
                "Table has no header row".to_string(),
            ));
        }

        let mut records = Vec::new();
        for (position, row) in reader.records().enumerate() {
            let row = row.map_err(csv_error)?;

            // Short rows are padded with empty cells, surplus cells ignored.
            let cells = columns.iter().enumerate().map(|(index, column)| {
                let cell = row.get(index).unwrap_or("");
                let value = if is_null_marker(cell) { "" } else { cell };
                (column.as_str(), value)
            });

            records.push(Record::from_columns(RecordId(position), cells));
        }

        let columns = columns
            .into_iter()
            .filter(|column| column != FIELD_ID)
            .collect();

        Ok(Self { columns, records })
    }

    /// The full record sequence in load order.
    #[must_use]
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by its raw identifier.
    ///
    /// Returns `NotFound` for negative identifiers and for anything at or
    /// beyond `len()`.
    pub fn by_id(&self, id: i64) -> Result<&Record, BiospaceError> {
        RecordId::from_raw(id)
            .and_then(|record_id| self.get(record_id))
            .ok_or(BiospaceError::NotFound(id))
    }

    /// Look up a record by identifier.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in header order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Decode raw table bytes.
///
/// Valid UTF-8 is used as is (minus a leading BOM). Anything else is read
/// as Latin-1, one byte per code point, which cannot fail.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

fn csv_error(e: csv::Error) -> BiospaceError {
    BiospaceError::DatasetUnavailable(format!("Malformed table: {}", e))
}

// =============================================================================
// TESTS
// =============================================================================
