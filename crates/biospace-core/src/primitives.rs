//! # Primitives
//!
//! Fixed constants for the BioSpace engine: column names the engine reads,
//! request defaults, and dataset ingestion limits.

// =============================================================================
// COLUMN NAMES
// =============================================================================

pub const FIELD_TITLE: &str = "Title";
pub const FIELD_SUMMARY: &str = "Summary";
pub const FIELD_CATEGORY: &str = "Category";
pub const FIELD_ORGANISM: &str = "Organism";
pub const FIELD_IMPACT: &str = "Impact";

/// Synthetic identifier column added to every record.
pub const FIELD_ID: &str = "_id";

// =============================================================================
// QUERY DEFAULTS
// =============================================================================

/// Page offset used when the request does not carry one.
pub const DEFAULT_OFFSET: usize = 0;

/// Page size used when the request does not carry one.
pub const DEFAULT_LIMIT: usize = 50;

/// Separator between alternatives in the `category` filter.
pub const CATEGORY_SEPARATOR: char = ',';

// =============================================================================
// DATASET LIMITS
// =============================================================================

/// Maximum dataset file size (64 MB).
///
/// The whole table is held in memory, so anything larger is refused at load.
pub const MAX_DATASET_BYTES: u64 = 64 * 1024 * 1024;

/// Cell contents read as "missing" by the table loader.
///
/// A cell equal to one of these is normalized to the empty string.
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true if a raw cell should be treated as missing.
#[must_use]
pub fn is_null_marker(cell: &str) -> bool {
    NULL_MARKERS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_is_fifty() {
        assert_eq!(DEFAULT_OFFSET, 0);
        assert_eq!(DEFAULT_LIMIT, 50);
    }

    #[test]
    fn null_markers_are_exact_matches() {
        assert!(is_null_marker(""));
        assert!(is_null_marker("NaN"));
        assert!(is_null_marker("None"));
        assert!(!is_null_marker(" NaN"));
        assert!(!is_null_marker("Nonempty"));
    }
}
