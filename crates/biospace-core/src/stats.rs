//! # Stats Module
//!
//! Frequency aggregates over the full, unfiltered record sequence.
//!
//! Values are grouped verbatim (no case folding, no trimming), and the empty
//! string is a value like any other, so every table sums to the record count.

use crate::types::Record;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

// =============================================================================
// FREQUENCY TABLE
// =============================================================================

/// Count of records per distinct value of one column.
///
/// Entries are ordered by count, highest first; equal counts keep the order
/// in which the value first appeared. Consumers must not rely on this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    /// Count the values produced by `values`.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions: BTreeMap<&'a str, usize> = BTreeMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for value in values {
            match positions.get(value) {
                Some(&position) => entries[position].1 += 1,
                None => {
                    positions.insert(value, entries.len());
                    entries.push((value.to_string(), 1));
                }
            }
        }

        // Stable: ties stay in first-appearance order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        Self { entries }
    }

    /// Count for one value, or 0 if it never occurs.
    #[must_use]
    pub fn get(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|(key, _)| key == value)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Iterate over (value, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no value was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn sum(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Serialized as a JSON object of value to count.
impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (value, count) in &self.entries {
            map.serialize_entry(value, count)?;
        }
        map.end()
    }
}

// =============================================================================
// STATS
// =============================================================================

/// Aggregates over the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Stats {
    pub by_category: FrequencyTable,
    pub by_organism: FrequencyTable,
    pub by_impact: FrequencyTable,
    pub total_publications: usize,
}

impl Stats {
    /// Compute all three frequency tables in one pass per column.
    #[must_use]
    pub fn compute(records: &[Record]) -> Self {
        Self {
            by_category: FrequencyTable::from_values(records.iter().map(|r| r.category.as_str())),
            by_organism: FrequencyTable::from_values(records.iter().map(|r| r.organism.as_str())),
            by_impact: FrequencyTable::from_values(records.iter().map(|r| r.impact.as_str())),
            total_publications: records.len(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
