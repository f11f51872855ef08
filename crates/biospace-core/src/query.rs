//! # Query Module
//!
//! Filtering, sorting and pagination over the record sequence.
//!
//! - Every stage is a pure function of (records, spec); no state is kept
//! - Filters narrow the working set in a fixed order: text, category,
//!   organism, impact. An empty filter skips its stage entirely
//! - All matching is case-insensitive substring containment
//! - Sorting is stable, so identical requests produce identical pages

use crate::primitives::{CATEGORY_SEPARATOR, DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::types::{BiospaceError, Record};
use serde::{Deserialize, Serialize};

// =============================================================================
// RAW PARAMETERS
// =============================================================================

/// Query parameters exactly as they arrive from a caller.
///
/// Absent parameters are `None`. Nothing here has been validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub organism: Option<String>,
    pub impact: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
}

impl QueryParams {
    /// Collect parameters from raw name/value pairs, as in a query string.
    ///
    /// The first occurrence of a name wins; later repeats and unknown names
    /// are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (name, value) in pairs {
            let slot = match name.as_ref() {
                "q" => &mut params.q,
                "category" => &mut params.category,
                "organism" => &mut params.organism,
                "impact" => &mut params.impact,
                "offset" => &mut params.offset,
                "limit" => &mut params.limit,
                "sort_by" => &mut params.sort_by,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        params
    }
}

// =============================================================================
// PARSED QUERY
// =============================================================================

/// A parsed, normalized query.
///
/// Text fields are trimmed and lower-cased; `sort_by` is trimmed only,
/// since column names are case-sensitive. An empty string means "no filter"
/// (or "no sort" for `sort_by`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub text: String,
    pub category: String,
    pub organism: String,
    pub impact: String,
    pub offset: usize,
    pub limit: usize,
    pub sort_by: String,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: String::new(),
            organism: String::new(),
            impact: String::new(),
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            sort_by: String::new(),
        }
    }
}

impl QuerySpec {
    /// A query matching everything, first page of `DEFAULT_LIMIT` records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate raw parameters.
    ///
    /// Returns `InvalidParameter` if `offset` or `limit` is not a base-10
    /// integer or is negative. Validation happens before any filtering.
    pub fn from_params(params: &QueryParams) -> Result<Self, BiospaceError> {
        let offset = parse_count("offset", params.offset.as_deref(), DEFAULT_OFFSET)?;
        let limit = parse_count("limit", params.limit.as_deref(), DEFAULT_LIMIT)?;

        Ok(Self {
            text: normalize(params.q.as_deref().unwrap_or_default()),
            category: normalize(params.category.as_deref().unwrap_or_default()),
            organism: normalize(params.organism.as_deref().unwrap_or_default()),
            impact: normalize(params.impact.as_deref().unwrap_or_default()),
            offset,
            limit,
            sort_by: params
                .sort_by
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
        })
    }

    /// Free-text filter over title and summary.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = normalize(text);
        self
    }

    /// Category filter; commas separate alternatives.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.category = normalize(category);
        self
    }

    /// Organism filter.
    #[must_use]
    pub fn organism(mut self, organism: &str) -> Self {
        self.organism = normalize(organism);
        self
    }

    /// Impact filter.
    #[must_use]
    pub fn impact(mut self, impact: &str) -> Self {
        self.impact = normalize(impact);
        self
    }

    /// Sort by the named column.
    #[must_use]
    pub fn sort_by(mut self, column: &str) -> Self {
        self.sort_by = column.trim().to_string();
        self
    }

    /// Page window.
    #[must_use]
    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// The non-empty category alternatives.
    fn category_tokens(&self) -> Vec<String> {
        self.category
            .split(CATEGORY_SEPARATOR)
            .map(normalize)
            .filter(|token| !token.is_empty())
            .collect()
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn parse_count(
    name: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, BiospaceError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let invalid = || BiospaceError::InvalidParameter {
        name,
        value: raw.to_string(),
    };

    let text = raw.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    if negative {
        // "-0" is still zero.
        return if digits.bytes().all(|b| b == b'0') {
            Ok(0)
        } else {
            Err(invalid())
        };
    }

    // Only overflow can fail here; such a count is past any dataset.
    Ok(digits.parse().unwrap_or(usize::MAX))
}

// =============================================================================
// QUERY RESULT
// =============================================================================

/// One page of a filtered, optionally sorted, record sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult<'a> {
    /// Number of records matching every filter, before pagination.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub results: Vec<&'a Record>,
}

// =============================================================================
// QUERY ENGINE
// =============================================================================

/// The stateless query engine.
pub struct QueryEngine;

impl QueryEngine {
    /// Run a full query: filter, sort, paginate.
    #[must_use]
    pub fn execute<'a>(records: &'a [Record], spec: &QuerySpec) -> QueryResult<'a> {
        let mut matched = Self::filter(records, spec);
        let total = matched.len();

        if !spec.sort_by.is_empty() {
            Self::sort(&mut matched, &spec.sort_by);
        }

        QueryResult {
            total,
            offset: spec.offset,
            limit: spec.limit,
            results: Self::paginate(matched, spec.offset, spec.limit),
        }
    }

    /// Apply the four filter stages, preserving input order.
    ///
    /// The query is re-normalized here so library callers that build a
    /// `QuerySpec` by hand get the same matching as parsed requests.
    #[must_use]
    pub fn filter<'a>(records: &'a [Record], spec: &QuerySpec) -> Vec<&'a Record> {
        let text = normalize(&spec.text);
        let categories = spec.category_tokens();
        let organism = normalize(&spec.organism);
        let impact = normalize(&spec.impact);

        let mut matched: Vec<&Record> = records.iter().collect();

        if !text.is_empty() {
            matched.retain(|record| matches_text(record, &text));
        }

        if !categories.is_empty() {
            matched.retain(|record| {
                let category = record.category.to_lowercase();
                categories.iter().any(|token| category.contains(token.as_str()))
            });
        }

        if !organism.is_empty() {
            matched.retain(|record| contains_folded(&record.organism, &organism));
        }

        if !impact.is_empty() {
            matched.retain(|record| contains_folded(&record.impact, &impact));
        }

        matched
    }

    /// Stable ascending sort by the lower-cased value of `column`.
    ///
    /// Records without the column sort as the empty string, so an unknown
    /// column leaves the order untouched.
    pub fn sort(records: &mut [&Record], column: &str) {
        records.sort_by_cached_key(|record| {
            record.field(column).unwrap_or_default().to_lowercase()
        });
    }

    /// The `[offset, offset + limit)` window, clamped to the input.
    #[must_use]
    pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
        items.into_iter().skip(offset).take(limit).collect()
    }
}

/// Title and summary are joined with one space before matching.
fn matches_text(record: &Record, needle: &str) -> bool {
    let haystack = format!(
        "{} {}",
        record.title.to_lowercase(),
        record.summary.to_lowercase()
    );
    haystack.contains(needle)
}

fn contains_folded(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(needle)
}

// =============================================================================
// TESTS
// =============================================================================
