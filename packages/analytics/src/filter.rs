//! List-view filtering.
//!
//! A record passes when every active criterion matches (AND). The search
//! criterion itself is an OR over [`SEARCH_FIELDS`]. Output keeps input
//! order.

use cps_dashboard_analytics_models::FilterCriteria;
use cps_dashboard_school_models::{SchoolRecord, TextField};

/// Columns the free-text search looks at, in the order they are checked.
/// Absent columns are skipped.
pub const SEARCH_FIELDS: &[TextField] = &[
    TextField::SchoolName,
    TextField::City,
    TextField::LongName,
    TextField::NameOfSchool,
];

/// Returns the records that satisfy `criteria`, cloned, in input order.
#[must_use]
pub fn filter(records: &[SchoolRecord], criteria: &FilterCriteria) -> Vec<SchoolRecord> {
    filter_refs(records, criteria).into_iter().cloned().collect()
}

/// Borrowing variant of [`filter`].
#[must_use]
pub fn filter_refs<'a>(
    records: &'a [SchoolRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a SchoolRecord> {
    let needle = criteria.search_needle();
    records
        .iter()
        .filter(|r| matches_with_needle(r, criteria, needle.as_deref()))
        .collect()
}

/// Whether a single record satisfies `criteria`.
#[must_use]
pub fn matches(record: &SchoolRecord, criteria: &FilterCriteria) -> bool {
    matches_with_needle(record, criteria, criteria.search_needle().as_deref())
}

fn matches_with_needle(
    record: &SchoolRecord,
    criteria: &FilterCriteria,
    needle: Option<&str>,
) -> bool {
    criteria.type_filter.matches(record.school_type)
        && criteria.rating_filter.matches(record.safety_rating)
        && needle.is_none_or(|n| matches_search(record, n))
}

/// `needle` must already be lowercased.
fn matches_search(record: &SchoolRecord, needle: &str) -> bool {
    SEARCH_FIELDS
        .iter()
        .filter_map(|field| record.text(*field))
        .any(|value| value.to_lowercase().contains(needle))
}
