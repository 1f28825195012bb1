#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result and criteria types for the dashboard views.
//!
//! [`Summary`] is what the landing view shows. [`FilterCriteria`] is the
//! immutable list-view state; every setter returns a new value.

use std::fmt;
use std::str::FromStr;

use cps_dashboard_school_models::{SafetyRating, SchoolType};
use serde::{Deserialize, Serialize};

/// Length of the computed safety ranking.
pub const TOP_SAFETY_LEN: usize = 10;

/// Length of the computed instruction ranking.
pub const TOP_INSTRUCTION_LEN: usize = 5;

/// How many safety-ranked schools the landing view shows by default.
pub const DEFAULT_PREVIEW_LEN: usize = 5;

/// One entry of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSchool {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// School identifier.
    pub id: String,
    /// Resolved display name.
    pub name: String,
    /// The score the ranking was ordered by.
    pub score: u32,
    /// `score / 20`, capped at 5.
    pub stars: u8,
}

/// Aggregate statistics for one fetched collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of records in the collection.
    pub total_count: usize,
    /// Records whose type is exactly `ES`.
    pub elementary_count: usize,
    /// Records whose type is exactly `HS`.
    pub high_school_count: usize,
    /// Mean safety score, one decimal place; `0.0` when nothing qualifies.
    pub avg_safety: f64,
    /// Mean instruction score, one decimal place; `0.0` when nothing qualifies.
    pub avg_instruction: f64,
    /// Mean teachers score, one decimal place; `0.0` when nothing qualifies.
    pub avg_teachers: f64,
    /// Up to [`TOP_SAFETY_LEN`] schools by descending safety score.
    pub top_safety: Vec<RankedSchool>,
    /// Up to [`TOP_INSTRUCTION_LEN`] schools by descending instruction score.
    pub top_instruction: Vec<RankedSchool>,
}

impl Summary {
    /// The first `n` entries of the safety ranking (fewer if the ranking is
    /// shorter).
    #[must_use]
    pub fn top_safety_preview(&self, n: usize) -> &[RankedSchool] {
        &self.top_safety[..n.min(self.top_safety.len())]
    }
}

/// Error returned when a criteria value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaParseError {
    /// Not `ALL`, `ES` or `HS`.
    #[error("invalid school type filter {0:?}: expected ALL, ES or HS")]
    Type(String),
    /// Not `ALL` or a rating label.
    #[error(
        "invalid safety rating filter {0:?}: expected ALL, Very Weak, Weak, Average, Strong or Very Strong"
    )]
    Rating(String),
}

/// School-type criterion. `ESHS` is not selectable, matching the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(SchoolType),
}

impl TypeFilter {
    /// Selectable values, in menu order.
    pub const CHOICES: &[Self] = &[
        Self::All,
        Self::Only(SchoolType::Es),
        Self::Only(SchoolType::Hs),
    ];

    /// Whether `school_type` passes this criterion.
    #[must_use]
    pub fn matches(self, school_type: Option<SchoolType>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => school_type == Some(wanted),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Only(t) => write!(f, "{t}"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = CriteriaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "ES" => Ok(Self::Only(SchoolType::Es)),
            "HS" => Ok(Self::Only(SchoolType::Hs)),
            _ => Err(CriteriaParseError::Type(s.to_string())),
        }
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = CriteriaParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeFilter> for String {
    fn from(value: TypeFilter) -> Self {
        value.to_string()
    }
}

/// Safety-rating criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RatingFilter {
    #[default]
    All,
    Only(SafetyRating),
}

impl RatingFilter {
    /// Whether `rating` passes this criterion.
    #[must_use]
    pub fn matches(self, rating: Option<SafetyRating>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => rating == Some(wanted),
        }
    }
}

impl fmt::Display for RatingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Only(r) => write!(f, "{r}"),
        }
    }
}

impl FromStr for RatingFilter {
    type Err = CriteriaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("ALL") {
            return Ok(Self::All);
        }
        SafetyRating::all()
            .iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(trimmed))
            .map(|r| Self::Only(*r))
            .ok_or_else(|| CriteriaParseError::Rating(s.to_string()))
    }
}

impl TryFrom<String> for RatingFilter {
    type Error = CriteriaParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RatingFilter> for String {
    fn from(value: RatingFilter) -> Self {
        value.to_string()
    }
}

/// The active list-view filters. All criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub type_filter: TypeFilter,
    pub rating_filter: RatingFilter,
    /// Free text; empty means "no search".
    pub search_text: String,
}

impl FilterCriteria {
    /// Returns a copy with a different type criterion.
    #[must_use]
    pub fn with_type(self, type_filter: TypeFilter) -> Self {
        Self {
            type_filter,
            ..self
        }
    }

    /// Returns a copy with a different rating criterion.
    #[must_use]
    pub fn with_rating(self, rating_filter: RatingFilter) -> Self {
        Self {
            rating_filter,
            ..self
        }
    }

    /// Returns a copy with different search text.
    #[must_use]
    pub fn with_search(self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..self
        }
    }

    /// The lowercased search needle, or `None` when the text is empty.
    /// Whitespace is significant.
    #[must_use]
    pub fn search_needle(&self) -> Option<String> {
        (!self.search_text.is_empty()).then(|| self.search_text.to_lowercase())
    }

    /// Whether any criterion narrows the collection.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.type_filter != TypeFilter::All
            || self.rating_filter != RatingFilter::All
            || self.search_needle().is_some()
    }
}
