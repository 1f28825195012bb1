#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the CPS dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are kept
//! separate from the validated record types so the API contract can evolve
//! on its own.

use cps_dashboard_analytics_models::{
    CriteriaParseError, FilterCriteria, RankedSchool, RatingFilter, Summary, TypeFilter,
};
use cps_dashboard_school_models::{SafetyRating, SchoolRecord, SchoolType};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Landing dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub total_count: usize,
    pub elementary_count: usize,
    pub high_school_count: usize,
    pub avg_safety: f64,
    pub avg_instruction: f64,
    pub avg_teachers: f64,
    /// The first `preview` entries of the safety ranking.
    pub top_safety: Vec<RankedSchool>,
    pub top_instruction: Vec<RankedSchool>,
}

impl ApiSummary {
    /// Builds the response, keeping only `preview` safety-ranked schools.
    #[must_use]
    pub fn from_summary(summary: &Summary, preview: usize) -> Self {
        Self {
            total_count: summary.total_count,
            elementary_count: summary.elementary_count,
            high_school_count: summary.high_school_count,
            avg_safety: summary.avg_safety,
            avg_instruction: summary.avg_instruction,
            avg_teachers: summary.avg_teachers,
            top_safety: summary.top_safety_preview(preview).to_vec(),
            top_instruction: summary.top_instruction.clone(),
        }
    }
}

/// One row of the school list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSchool {
    pub id: String,
    /// Resolved display name.
    pub name: String,
    pub school_type: Option<SchoolType>,
    pub city: Option<String>,
    pub safety_rating: Option<SafetyRating>,
    pub safety_score: Option<u32>,
    pub instruction_score: Option<u32>,
}

impl From<&SchoolRecord> for ApiSchool {
    fn from(record: &SchoolRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.display_name(),
            school_type: record.school_type,
            city: record.city.clone(),
            safety_rating: record.safety_rating,
            safety_score: record.safety_score.value(),
            instruction_score: record.instruction_score.value(),
        }
    }
}

/// Filtered school list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSchoolList {
    /// The criteria that were applied.
    pub criteria: FilterCriteria,
    /// Records fetched before filtering.
    pub fetched_count: usize,
    /// Rows that passed the criteria.
    pub schools: Vec<ApiSchool>,
}

/// Query parameters for the summary endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQueryParams {
    /// Number of safety-ranked schools to return.
    pub preview: Option<usize>,
}

/// Query parameters for the school list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolQueryParams {
    /// `ALL`, `ES` or `HS`.
    #[serde(rename = "type")]
    pub school_type: Option<String>,
    /// `ALL` or a safety rating label.
    pub rating: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

impl SchoolQueryParams {
    /// Parses the parameters into list criteria. Absent parameters are
    /// inactive.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaParseError`] if `type` or `rating` is not a known
    /// value.
    pub fn criteria(&self) -> Result<FilterCriteria, CriteriaParseError> {
        let type_filter = self
            .school_type
            .as_deref()
            .map_or(Ok(TypeFilter::All), str::parse)?;
        let rating_filter = self
            .rating
            .as_deref()
            .map_or(Ok(RatingFilter::All), str::parse)?;

        Ok(FilterCriteria::default()
            .with_type(type_filter)
            .with_rating(rating_filter)
            .with_search(self.search.clone().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use cps_dashboard_school_models::Score;

    use super::*;

    #[test]
    fn query_params_parse_into_criteria() {
        let params = SchoolQueryParams {
            school_type: Some("hs".to_string()),
            rating: Some("Very Strong".to_string()),
            search: Some("lane".to_string()),
        };

        let criteria = params.criteria().unwrap();

        assert_eq!(criteria.type_filter, TypeFilter::Only(SchoolType::Hs));
        assert_eq!(
            criteria.rating_filter,
            RatingFilter::Only(SafetyRating::VeryStrong)
        );
        assert_eq!(criteria.search_text, "lane");
    }

    #[test]
    fn absent_params_are_inactive() {
        let criteria = SchoolQueryParams::default().criteria().unwrap();
        assert!(!criteria.is_active());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let params = SchoolQueryParams {
            school_type: Some("MS".to_string()),
            ..SchoolQueryParams::default()
        };
        assert!(matches!(
            params.criteria(),
            Err(CriteriaParseError::Type(_))
        ));
    }

    #[test]
    fn list_row_uses_display_name_and_usable_scores() {
        let record = SchoolRecord {
            school_name: Some("Whitney Young".to_string()),
            safety_score: Score::Value(75),
            instruction_score: Score::Invalid("NDA".to_string()),
            ..SchoolRecord::new("609694")
        };

        let row = ApiSchool::from(&record);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["name"], "Whitney Young");
        assert_eq!(json["safetyScore"], 75);
        assert!(json["instructionScore"].is_null());
    }
}
