#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-school detail lookup.
//!
//! [`resolve_detail`] asks a [`SchoolSource`] for one record and derives
//! the display-only fields the detail view shows (type label, star rating,
//! per-metric score tiers). A missing school is [`Resolution::NotFound`],
//! which callers must keep apart from a [`FetchError`].

use cps_dashboard_school_models::{Metric, SafetyRating, SchoolRecord, SchoolType, Score};
use cps_dashboard_source::{FetchError, SchoolSource};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder for absent values.
pub const NO_VALUE: &str = "—";

/// Human label for each school type code.
pub const TYPE_LABELS: &[(SchoolType, &str)] = &[
    (SchoolType::Es, "Elementary School"),
    (SchoolType::Hs, "High School"),
    (SchoolType::Eshs, "Elementary & High School"),
];

/// Label used when the type is absent or unrecognized.
pub const TYPE_LABEL_FALLBACK: &str = "Not specified";

/// Star string for each safety rating.
pub const RATING_STARS: &[(SafetyRating, &str)] = &[
    (SafetyRating::VeryWeak, "⭐"),
    (SafetyRating::Weak, "⭐⭐"),
    (SafetyRating::Average, "⭐⭐⭐"),
    (SafetyRating::Strong, "⭐⭐⭐⭐"),
    (SafetyRating::VeryStrong, "⭐⭐⭐⭐⭐"),
];

/// Star string used when the rating is absent.
pub const RATING_STARS_FALLBACK: &str = "N/A";

/// Looks up the label for a school type in [`TYPE_LABELS`].
#[must_use]
pub fn type_label(school_type: Option<SchoolType>) -> &'static str {
    school_type
        .and_then(|t| TYPE_LABELS.iter().find(|(code, _)| *code == t))
        .map_or(TYPE_LABEL_FALLBACK, |(_, label)| label)
}

/// Looks up the star string for a rating in [`RATING_STARS`].
#[must_use]
pub fn rating_stars(rating: Option<SafetyRating>) -> &'static str {
    rating
        .and_then(|r| RATING_STARS.iter().find(|(level, _)| *level == r))
        .map_or(RATING_STARS_FALLBACK, |(_, stars)| stars)
}

/// Display bucket for a score. Classification only; never used to filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreTier {
    /// Below 40, or no usable score
    Poor,
    /// 40–59
    Fair,
    /// 60–79
    Good,
    /// 80 and above
    Excellent,
}

impl ScoreTier {
    /// Buckets a score. A missing or invalid score counts as zero.
    #[must_use]
    pub const fn for_score(score: Option<u32>) -> Self {
        match score {
            Some(80..) => Self::Excellent,
            Some(60..) => Self::Good,
            Some(40..) => Self::Fair,
            _ => Self::Poor,
        }
    }
}

/// `"<n>/100"` for a usable score, [`NO_VALUE`] otherwise.
#[must_use]
pub fn score_display(score: &Score) -> String {
    score
        .value()
        .map_or_else(|| NO_VALUE.to_string(), |v| format!("{v}/100"))
}

/// One metric row of the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDetail {
    pub metric: Metric,
    pub label: String,
    pub score: Option<u32>,
    pub display: String,
    pub tier: ScoreTier,
}

impl MetricDetail {
    fn for_record(record: &SchoolRecord, metric: Metric) -> Self {
        let score = record.score(metric);
        Self {
            metric,
            label: metric.label().to_string(),
            score: score.value(),
            display: score_display(score),
            tier: ScoreTier::for_score(score.value()),
        }
    }
}

/// A school record plus everything derived from it for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDetail {
    pub record: SchoolRecord,
    pub name: String,
    pub type_label: String,
    pub safety_stars: String,
    /// `"<street>, <city>"`, the street alone, or [`NO_VALUE`].
    pub address_line: String,
    pub phone: String,
    pub community: String,
    pub zip_code: String,
    pub network: String,
    /// Safety, instruction, teachers, environment, in that order.
    pub metrics: Vec<MetricDetail>,
}

impl SchoolDetail {
    /// Derives display fields from a record.
    #[must_use]
    pub fn from_record(record: SchoolRecord) -> Self {
        let or_dash = |v: Option<&String>| v.map_or_else(|| NO_VALUE.to_string(), Clone::clone);

        let address_line = match (&record.street_address, &record.city) {
            (Some(street), Some(city)) => format!("{street}, {city}"),
            (Some(street), None) => street.clone(),
            (None, _) => NO_VALUE.to_string(),
        };

        let metrics = Metric::all()
            .iter()
            .map(|m| MetricDetail::for_record(&record, *m))
            .collect();

        Self {
            name: record.display_name(),
            type_label: type_label(record.school_type).to_string(),
            safety_stars: rating_stars(record.safety_rating).to_string(),
            address_line,
            phone: or_dash(record.phone_number.as_ref()),
            community: or_dash(record.community_area.as_ref()),
            zip_code: or_dash(record.zip_code.as_ref()),
            network: or_dash(record.network_manager.as_ref()),
            metrics,
            record,
        }
    }

    /// Returns the row for `metric`.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> Option<&MetricDetail> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Box<SchoolDetail>),
    NotFound,
}

/// Looks up one school and derives its detail view.
///
/// # Errors
///
/// Returns [`FetchError`] if the source fails. An unknown identifier is
/// `Ok(Resolution::NotFound)`.
pub async fn resolve_detail(source: &dyn SchoolSource, id: &str) -> Result<Resolution, FetchError> {
    match source.fetch_by_id(id).await? {
        Some(record) => Ok(Resolution::Found(Box::new(SchoolDetail::from_record(record)))),
        None => {
            log::info!("School {id} not found in {}", source.label());
            Ok(Resolution::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use cps_dashboard_source::FetchErrorKind;
    use cps_dashboard_source::memory::InMemorySource;

    use super::*;

    struct BrokenSource;

    #[async_trait]
    impl SchoolSource for BrokenSource {
        fn label(&self) -> &str {
            "broken"
        }

        async fn fetch_collection(
            &self,
            _limit: Option<u64>,
        ) -> Result<Vec<SchoolRecord>, FetchError> {
            Err(FetchError::Status {
                url: "http://example.invalid".to_string(),
                status: 500,
            })
        }

        async fn fetch_by_id(&self, _id: &str) -> Result<Option<SchoolRecord>, FetchError> {
            Err(FetchError::Status {
                url: "http://example.invalid".to_string(),
                status: 500,
            })
        }
    }

    fn lane_tech() -> SchoolRecord {
        SchoolRecord {
            name_of_school: Some("Lane Technical High School".to_string()),
            school_type: Some(SchoolType::Hs),
            street_address: Some("2501 W Addison St".to_string()),
            city: Some("Chicago".to_string()),
            phone_number: Some("(773) 534-5400".to_string()),
            safety_score: Score::Value(82),
            instruction_score: Score::Value(61),
            teachers_score: Score::Invalid("NDA".to_string()),
            safety_rating: Some(SafetyRating::VeryStrong),
            ..SchoolRecord::new("609718")
        }
    }

    #[tokio::test]
    async fn resolves_known_school() {
        let source = InMemorySource::new(vec![lane_tech()]);

        let Resolution::Found(detail) = resolve_detail(&source, "609718").await.unwrap() else {
            panic!("expected school to be found");
        };

        assert_eq!(detail.name, "Lane Technical High School");
        assert_eq!(detail.type_label, "High School");
        assert_eq!(detail.safety_stars, "⭐⭐⭐⭐⭐");
        assert_eq!(detail.address_line, "2501 W Addison St, Chicago");
        assert_eq!(detail.zip_code, NO_VALUE);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let source = InMemorySource::new(Vec::new());
        assert_eq!(
            resolve_detail(&source, "nonexistent").await.unwrap(),
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn transport_failure_is_an_error_not_not_found() {
        let err = resolve_detail(&BrokenSource, "nonexistent")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::Status);
        assert!(BrokenSource.fetch_collection(None).await.is_err());
    }

    #[test]
    fn metric_rows_follow_tiers() {
        let detail = SchoolDetail::from_record(lane_tech());

        let safety = detail.metric(Metric::Safety).unwrap();
        assert_eq!(safety.display, "82/100");
        assert_eq!(safety.tier, ScoreTier::Excellent);

        let instruction = detail.metric(Metric::Instruction).unwrap();
        assert_eq!(instruction.tier, ScoreTier::Good);

        let teachers = detail.metric(Metric::Teachers).unwrap();
        assert_eq!(teachers.score, None);
        assert_eq!(teachers.display, NO_VALUE);
        assert_eq!(teachers.tier, ScoreTier::Poor);

        assert_eq!(detail.metrics.len(), 4);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(ScoreTier::for_score(Some(80)), ScoreTier::Excellent);
        assert_eq!(ScoreTier::for_score(Some(79)), ScoreTier::Good);
        assert_eq!(ScoreTier::for_score(Some(60)), ScoreTier::Good);
        assert_eq!(ScoreTier::for_score(Some(40)), ScoreTier::Fair);
        assert_eq!(ScoreTier::for_score(Some(39)), ScoreTier::Poor);
        assert_eq!(ScoreTier::for_score(None), ScoreTier::Poor);
    }

    #[test]
    fn type_labels() {
        assert_eq!(type_label(Some(SchoolType::Es)), "Elementary School");
        assert_eq!(type_label(Some(SchoolType::Eshs)), "Elementary & High School");
        assert_eq!(type_label(None), "Not specified");
    }

    #[test]
    fn rating_star_table() {
        assert_eq!(rating_stars(Some(SafetyRating::Average)), "⭐⭐⭐");
        assert_eq!(rating_stars(None), "N/A");
        assert_eq!(RATING_STARS.len(), SafetyRating::all().len());
    }

    #[test]
    fn bare_record_uses_fallbacks() {
        let detail = SchoolDetail::from_record(SchoolRecord::new("400012"));
        assert_eq!(detail.name, "School ID: 400012");
        assert_eq!(detail.address_line, NO_VALUE);
        assert_eq!(detail.type_label, TYPE_LABEL_FALLBACK);
        assert_eq!(detail.safety_stars, RATING_STARS_FALLBACK);
    }
}
