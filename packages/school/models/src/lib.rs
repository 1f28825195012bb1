#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed school record, rating scale, and score types.
//!
//! Every record fetched from the Chicago Public Schools progress report
//! dataset is validated once into a [`SchoolRecord`]. Downstream crates
//! (aggregation, filtering, detail resolution) only ever see these typed
//! records, never the raw JSON.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// School level as reported by the `elementary_or_high_school` column.
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
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SchoolType {
    /// Elementary school (`ES`)
    Es,
    /// High school (`HS`)
    Hs,
    /// Combined elementary and high school (`ESHS`)
    Eshs,
}

impl SchoolType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Es, Self::Hs, Self::Eshs]
    }
}

/// Five-level safety rating scale (`safety_icon_` column).
///
/// Variants are declared in ascending order, so the derived [`Ord`] follows
/// the scale: `Very Weak` < `Weak` < `Average` < `Strong` < `Very Strong`.
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
pub enum SafetyRating {
    /// Lowest level
    #[serde(rename = "Very Weak")]
    #[strum(serialize = "Very Weak")]
    VeryWeak = 1,
    #[serde(rename = "Weak")]
    #[strum(serialize = "Weak")]
    Weak = 2,
    #[serde(rename = "Average")]
    #[strum(serialize = "Average")]
    Average = 3,
    #[serde(rename = "Strong")]
    #[strum(serialize = "Strong")]
    Strong = 4,
    /// Highest level
    #[serde(rename = "Very Strong")]
    #[strum(serialize = "Very Strong")]
    VeryStrong = 5,
}

impl SafetyRating {
    /// Returns the position on the scale, from 1 (`Very Weak`) to 5
    /// (`Very Strong`).
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// Returns all variants in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::VeryWeak,
            Self::Weak,
            Self::Average,
            Self::Strong,
            Self::VeryStrong,
        ]
    }
}

/// One of the numeric progress-report metrics.
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
pub enum Metric {
    Safety,
    Instruction,
    Teachers,
    Environment,
}

impl Metric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Safety,
            Self::Instruction,
            Self::Teachers,
            Self::Environment,
        ]
    }

    /// Human-readable label (e.g. `"Instruction"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safety => "Safety",
            Self::Instruction => "Instruction",
            Self::Teachers => "Teachers",
            Self::Environment => "Environment",
        }
    }
}

/// A metric value after validation.
///
/// The dataset ships scores as strings, and some rows contain placeholders
/// such as `"NDA"`. Those are kept as [`Score::Invalid`] so they can be
/// excluded from arithmetic without being confused with a real zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Score {
    /// Column absent, null, or blank.
    #[default]
    Missing,
    /// Column present but not a non-negative integer.
    Invalid(String),
    /// A usable score.
    Value(u32),
}

impl Score {
    /// Validates a raw column value.
    ///
    /// Parsing takes the leading integer of the trimmed string, so `"85"`,
    /// `" 85 "` and `"85.4"` all yield `85`. Blank input is
    /// [`Score::Missing`]; anything without leading digits, negative, or
    /// out of range is [`Score::Invalid`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match parse_leading_integer(trimmed).and_then(|v| u32::try_from(v).ok()) {
            Some(value) => Self::Value(value),
            None => Self::Invalid(raw.to_string()),
        }
    }

    /// Validates an optional raw column value.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.map_or(Self::Missing, Self::parse)
    }

    /// Returns the score if it is usable for arithmetic.
    #[must_use]
    pub const fn value(&self) -> Option<u32> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Missing | Self::Invalid(_) => None,
        }
    }

    /// Whether the column was present but unusable.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// Parses an optional sign followed by at least one ASCII digit, ignoring
/// whatever trails the digits.
fn parse_leading_integer(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// WGS84 position of a school.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Free-text columns that take part in name resolution and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TextField {
    /// `name_of_school`, the primary display name.
    NameOfSchool,
    /// `school_name`, a legacy name column.
    SchoolName,
    /// `long_name`, the long-form official name.
    LongName,
    /// `city`
    City,
}

/// Precedence used to pick a display name. The first non-empty column wins.
pub const DISPLAY_NAME_FIELDS: &[TextField] = &[
    TextField::NameOfSchool,
    TextField::SchoolName,
    TextField::LongName,
];

/// One school from the progress report dataset.
///
/// Records are immutable once validated. Empty strings from the source are
/// normalized to `None` before construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    /// Stable identifier (`school_id`). Unique within a fetched collection.
    pub id: String,
    pub name_of_school: Option<String>,
    pub school_name: Option<String>,
    pub long_name: Option<String>,
    pub school_type: Option<SchoolType>,
    pub city: Option<String>,
    pub street_address: Option<String>,
    pub zip_code: Option<String>,
    pub community_area: Option<String>,
    pub network_manager: Option<String>,
    pub phone_number: Option<String>,
    /// Present only when both latitude and longitude parse.
    pub coordinates: Option<Coordinates>,
    pub safety_score: Score,
    pub instruction_score: Score,
    pub teachers_score: Score,
    pub environment_score: Score,
    pub safety_rating: Option<SafetyRating>,
    /// Link to the published progress report.
    pub report_url: Option<String>,
}

impl SchoolRecord {
    /// Creates a record with only an identifier; every other field is absent.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name_of_school: None,
            school_name: None,
            long_name: None,
            school_type: None,
            city: None,
            street_address: None,
            zip_code: None,
            community_area: None,
            network_manager: None,
            phone_number: None,
            coordinates: None,
            safety_score: Score::Missing,
            instruction_score: Score::Missing,
            teachers_score: Score::Missing,
            environment_score: Score::Missing,
            safety_rating: None,
            report_url: None,
        }
    }

    /// Returns the validated score for `metric`.
    #[must_use]
    pub const fn score(&self, metric: Metric) -> &Score {
        match metric {
            Metric::Safety => &self.safety_score,
            Metric::Instruction => &self.instruction_score,
            Metric::Teachers => &self.teachers_score,
            Metric::Environment => &self.environment_score,
        }
    }

    /// Returns the value of a free-text column, skipping blanks.
    #[must_use]
    pub fn text(&self, field: TextField) -> Option<&str> {
        let value = match field {
            TextField::NameOfSchool => self.name_of_school.as_deref(),
            TextField::SchoolName => self.school_name.as_deref(),
            TextField::LongName => self.long_name.as_deref(),
            TextField::City => self.city.as_deref(),
        };
        value.filter(|s| !s.is_empty())
    }

    /// Resolves the name to show for this school.
    ///
    /// Walks [`DISPLAY_NAME_FIELDS`] and falls back to `"School ID: <id>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        DISPLAY_NAME_FIELDS
            .iter()
            .find_map(|field| self.text(*field))
            .map_or_else(|| format!("School ID: {}", self.id), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_parses_plain_integer() {
        assert_eq!(Score::parse("85"), Score::Value(85));
        assert_eq!(Score::parse(" 42 "), Score::Value(42));
        assert_eq!(Score::parse("0"), Score::Value(0));
    }

    #[test]
    fn score_takes_leading_integer() {
        assert_eq!(Score::parse("85.4"), Score::Value(85));
        assert_eq!(Score::parse("70 pts"), Score::Value(70));
    }

    #[test]
    fn score_rejects_garbage_without_coercing_to_zero() {
        assert_eq!(Score::parse("abc"), Score::Invalid("abc".to_string()));
        assert_eq!(Score::parse("NDA"), Score::Invalid("NDA".to_string()));
        assert_eq!(Score::parse("-3"), Score::Invalid("-3".to_string()));
        assert_eq!(Score::parse("abc").value(), None);
    }

    #[test]
    fn blank_score_is_missing() {
        assert_eq!(Score::parse(""), Score::Missing);
        assert_eq!(Score::parse("   "), Score::Missing);
        assert_eq!(Score::from_raw(None), Score::Missing);
        assert!(!Score::Missing.is_invalid());
    }

    #[test]
    fn safety_rating_follows_scale_order() {
        let levels: Vec<u8> = SafetyRating::all().iter().map(|r| r.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5]);
        assert!(SafetyRating::VeryWeak < SafetyRating::Average);
        assert!(SafetyRating::Strong < SafetyRating::VeryStrong);
    }

    #[test]
    fn safety_rating_parses_source_labels() {
        assert_eq!(
            "Very Strong".parse::<SafetyRating>().unwrap(),
            SafetyRating::VeryStrong
        );
        assert_eq!(SafetyRating::VeryWeak.to_string(), "Very Weak");
        assert!("very strong".parse::<SafetyRating>().is_err());
    }

    #[test]
    fn school_type_uses_source_codes() {
        assert_eq!("ESHS".parse::<SchoolType>().unwrap(), SchoolType::Eshs);
        assert_eq!(SchoolType::Hs.to_string(), "HS");
        assert_eq!(
            serde_json::to_string(&SchoolType::Es).unwrap(),
            "\"ES\"".to_string()
        );
    }

    #[test]
    fn display_name_prefers_name_of_school() {
        let record = SchoolRecord {
            name_of_school: Some("Lane Tech HS".to_string()),
            school_name: Some("LANE".to_string()),
            ..SchoolRecord::new("609718")
        };
        assert_eq!(record.display_name(), "Lane Tech HS");
    }

    #[test]
    fn display_name_skips_blank_columns() {
        let record = SchoolRecord {
            name_of_school: Some(String::new()),
            long_name: Some("Lincoln Park Elementary".to_string()),
            ..SchoolRecord::new("1")
        };
        assert_eq!(record.display_name(), "Lincoln Park Elementary");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(SchoolRecord::new("400012").display_name(), "School ID: 400012");
    }

    #[test]
    fn score_lookup_by_metric() {
        let record = SchoolRecord {
            teachers_score: Score::Value(55),
            ..SchoolRecord::new("1")
        };
        assert_eq!(record.score(Metric::Teachers).value(), Some(55));
        assert_eq!(record.score(Metric::Safety), &Score::Missing);
    }
}
