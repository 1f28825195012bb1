//! Raw Socrata row shape and validation into [`SchoolRecord`].
//!
//! The dataset delivers every column as a string (or occasionally a number
//! or nested object), with blanks and placeholders mixed in. Rows are
//! validated here exactly once so downstream code never re-checks them.

use std::collections::HashSet;

use cps_dashboard_school_models::{Coordinates, SafetyRating, SchoolRecord, SchoolType, Score};
use serde::{Deserialize, Deserializer};

/// Raw record shape from the CPS progress report Socrata API.
#[derive(Debug, Default, Deserialize)]
pub struct RawSchoolRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    school_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name_of_school: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    school_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    long_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    elementary_or_high_school: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    street_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    zip_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    community_area_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    network_manager: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    longitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    safety_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    instruction_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    teachers_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    environment_score: Option<String>,
    #[serde(default, rename = "safety_icon_", deserialize_with = "lenient_string")]
    safety_icon: Option<String>,
    #[serde(default, rename = "link_")]
    link: Option<serde_json::Value>,
}

impl RawSchoolRecord {
    /// Resolves the identifier: `school_id` first, then `id`.
    fn identifier(&self) -> Option<String> {
        [&self.school_id, &self.id]
            .into_iter()
            .find_map(|field| field.clone())
    }

    fn report_url(&self) -> Option<String> {
        match self.link.as_ref()? {
            serde_json::Value::Object(map) => map
                .get("url")
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from),
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    fn into_school(self, id: String) -> SchoolRecord {
        let school_type = self.elementary_or_high_school.as_deref().and_then(|code| {
            code.parse::<SchoolType>()
                .inspect_err(|_| log::debug!("School {id}: unrecognized type code {code:?}"))
                .ok()
        });
        let safety_rating = self.safety_icon.as_deref().and_then(|label| {
            label
                .parse::<SafetyRating>()
                .inspect_err(|_| log::debug!("School {id}: unrecognized safety rating {label:?}"))
                .ok()
        });
        let coordinates = parse_lat_lng_str(self.latitude.as_deref(), self.longitude.as_deref());
        let report_url = self.report_url();

        SchoolRecord {
            name_of_school: self.name_of_school,
            school_name: self.school_name,
            long_name: self.long_name,
            school_type,
            city: self.city,
            street_address: self.street_address,
            zip_code: self.zip_code,
            community_area: self.community_area_name,
            network_manager: self.network_manager,
            phone_number: self.phone_number,
            coordinates,
            safety_score: score(&id, "safety_score", self.safety_score.as_deref()),
            instruction_score: score(&id, "instruction_score", self.instruction_score.as_deref()),
            teachers_score: score(&id, "teachers_score", self.teachers_score.as_deref()),
            environment_score: score(&id, "environment_score", self.environment_score.as_deref()),
            id,
            safety_rating,
            report_url,
        }
    }
}

fn score(id: &str, column: &str, raw: Option<&str>) -> Score {
    let score = Score::from_raw(raw);
    if score.is_invalid() {
        log::debug!(
            "School {id}: non-numeric {column} {:?}",
            raw.unwrap_or_default()
        );
    }
    score
}

/// Validates raw rows into typed records.
///
/// Rows without an identifier are dropped, as are repeats of an identifier
/// already seen (the first occurrence wins). Input order is preserved.
#[must_use]
pub fn normalize_records(raw: Vec<RawSchoolRecord>) -> Vec<SchoolRecord> {
    let total = raw.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut records = Vec::with_capacity(total);

    for row in raw {
        let Some(id) = row.identifier() else {
            log::warn!("Skipping school record without an identifier");
            continue;
        };
        if !seen.insert(id.clone()) {
            log::warn!("Skipping duplicate school record {id}");
            continue;
        }
        records.push(row.into_school(id));
    }

    if records.len() < total {
        log::info!(
            "Validated {} school records from {total} raw rows",
            records.len()
        );
    }

    records
}

/// Parses a JSON array body into validated records.
///
/// # Errors
///
/// Returns the [`serde_json::Error`] if the body is not an array of objects.
pub fn parse_records(body: &str) -> Result<Vec<SchoolRecord>, serde_json::Error> {
    let raw: Vec<RawSchoolRecord> = serde_json::from_str(body)?;
    Ok(normalize_records(raw))
}

/// Parses lat/lng from optional string fields. Returns `None` if either is
/// missing, unparseable, or zero.
#[must_use]
pub fn parse_lat_lng_str(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    if latitude == 0.0 || longitude == 0.0 || !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    Some(Coordinates {
        latitude,
        longitude,
    })
}

/// Accepts a string, number, or boolean column and yields a trimmed,
/// non-empty string. Nulls, blanks and nested values become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
