//! A [`SchoolSource`] backed by a fixed collection.
//!
//! Used for offline runs against a saved Socrata JSON dump and as the
//! source behind view and server tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cps_dashboard_school_models::SchoolRecord;

use crate::parsing::parse_records;
use crate::{FetchError, SchoolSource};

/// Serves records from memory. Each call returns a fresh copy.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    label: String,
    records: Arc<[SchoolRecord]>,
}

impl InMemorySource {
    /// Wraps an already-validated collection.
    #[must_use]
    pub fn new(records: Vec<SchoolRecord>) -> Self {
        Self {
            label: "in-memory".to_string(),
            records: records.into(),
        }
    }

    /// Validates a Socrata JSON array body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MalformedPayload`] if the body is not a JSON
    /// array of objects.
    pub fn from_json_str(body: &str) -> Result<Self, FetchError> {
        let records = parse_records(body).map_err(|e| FetchError::MalformedPayload {
            origin: "inline JSON".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(records))
    }

    /// Loads a JSON dump previously saved from the dataset endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Io`] if the file cannot be read and
    /// [`FetchError::MalformedPayload`] if it does not decode.
    pub fn from_json_file(path: &Path) -> Result<Self, FetchError> {
        let data = std::fs::read_to_string(path)?;
        let records = parse_records(&data).map_err(|e| FetchError::MalformedPayload {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::info!(
            "Loaded {} school records from {}",
            records.len(),
            path.display()
        );
        Ok(Self {
            label: path.display().to_string(),
            records: records.into(),
        })
    }

    /// Whether no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SchoolSource for InMemorySource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch_collection(&self, limit: Option<u64>) -> Result<Vec<SchoolRecord>, FetchError> {
        let take = limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        Ok(self.records.iter().take(take).cloned().collect())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<SchoolRecord>, FetchError> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }
}
