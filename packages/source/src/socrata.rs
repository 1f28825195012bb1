//! Socrata SODA fetcher for the CPS progress report dataset.
//!
//! Issues a single bounded request per call using the `$limit` query
//! parameter, or a column equality filter (`school_id=<id>`) for lookups.
//! Dataset: <https://data.cityofchicago.org/resource/9xs2-f89t>

use async_trait::async_trait;
use cps_dashboard_school_models::SchoolRecord;

use crate::config::{ConfigError, SourceConfig};
use crate::parsing::parse_records;
use crate::retry::{self, RetryPolicy};
use crate::{FetchError, SchoolSource};

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Fetches school records from a Socrata dataset endpoint.
pub struct SocrataSchoolSource {
    client: reqwest::Client,
    api_url: String,
    retry: RetryPolicy,
    default_limit: u64,
}

impl SocrataSchoolSource {
    /// Creates a source from configuration. Every request made by the
    /// returned source is bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            retry: config.retry,
            default_limit: config.list_limit,
        })
    }

    /// Sends one GET with the given query parameters and validates the
    /// response body.
    async fn get_records(&self, query: &[(&str, String)]) -> Result<Vec<SchoolRecord>, FetchError> {
        let body = retry::send_text(&self.retry, &self.api_url, || {
            self.client.get(&self.api_url).query(query)
        })
        .await?;

        parse_records(&body).map_err(|e| {
            let preview = preview(&body);
            log::error!(
                "School payload did not decode.\n  \
                 url: {}\n  \
                 received: {} bytes\n  \
                 parse error: {e}\n  \
                 body preview: {preview}",
                self.api_url,
                body.len(),
            );
            FetchError::MalformedPayload {
                origin: self.api_url.clone(),
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl SchoolSource for SocrataSchoolSource {
    fn label(&self) -> &str {
        &self.api_url
    }

    async fn fetch_collection(&self, limit: Option<u64>) -> Result<Vec<SchoolRecord>, FetchError> {
        let limit = limit.unwrap_or(self.default_limit);
        log::info!("Fetching school records: limit={limit}");

        let records = self.get_records(&[("$limit", limit.to_string())]).await?;

        log::info!("Downloaded {} school records", records.len());
        Ok(records)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<SchoolRecord>, FetchError> {
        log::info!("Fetching school {id}");

        let records = self.get_records(&[("school_id", id.to_string())]).await?;

        if records.len() > 1 {
            log::debug!(
                "Lookup for school {id} matched {} rows, using the first",
                records.len()
            );
        }
        Ok(records.into_iter().next())
    }
}

/// Truncates a body for logging without splitting a UTF-8 character.
fn preview(text: &str) -> String {
    if text.len() <= BODY_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
