#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fetch adapter for Chicago Public Schools progress report data.
//!
//! Every view asks a [`SchoolSource`] for records and gets back validated
//! [`SchoolRecord`]s. The production implementation is
//! [`socrata::SocrataSchoolSource`], which talks to the City of Chicago's
//! Socrata Open Data API. [`memory::InMemorySource`] serves a fixed
//! collection for offline use and tests.

pub mod config;
pub mod memory;
pub mod parsing;
pub mod retry;
pub mod socrata;

use async_trait::async_trait;
use cps_dashboard_school_models::SchoolRecord;

/// Broad classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, timeout, or body read interrupted.
    Unreachable,
    /// The server answered with a non-success status code.
    Status,
    /// The body was not a JSON array of objects.
    MalformedPayload,
    /// Local file could not be read.
    Io,
}

/// Errors that can occur while fetching school records.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a usable response.
    #[error("request to {url} failed: {source}")]
    Unreachable {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server returned a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("malformed payload from {origin}: {message}")]
    MalformedPayload {
        /// Request URL or file path the payload came from.
        origin: String,
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error (reading a saved dump).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Unreachable { .. } => FetchErrorKind::Unreachable,
            Self::Status { .. } => FetchErrorKind::Status,
            Self::MalformedPayload { .. } => FetchErrorKind::MalformedPayload,
            Self::Io(_) => FetchErrorKind::Io,
        }
    }
}

/// Trait that all school record providers implement.
///
/// Each call is an independent round trip; implementations must not cache
/// between calls.
#[async_trait]
pub trait SchoolSource: Send + Sync {
    /// Returns a short description of where records come from, for logs.
    fn label(&self) -> &str;

    /// Fetches up to `limit` records (or the provider default when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails or the payload cannot be
    /// decoded.
    async fn fetch_collection(&self, limit: Option<u64>) -> Result<Vec<SchoolRecord>, FetchError>;

    /// Fetches the record whose identifier equals `id`.
    ///
    /// An empty result is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails or the payload cannot be
    /// decoded.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<SchoolRecord>, FetchError>;
}
