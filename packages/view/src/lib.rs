#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! State containers for the three dashboard views.
//!
//! Each loader performs one fetch and always ends in a terminal
//! [`ViewState`]. Fetch failures are logged here and turned into
//! [`ViewState::Unavailable`]; nothing past this crate sees a
//! [`FetchError`].

use std::sync::Arc;

use cps_dashboard_analytics::{filter_refs, summarize};
use cps_dashboard_analytics_models::{
    DEFAULT_PREVIEW_LEN, FilterCriteria, RankedSchool, RatingFilter, Summary, TOP_SAFETY_LEN,
    TypeFilter,
};
use cps_dashboard_detail::{Resolution, SchoolDetail, resolve_detail};
use cps_dashboard_school_models::SchoolRecord;
use cps_dashboard_source::{FetchError, SchoolSource};
use serde::Serialize;

/// Lifecycle of a single view load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    /// Fetch not yet finished.
    #[default]
    Loading,
    Ready(T),
    /// The requested record does not exist.
    NotFound,
    /// The fetch failed; `reason` is safe to show to a user.
    Unavailable { reason: String },
}

impl<T> ViewState<T> {
    /// The loaded value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            Self::Loading => ViewState::Loading,
            Self::Ready(value) => ViewState::Ready(f(value)),
            Self::NotFound => ViewState::NotFound,
            Self::Unavailable { reason } => ViewState::Unavailable { reason },
        }
    }

    fn unavailable(what: &str, source: &dyn SchoolSource, e: &FetchError) -> Self {
        log::error!("Failed to load {what} from {}: {e}", source.label());
        Self::Unavailable {
            reason: e.to_string(),
        }
    }
}

/// Landing view: summary statistics plus how much of the safety ranking to
/// show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub summary: Summary,
    pub preview_len: usize,
}

impl DashboardView {
    #[must_use]
    pub const fn new(summary: Summary) -> Self {
        Self {
            summary,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }

    /// Returns a copy showing `n` ranked schools, at most [`TOP_SAFETY_LEN`].
    #[must_use]
    pub fn with_preview_len(self, n: usize) -> Self {
        Self {
            preview_len: n.min(TOP_SAFETY_LEN),
            ..self
        }
    }

    #[must_use]
    pub fn preview(&self) -> &[RankedSchool] {
        self.summary.top_safety_preview(self.preview_len)
    }
}

/// List view: the fetched collection and the active criteria.
///
/// Transitions return a new value sharing the same collection; the visible
/// rows are recomputed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    records: Arc<[SchoolRecord]>,
    criteria: FilterCriteria,
}

impl ListView {
    #[must_use]
    pub fn new(records: impl Into<Arc<[SchoolRecord]>>) -> Self {
        Self {
            records: records.into(),
            criteria: FilterCriteria::default(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        Self {
            records: Arc::clone(&self.records),
            criteria,
        }
    }

    #[must_use]
    pub fn with_type(&self, type_filter: TypeFilter) -> Self {
        self.with_criteria(self.criteria.clone().with_type(type_filter))
    }

    #[must_use]
    pub fn with_rating(&self, rating_filter: RatingFilter) -> Self {
        self.with_criteria(self.criteria.clone().with_rating(rating_filter))
    }

    #[must_use]
    pub fn with_search(&self, search_text: impl Into<String>) -> Self {
        self.with_criteria(self.criteria.clone().with_search(search_text))
    }

    /// Records passing the current criteria, in fetch order.
    #[must_use]
    pub fn visible(&self) -> Vec<&SchoolRecord> {
        filter_refs(&self.records, &self.criteria)
    }
}

/// Fetches up to `limit` records and summarizes them.
pub async fn load_dashboard(source: &dyn SchoolSource, limit: u64) -> ViewState<DashboardView> {
    log::info!("Loading dashboard from {} (limit {limit})", source.label());
    match source.fetch_collection(Some(limit)).await {
        Ok(records) => ViewState::Ready(DashboardView::new(summarize(&records))),
        Err(e) => ViewState::unavailable("dashboard", source, &e),
    }
}

/// Fetches up to `limit` records for the list view, with no criteria set.
pub async fn load_list(source: &dyn SchoolSource, limit: u64) -> ViewState<ListView> {
    log::info!("Loading school list from {} (limit {limit})", source.label());
    match source.fetch_collection(Some(limit)).await {
        Ok(records) => ViewState::Ready(ListView::new(records)),
        Err(e) => ViewState::unavailable("school list", source, &e),
    }
}

/// Looks up a single school.
pub async fn load_detail(source: &dyn SchoolSource, id: &str) -> ViewState<SchoolDetail> {
    log::info!("Loading school {id} from {}", source.label());
    match resolve_detail(source, id).await {
        Ok(Resolution::Found(detail)) => ViewState::Ready(*detail),
        Ok(Resolution::NotFound) => ViewState::NotFound,
        Err(e) => ViewState::unavailable("school detail", source, &e),
    }
}
