#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and filtering over a fetched school collection.
//!
//! Everything here is pure and synchronous: functions take an immutable
//! slice of validated records and return new values. Ordering is always
//! deterministic; rankings use a stable sort so ties keep input order.

pub mod filter;
pub mod summary;

pub use filter::{SEARCH_FIELDS, filter, filter_refs, matches};
pub use summary::{average, stars_for, summarize, top_by};
