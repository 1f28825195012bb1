#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the CPS dashboard.
//!
//! [`init_logger`] sets up `indicatif-log-bridge` so that `log::info!` and
//! friends are suspended while the [`FetchSpinner`] redraws.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::{MultiProgress, ProgressDrawTarget};

/// A spinner shown while a view's single fetch is outstanding.
pub struct FetchSpinner {
    bar: ProgressBar,
}

impl FetchSpinner {
    /// Adds a spinner with `message` to `multi` and starts ticking.
    #[must_use]
    pub fn start(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// Stops the spinner, leaving `message` on screen.
    pub fn finish(&self, message: impl Into<String>) {
        self.bar.finish_with_message(message.into());
    }

    /// Stops the spinner and removes it.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl Drop for FetchSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set (e.g., in tests)

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_finishes() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let spinner = FetchSpinner::start(&multi, "Fetching schools...");
        assert!(!spinner.is_finished());
        spinner.finish("Fetched 3 schools");
        assert!(spinner.is_finished());
    }

    #[test]
    fn logger_can_be_initialized_twice() {
        let _first = init_logger();
        let _second = init_logger();
        log::info!("still logging");
    }
}
