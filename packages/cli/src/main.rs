#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line dashboard for Chicago Public Schools progress reports.
//!
//! Each subcommand is one view (`summary`, `list`, `show`) or the API
//! server (`serve`). With no subcommand an interactive menu opens.
//!
//! Uses `indicatif-log-bridge` (via [`cps_dashboard_cli_utils::init_logger`])
//! so the fetch spinner and log lines never fight for the terminal.

mod commands;
mod interactive;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cps_dashboard_analytics_models::{
    DEFAULT_PREVIEW_LEN, FilterCriteria, RatingFilter, TypeFilter,
};
use cps_dashboard_cli_utils::MultiProgress;
use cps_dashboard_source::SchoolSource;
use cps_dashboard_source::config::{ConfigError, SourceConfig};
use cps_dashboard_source::memory::InMemorySource;
use cps_dashboard_source::socrata::SocrataSchoolSource;
use cps_dashboard_source::FetchError;

#[derive(Parser)]
#[command(
    name = "cps_dashboard",
    about = "Chicago Public Schools progress report dashboard"
)]
struct Cli {
    /// Read records from a saved JSON dump instead of the live endpoint
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Dataset endpoint (overrides `CPS_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Maximum number of records to fetch (overrides `CPS_SUMMARY_LIMIT`
    /// and `CPS_LIST_LIMIT`)
    #[arg(long, global = true)]
    limit: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show counts, averages and top-ranked schools
    Summary {
        /// Number of safety-ranked schools to show (at most 10)
        #[arg(long, default_value_t = DEFAULT_PREVIEW_LEN)]
        preview: usize,
    },
    /// List schools matching the given filters
    List {
        /// School type: ALL, ES or HS
        #[arg(long = "type", default_value = "ALL")]
        school_type: TypeFilter,
        /// Safety rating: ALL, "Very Weak", Weak, Average, Strong or "Very Strong"
        #[arg(long, default_value = "ALL")]
        rating: RatingFilter,
        /// Case-insensitive text matched against names and city
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one school by its identifier
    Show {
        /// School identifier (e.g., "609718")
        id: String,
    },
    /// Start the JSON API server
    Serve {
        /// Listen address (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Listen port (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("data unavailable: {0}")]
    Unavailable(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything a command needs to load and print a view.
pub struct Context {
    pub multi: MultiProgress,
    pub source: Arc<dyn SchoolSource>,
    pub config: SourceConfig,
    pub json: bool,
}

impl Cli {
    fn source_config(&self) -> Result<SourceConfig, ConfigError> {
        let mut config = SourceConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config.api_url.clone_from(url);
        }
        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err(ConfigError::Invalid {
                    var: "--limit",
                    value: limit.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
            config.summary_limit = limit;
            config.list_limit = limit;
        }
        Ok(config)
    }

    fn source(&self, config: &SourceConfig) -> Result<Arc<dyn SchoolSource>, CliError> {
        Ok(match &self.input {
            Some(path) => {
                let source = InMemorySource::from_json_file(path)?;
                if source.is_empty() {
                    log::warn!("{} holds no school records", path.display());
                }
                Arc::new(source)
            }
            None => Arc::new(SocrataSchoolSource::new(config)?),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = cps_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = cli.source_config()?;
    let source = cli.source(&config)?;
    log::debug!("Using source {}", source.label());

    let ctx = Context {
        multi,
        source,
        config,
        json: cli.json,
    };

    match cli.command {
        Some(Commands::Summary { preview }) => commands::summary(&ctx, preview).await?,
        Some(Commands::List {
            school_type,
            rating,
            search,
        }) => {
            let criteria = FilterCriteria::default()
                .with_type(school_type)
                .with_rating(rating)
                .with_search(search);
            commands::list(&ctx, criteria).await?;
        }
        Some(Commands::Show { id }) => commands::show(&ctx, &id).await?,
        Some(Commands::Serve { bind, port }) => commands::serve(ctx, bind, port).await?,
        None => interactive::run(&ctx).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use cps_dashboard_school_models::{SafetyRating, SchoolType};

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse_into_filters() {
        let cli = Cli::try_parse_from([
            "cps_dashboard",
            "list",
            "--type",
            "es",
            "--rating",
            "Very Strong",
            "--search",
            "park",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        let Some(Commands::List {
            school_type,
            rating,
            search,
        }) = cli.command
        else {
            panic!("expected list command");
        };
        assert_eq!(school_type, TypeFilter::Only(SchoolType::Es));
        assert_eq!(rating, RatingFilter::Only(SafetyRating::VeryStrong));
        assert_eq!(search, "park");
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Cli::try_parse_from(["cps_dashboard", "list", "--type", "ESHS"]).is_err());
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["cps_dashboard", "--input", "dump.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("dump.json")));
    }

    #[test]
    fn zero_limit_is_a_config_error() {
        let cli = Cli::try_parse_from(["cps_dashboard", "summary", "--limit", "0"]).unwrap();
        assert!(matches!(
            cli.source_config(),
            Err(ConfigError::Invalid { var: "--limit", .. })
        ));
    }

    #[test]
    fn limit_overrides_both_views() {
        let cli = Cli::try_parse_from(["cps_dashboard", "summary", "--limit", "25"]).unwrap();
        let config = cli.source_config().unwrap();
        assert_eq!(config.summary_limit, 25);
        assert_eq!(config.list_limit, 25);
    }
}
