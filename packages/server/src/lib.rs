#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web JSON API for the CPS dashboard.
//!
//! Exposes the landing summary, the filterable school list and the
//! per-school detail view under `/api`. Every request performs its own
//! fetch against the configured [`SchoolSource`]; nothing is cached.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error::InternalError, middleware, web};
use cps_dashboard_server_models::ApiError;
use cps_dashboard_source::SchoolSource;
use cps_dashboard_source::config::{ConfigError, SourceConfig};
use cps_dashboard_source::socrata::SocrataSchoolSource;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// Where every request fetches its records from.
    pub source: Arc<dyn SchoolSource>,
    /// Record caps for each view.
    pub config: SourceConfig,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn SchoolSource>, config: SourceConfig) -> Self {
        Self { source, config }
    }

    /// Builds state backed by the live Socrata endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be built.
    pub fn from_config(config: SourceConfig) -> Result<Self, ConfigError> {
        let source = SocrataSchoolSource::new(&config)?;
        Ok(Self::new(Arc::new(source), config))
    }
}

/// Registers the `/api` routes. Shared by [`serve`] and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, HttpResponse::BadRequest().json(ApiError::new(message)))
            .into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary))
            .route("/schools", web::get().to(handlers::schools))
            .route("/schools/{id}", web::get().to(handlers::school)),
    );
}

/// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port = match std::env::var("PORT") {
        Ok(p) => p.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid PORT {p:?}, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };
    (bind_addr, port)
}

/// Serves the API with the given state until the server stops.
///
/// The caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(state: AppState, bind_addr: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(state);

    log::info!(
        "Starting server on {bind_addr}:{port} (source: {})",
        state.source.label()
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// Starts the API server against the live dataset.
///
/// Reads [`SourceConfig`] and the bind address from the environment.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid, the
/// HTTP client cannot be built, or the server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::try_init_custom_env("RUST_LOG").ok();

    let config = SourceConfig::from_env().map_err(std::io::Error::other)?;
    let state = AppState::from_config(config).map_err(std::io::Error::other)?;
    let (bind_addr, port) = bind_from_env();

    serve(state, &bind_addr, port).await
}
