#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the citizen feedback map.
//!
//! Serves feedback submission and listing, dashboard statistics,
//! per-county aggregates, nearest-county lookup, the department catalog,
//! and the rendered county map as SVG.

mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use feedback_map_source::config::SourceConfig;
use feedback_map_source::loader::MapDataLoader;
use feedback_map_source::mock::MockFeedbackRepository;
use feedback_map_source::{FeedbackRepository, SourceError, boundaries};

/// Shared application state.
pub struct AppState {
    /// Feedback store.
    pub repository: Arc<dyn FeedbackRepository>,
    /// Map data (records, boundaries, aggregation) and its load state.
    pub loader: MapDataLoader,
}

impl AppState {
    /// Builds the state described by `config`. Nothing is loaded yet.
    ///
    /// # Errors
    ///
    /// * If the boundary source cannot be constructed
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        let repository: Arc<dyn FeedbackRepository> =
            Arc::new(MockFeedbackRepository::from_config(config));
        let boundaries = boundaries::from_config(&config.boundaries)?;

        Ok(Self {
            loader: MapDataLoader::new(repository.clone(), boundaries),
            repository,
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/feedback", web::get().to(handlers::list_feedback))
            .route("/feedback", web::post().to(handlers::create_feedback))
            .route("/stats", web::get().to(handlers::stats))
            .route("/counties", web::get().to(handlers::counties))
            .route("/resolve", web::get().to(handlers::resolve))
            .route("/departments", web::get().to(handlers::departments))
            .route(
                "/departments/search",
                web::get().to(handlers::search_departments),
            )
            .route(
                "/departments/stats",
                web::get().to(handlers::department_stats),
            )
            .route("/map.svg", web::get().to(handlers::map_svg))
            .route("/map/reload", web::post().to(handlers::reload_map)),
    );
}

/// Starts the feedback map API server.
///
/// Reads the source configuration from the file named by
/// `FEEDBACK_MAP_CONFIG` (defaults apply if unset), performs the initial
/// map data load, and starts the Actix-Web HTTP server on `BIND_ADDR`
/// and `PORT`. The caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration cannot be
/// read, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let config = match std::env::var("FEEDBACK_MAP_CONFIG") {
        Ok(path) => SourceConfig::load(Path::new(&path)).map_err(std::io::Error::other)?,
        Err(_) => SourceConfig::default(),
    };

    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    log::info!("Loading map data...");
    state.loader.load().await;
    if let Some(e) = state.loader.state().await.error() {
        log::warn!("Initial map data load failed: {e}; POST /api/map/reload to retry");
    }

    let state = web::Data::new(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

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
