#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the tourist safety dashboard.
//!
//! Exposes one operator session over a JSON API: the dashboard summary
//! and feeds, alert resolution, the geofence list and map, and the
//! add/edit dialog workflow of the geofence manager. All state lives in
//! memory and is seeded when the server starts.

mod error;
mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use tourist_safety_dashboard::SharedDashboard;
use tourist_safety_geocoder::PlaceResolver;
use tourist_safety_manager::GeofenceManager;

pub use error::ServerError;

/// Shared application state.
pub struct AppState {
    /// Geofence workflow; also the owner of the session's dashboard handle.
    pub manager: Arc<GeofenceManager>,
}

impl AppState {
    #[must_use]
    pub fn new(dashboard: SharedDashboard, resolver: Arc<dyn PlaceResolver>) -> Self {
        Self {
            manager: Arc::new(GeofenceManager::new(dashboard, resolver)),
        }
    }
}

/// Where to listen and which geocoder to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Geocoding service id. `None` picks the highest priority enabled one.
    pub geocoder: Option<String>,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT` and `GEOCODER_PROVIDER`, falling back to
    /// `127.0.0.1:8080` and the default geocoder.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            geocoder: std::env::var("GEOCODER_PROVIDER").ok(),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/geofences", web::get().to(handlers::geofences))
            .route("/geofences/map", web::get().to(handlers::geofences_map))
            .route(
                "/geofences/containing",
                web::get().to(handlers::geofences_containing),
            )
            .route(
                "/geofences/{id}",
                web::delete().to(handlers::delete_geofence),
            )
            .route(
                "/alerts/{id}/resolve",
                web::post().to(handlers::resolve_alert),
            )
            .route("/dialogs", web::post().to(handlers::open_dialog))
            .route("/dialogs/{id}", web::get().to(handlers::get_dialog))
            .route("/dialogs/{id}", web::patch().to(handlers::update_dialog))
            .route("/dialogs/{id}", web::delete().to(handlers::cancel_dialog))
            .route(
                "/dialogs/{id}/search",
                web::post().to(handlers::search_dialog),
            )
            .route("/dialogs/{id}/save", web::post().to(handlers::save_dialog))
            .route("/dialogs/{id}/map", web::get().to(handlers::dialog_map)),
    );
}

/// Starts the tourist safety API server.
///
/// Builds the place resolver, seeds a fresh dashboard session and serves
/// it until shutdown. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Error` if the geocoder cannot be configured, the
/// server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Configuring place resolver...");
    let resolver = tourist_safety_geocoder::resolver_for_service(config.geocoder.as_deref())
        .map_err(std::io::Error::other)?;

    log::info!("Seeding dashboard session...");
    let state = web::Data::new(AppState::new(SharedDashboard::default(), resolver));

    let ServerConfig {
        bind_addr, port, ..
    } = config;
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
