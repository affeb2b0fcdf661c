mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use core::DiscoveryEngine;
use routes::discovery::AppState;
use services::{CatalogStore, ReverseGeocodeClient};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration (logging is configured from it, so it comes first)
    let settings = Settings::load().unwrap_or_else(|e| {
        panic!("Configuration error: {}", e);
    });

    // Initialize logging: RUST_LOG overrides the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Care Match discovery service...");
    info!("Configuration loaded successfully");

    // Load the caregiver catalog
    let catalog = Arc::new(
        CatalogStore::load_from_path(&settings.catalog.path).unwrap_or_else(|e| {
            error!("Failed to load catalog from {}: {}", settings.catalog.path, e);
            panic!("Catalog error: {}", e);
        }),
    );

    let known_cities = Arc::new(catalog.city_set());

    info!(
        "Catalog loaded: {} caregivers across {} cities",
        catalog.len(),
        known_cities.len()
    );

    // Initialize the reverse geocoding client
    let geocode = Arc::new(ReverseGeocodeClient::new(
        settings.geocode.base_url.clone(),
        settings.geocode.user_agent.clone(),
        settings.geocode.timeout_secs,
        settings.geocode.cache_size,
        settings.geocode.cache_ttl_secs,
    ));

    info!("Geocode client initialized ({})", settings.geocode.base_url);

    // Initialize the discovery engine with configured weights
    let weights = settings.scoring_weights();
    let engine = DiscoveryEngine::new(weights);

    info!("Discovery engine initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        catalog,
        geocode,
        engine,
        batch_size: settings.discovery.batch_size,
        known_cities,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
