//! FuelRadar - ride tracking and fuel data backend.
//!
//! # Overview
//!
//! FuelRadar persists vehicle-ride records (date, distance, fuel used,
//! caller-reported mileage) and proxies three external data sources - a news
//! search API, a published fuel price sheet, and an Overpass map query -
//! into the simplified JSON shapes its client app consumes.
//!
//! # API Endpoints
//!
//! - `POST /save-ride` - Persist a ride (legacy response shape)
//! - `POST /rides` - Persist a ride
//! - `GET /rides` - List rides, optionally within a date range
//! - `GET /fuel-news` - Fuel-related headlines
//! - `GET /fuel-price` - District fuel prices
//! - `GET /nearby-bunks` - Fuel stations around a coordinate
//! - `GET /` - Liveness check

use std::env;
use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fuelradar::api::{
    AppState, create_ride, fuel_news, fuel_price, list_rides, nearby_bunks, root, save_ride,
};
use fuelradar::data_sources::{GnewsClient, OverpassClient, PriceSheetClient};
use fuelradar::storage::RideStore;

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 5000;

/// Default database path if not specified via environment variable.
const DEFAULT_DB_PATH: &str = "sqlite:fuelradar.db?mode=rwc";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("fuelradar=info".parse()?))
        .init();

    // Load configuration from environment
    let port: u16 = env::var("FUELRADAR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let db_url = env::var("FUELRADAR_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    let gnews_key = env::var("GNEWS_API_KEY").unwrap_or_default();
    if gnews_key.is_empty() {
        warn!("GNEWS_API_KEY not set; /fuel-news requests will fail upstream");
    }

    info!(port, db_url = %db_url, "Starting FuelRadar backend");

    // Initialize storage with an explicit failure path
    let store = RideStore::connect(&db_url).await?;
    info!("Database initialized");

    // Create application state
    let state = AppState {
        store,
        news: GnewsClient::new(&gnews_key),
        prices: PriceSheetClient::new(),
        overpass: OverpassClient::new(),
    };

    // Build router; the API is consumed by a browser frontend, so CORS is on
    let app = Router::new()
        .route("/", get(root))
        .route("/save-ride", post(save_ride))
        .route("/rides", post(create_ride).get(list_rides))
        .route("/fuel-news", get(fuel_news))
        .route("/fuel-price", get(fuel_price))
        .route("/nearby-bunks", get(nearby_bunks))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "FuelRadar is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
