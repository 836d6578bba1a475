//! HTTP API handlers for FuelRadar.
//!
//! One handler per route. Each extracts and loosely validates its inputs,
//! calls the ride store or a client + normalizer pair, and shapes the
//! outcome into the fixed response contract:
//!
//! - `POST /save-ride` — persist a ride, legacy `{success, message}` shape
//! - `POST /rides` — persist a ride, `{message, ride}` shape
//! - `GET /rides` — list rides, optionally within an inclusive date range
//! - `GET /fuel-news` — up to five fuel-related headlines
//! - `GET /fuel-price` — one district's prices, or the whole sheet
//! - `GET /nearby-bunks` — fuel stations around a coordinate
//! - `GET /` — plain-text liveness
//!
//! Requests are independent and stateless end-to-end; a failure in one has
//! no effect on any other in flight.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::data_sources::{GnewsClient, OverpassClient, PriceSheetClient};
use crate::error::ApiError;
use crate::model::{
    CreateRideResponse, DateRange, FuelPriceRow, FuelStation, NearbyQuery, NewRide, NewsItem,
    PriceQuery, RideRecord, RideRequest, RidesQuery, parse_date_param,
};
use crate::normalize::{filter_fuel_news, find_district, flatten_stations, parse_price_sheet};
use crate::storage::RideStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: RideStore,
    pub news: GnewsClient,
    pub prices: PriceSheetClient,
    pub overpass: OverpassClient,
}

/// Apply field defaults and persist one ride.
///
/// Shared by both creation routes; only their response adapters differ.
async fn persist_ride(state: &AppState, request: RideRequest) -> Result<RideRecord, ApiError> {
    let date = match request.date {
        Some(raw) => parse_date_param(&raw)
            .ok_or_else(|| ApiError::Validation(format!("Invalid ride date: {raw}")))?,
        None => Utc::now(),
    };

    let ride = NewRide {
        date,
        distance_km: request.distance,
        fuel_used_litres: request.fuel_used,
        mileage_km_per_litre: request.mileage,
    };

    state
        .store
        .insert_ride(&ride)
        .await
        .map_err(|e| ApiError::storage("Unable to save ride", e))
}

/// POST /save-ride - Persist a ride, legacy response shape.
///
/// Accepts arbitrary ride fields and answers `{success, message}`. Unlike
/// every other route, its failure body is `{success:false, error}` - kept as
/// a documented duplicate of `POST /rides` because the client app still
/// calls both.
#[instrument(skip(state, request))]
pub async fn save_ride(
    State(state): State<AppState>,
    Json(request): Json<RideRequest>,
) -> Response {
    match persist_ride(&state, request).await {
        Ok(ride) => {
            info!(ride_id = ride.id, "Ride saved");
            Json(json!({ "success": true, "message": "Ride saved successfully" })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to save ride");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Unable to save ride" })),
            )
                .into_response()
        }
    }
}

/// POST /rides - Persist a ride.
///
/// # Request Body
///
/// ```json
/// {
///     "date": "2025-06-01",
///     "distance": 120,
///     "fuelUsed": 8,
///     "mileage": 15
/// }
/// ```
///
/// All fields are optional: numerics default to 0, the date to now. Mileage
/// is stored as given, never recomputed.
#[instrument(skip(state, request))]
pub async fn create_ride(
    State(state): State<AppState>,
    Json(request): Json<RideRequest>,
) -> Result<Json<CreateRideResponse>, ApiError> {
    let ride = persist_ride(&state, request).await?;

    info!(
        ride_id = ride.id,
        distance_km = ride.distance_km,
        "Ride recorded"
    );

    Ok(Json(CreateRideResponse {
        message: "Ride saved successfully".to_string(),
        ride,
    }))
}

/// GET /rides - List rides, newest first.
///
/// # Query Parameters
///
/// - `from`, `to` (optional): inclusive date bounds, RFC 3339 or `YYYY-MM-DD`.
///   The filter applies only when both are present.
#[instrument(skip(state))]
pub async fn list_rides(
    State(state): State<AppState>,
    Query(query): Query<RidesQuery>,
) -> Result<Json<Vec<RideRecord>>, ApiError> {
    let range = match (query.from.as_deref(), query.to.as_deref()) {
        (Some(from), Some(to)) => Some(DateRange {
            from: parse_date_param(from)
                .ok_or_else(|| ApiError::Validation(format!("Invalid from date: {from}")))?,
            to: parse_date_param(to)
                .ok_or_else(|| ApiError::Validation(format!("Invalid to date: {to}")))?,
        }),
        _ => None,
    };

    let rides = state
        .store
        .list_rides(range)
        .await
        .map_err(|e| ApiError::storage("Unable to fetch rides", e))?;

    info!(count = rides.len(), filtered = range.is_some(), "Rides listed");
    Ok(Json(rides))
}

/// GET /fuel-news - Up to five fuel-related headlines.
#[instrument(skip(state))]
pub async fn fuel_news(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    let articles = state
        .news
        .search_fuel_news()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch fuel news", e))?;

    let items = filter_fuel_news(articles);

    info!(count = items.len(), "Fuel news fetched");
    Ok(Json(items))
}

/// GET /fuel-price - District fuel prices from the published sheet.
///
/// # Query Parameters
///
/// - `district` (optional): case-insensitive district name. With it, answers
///   that single row or 404; without it, the whole sheet in source order.
#[instrument(skip(state))]
pub async fn fuel_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Response, ApiError> {
    let csv = state
        .prices
        .fetch_csv()
        .await
        .map_err(|e| ApiError::upstream("Unable to fetch fuel price data", e))?;

    let rows = parse_price_sheet(&csv);

    match query.district.as_deref() {
        Some(district) => {
            let row: FuelPriceRow = find_district(&rows, district)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("District not found".to_string()))?;

            info!(district = %row.district, "Fuel price looked up");
            Ok(Json(row).into_response())
        }
        None => {
            info!(count = rows.len(), "Fuel price sheet fetched");
            Ok(Json(rows).into_response())
        }
    }
}

/// GET /nearby-bunks - Fuel stations around a coordinate.
///
/// # Query Parameters
///
/// - `lat`, `lng` (required): centre of the 5 km search. A missing
///   coordinate is rejected with 400 before any outbound call.
#[instrument(skip(state))]
pub async fn nearby_bunks(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<FuelStation>>, ApiError> {
    let (lat, lng) = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(ApiError::Validation(
                "Latitude & Longitude required".to_string(),
            ));
        }
    };

    let elements = state
        .overpass
        .fuel_stations_around(lat, lng)
        .await
        .map_err(|e| ApiError::upstream("Unable to fetch nearby petrol bunks", e))?;

    let stations = flatten_stations(elements);

    info!(count = stations.len(), "Nearby bunks fetched");
    Ok(Json(stations))
}

/// GET / - Plain-text liveness check.
pub async fn root() -> &'static str {
    "FuelRadar backend running"
}
