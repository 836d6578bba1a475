//! Data models for FuelRadar.
//!
//! Two families of types live here:
//!
//! - The persisted ride record and its inbound request/response shapes.
//! - The transient, client-facing shapes produced by the normalizers
//!   (fuel price rows, news items, fuel stations).
//!
//! All client-facing field names are camelCase to match the payloads the
//! frontend already consumes.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A persisted ride record.
///
/// Immutable once created. `mileageKmPerLitre` is stored exactly as the
/// caller supplied it and is never derived from distance and fuel server-side;
/// existing clients compute it themselves and expect it echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRecord {
    /// Store-assigned identifier.
    pub id: i64,

    /// When the ride happened (UTC). Server-assigned when the caller omits it.
    pub date: DateTime<Utc>,

    /// Distance covered, in kilometres.
    pub distance_km: f64,

    /// Fuel consumed, in litres.
    pub fuel_used_litres: f64,

    /// Caller-reported mileage, in km per litre.
    pub mileage_km_per_litre: f64,
}

/// Field values for a ride about to be persisted, defaults already applied.
#[derive(Debug, Clone)]
pub struct NewRide {
    pub date: DateTime<Utc>,
    pub distance_km: f64,
    pub fuel_used_litres: f64,
    pub mileage_km_per_litre: f64,
}

/// Request body for both ride-creation routes.
///
/// Every field is optional. Missing numeric fields default to 0, a missing
/// date defaults to the current time at call time. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    /// Ride date as an RFC 3339 timestamp or a bare `YYYY-MM-DD` day.
    #[serde(default)]
    pub date: Option<String>,

    /// Distance in kilometres (default: 0).
    #[serde(default = "default_metric")]
    pub distance: f64,

    /// Fuel used in litres (default: 0).
    #[serde(default = "default_metric")]
    pub fuel_used: f64,

    /// Mileage in km per litre (default: 0).
    #[serde(default = "default_metric")]
    pub mileage: f64,
}

fn default_metric() -> f64 {
    0.0
}

/// Inclusive date range used to filter ride listings.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Query parameters for GET /rides.
///
/// The range filter applies only when both bounds are present.
#[derive(Debug, Deserialize)]
pub struct RidesQuery {
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub to: Option<String>,
}

/// Query parameters for GET /fuel-price.
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    /// District to look up; omitting it returns the full sheet.
    #[serde(default)]
    pub district: Option<String>,
}

/// Query parameters for GET /nearby-bunks. Both coordinates are required;
/// presence is checked in the handler so a miss is rejected before any
/// outbound call.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lng: Option<f64>,
}

/// Response body for POST /rides.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRideResponse {
    pub message: String,
    pub ride: RideRecord,
}

/// One district's fuel prices, parsed from the published sheet.
///
/// Prices come from free-text cells; a malformed cell parses to `NaN`, which
/// serializes as `null` rather than dropping the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelPriceRow {
    pub district: String,
    pub petrol: f64,
    pub diesel: f64,
}

/// A news article shaped for the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
}

/// A fuel station near the queried coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelStation {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Parse a caller-supplied date string.
///
/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` day, which is taken
/// as midnight UTC. Returns `None` for anything else.
pub fn parse_date_param(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let day: NaiveDate = raw.parse().ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}
