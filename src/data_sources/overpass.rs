//! Overpass API client.
//!
//! Overpass answers declarative queries over OpenStreetMap data. FuelRadar
//! submits a fixed-template radius search for `amenity=fuel` points around a
//! coordinate; nodes carry coordinates directly, while ways and relations
//! carry a computed `center` sub-object instead (requested via `out center`).
//! Flattening those into a uniform station list lives in
//! [`crate::normalize`].
//!
//! # API Reference
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API>

use serde::{Deserialize, Serialize};

/// Default Overpass interpreter endpoint.
const OVERPASS_API_BASE: &str = "https://overpass-api.de/api/interpreter";

/// Search radius around the queried coordinate, in metres.
const SEARCH_RADIUS_METRES: u32 = 5000;

/// Client for querying the Overpass interpreter.
#[derive(Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for OverpassClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OverpassClient {
    /// Create a client pointed at the public interpreter.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: OVERPASS_API_BASE.to_string(),
        }
    }

    /// Create a client with a custom interpreter URL (for testing).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetch raw fuel-amenity elements around a coordinate.
    ///
    /// The query text is POSTed as a plain-text body, matching what the
    /// interpreter expects.
    pub async fn fuel_stations_around(
        &self,
        lat: f64,
        lng: f64,
    ) -> reqwest::Result<Vec<RawElement>> {
        let query = format!(
            r#"[out:json];
(
  node["amenity"="fuel"](around:{radius},{lat},{lng});
  way["amenity"="fuel"](around:{radius},{lat},{lng});
  relation["amenity"="fuel"](around:{radius},{lat},{lng});
);
out center;"#,
            radius = SEARCH_RADIUS_METRES,
            lat = lat,
            lng = lng,
        );

        let response = self
            .client
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await?
            .error_for_status()?;

        let data = response.json::<OverpassResponse>().await?;
        Ok(data.elements)
    }
}

/// Top-level Overpass response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements (nodes, ways, relations).
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// A single raw OSM element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawElement {
    /// Element kind: "node", "way", or "relation".
    #[serde(default, rename = "type")]
    pub element_type: String,

    /// OSM element id.
    #[serde(default)]
    pub id: i64,

    /// Direct latitude (nodes only).
    #[serde(default)]
    pub lat: Option<f64>,

    /// Direct longitude (nodes only).
    #[serde(default)]
    pub lon: Option<f64>,

    /// Computed centre for ways and relations.
    #[serde(default)]
    pub center: Option<Center>,

    /// Element tags.
    #[serde(default)]
    pub tags: Option<Tags>,
}

/// Computed centre point of a non-point geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,
}

/// The subset of OSM tags FuelRadar reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tags {
    /// Station name, when mapped.
    #[serde(default)]
    pub name: Option<String>,
}
