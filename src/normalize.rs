//! Normalizers: pure transforms from raw upstream payloads into the stable
//! shapes the client consumes.
//!
//! Nothing here performs I/O. Each function takes a raw payload already
//! fetched by a [`crate::data_sources`] client and filters, maps, or slices
//! it into [`crate::model`] types. Handlers compose a client with its
//! normalizer and serialize the result.

use crate::data_sources::gnews::RawArticle;
use crate::data_sources::overpass::RawElement;
use crate::model::{FuelPriceRow, FuelStation, NewsItem};

/// Keywords an article must mention (in title or description) to survive the
/// news filter.
const FUEL_KEYWORDS: [&str; 10] = [
    "fuel",
    "petrol",
    "diesel",
    "fuel price",
    "petrol price",
    "diesel price",
    "oil price",
    "crude oil",
    "fuel hike",
    "fuel cut",
];

/// Cap on articles returned to the client.
const MAX_NEWS_ITEMS: usize = 5;

/// Placeholder when an article carries no description.
const FALLBACK_DESCRIPTION: &str = "No description available";

/// Label when an article carries no source outlet.
const FALLBACK_SOURCE: &str = "GNews";

/// Placeholder for an unnamed fuel station.
const FALLBACK_STATION_NAME: &str = "Petrol Bunk";

/// Keep fuel-related articles, cap at five, and shape for the client.
///
/// An article survives when its combined title and description,
/// lowercased, contains at least one keyword. Survivors keep their original
/// order. Empty descriptions and missing sources get fixed fallbacks.
/// Idempotent: re-filtering already-filtered output changes nothing.
pub fn filter_fuel_news(articles: Vec<RawArticle>) -> Vec<NewsItem> {
    articles
        .into_iter()
        .filter(|article| {
            let text = format!(
                "{} {}",
                article.title,
                article.description.as_deref().unwrap_or("")
            )
            .to_lowercase();
            FUEL_KEYWORDS.iter().any(|keyword| text.contains(keyword))
        })
        .take(MAX_NEWS_ITEMS)
        .map(|article| NewsItem {
            title: article.title,
            description: article
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            source: article
                .source
                .map(|s| s.name)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| FALLBACK_SOURCE.to_string()),
            url: article.url,
        })
        .collect()
}

/// Parse the price sheet's CSV export into rows.
///
/// The first line is the header and is dropped. Quote characters are
/// stripped, each remaining line splits on commas into
/// `(district, petrol, diesel)`, and the price cells are coerced to numbers.
/// A malformed or missing cell becomes `NaN`; no row is dropped for a parse
/// failure. Blank lines are skipped. Source order is preserved.
pub fn parse_price_sheet(csv: &str) -> Vec<FuelPriceRow> {
    csv.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let cleaned = line.replace('"', "");
            let mut cells = cleaned.split(',');

            let district = cells.next().unwrap_or("").trim().to_string();
            let petrol = parse_price(cells.next());
            let diesel = parse_price(cells.next());

            FuelPriceRow {
                district,
                petrol,
                diesel,
            }
        })
        .collect()
}

fn parse_price(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.trim().parse().ok()).unwrap_or(f64::NAN)
}

/// Look up a district's row, case-insensitively.
///
/// `None` means the district is unknown, which is distinct from an empty
/// sheet and maps to a 404 at the API surface.
pub fn find_district<'a>(rows: &'a [FuelPriceRow], district: &str) -> Option<&'a FuelPriceRow> {
    let wanted = district.to_lowercase();
    rows.iter().find(|row| row.district.to_lowercase() == wanted)
}

/// Flatten raw Overpass elements into fuel stations.
///
/// Coordinates come from the element directly when present, falling back to
/// its `center` sub-object for ways and relations. Elements for which
/// neither source yields both coordinates are dropped. Unnamed stations get
/// a fixed placeholder name.
pub fn flatten_stations(elements: Vec<RawElement>) -> Vec<FuelStation> {
    elements
        .into_iter()
        .filter_map(|element| {
            let center = element.center.as_ref();
            let lat = element.lat.or_else(|| center.and_then(|c| c.lat))?;
            let lng = element.lon.or_else(|| center.and_then(|c| c.lon))?;

            let name = element
                .tags
                .and_then(|tags| tags.name)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| FALLBACK_STATION_NAME.to_string());

            Some(FuelStation { name, lat, lng })
        })
        .collect()
}
