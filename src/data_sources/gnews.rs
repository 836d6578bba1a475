//! GNews search API client.
//!
//! GNews exposes a keyword search over worldwide news coverage. FuelRadar
//! issues a single fixed query for fuel-related headlines; the keyword
//! filtering and shaping of the result live in [`crate::normalize`].
//!
//! # API Reference
//!
//! See: <https://gnews.io/docs/v4>
//!
//! Requests are authenticated with a caller-held API token passed as a query
//! parameter.

use serde::{Deserialize, Serialize};

/// Base URL for the GNews API.
const GNEWS_API_BASE: &str = "https://gnews.io/api/v4";

/// Fixed search terms for fuel coverage.
const SEARCH_QUERY: &str = "fuel petrol diesel oil crude";

/// Result cap requested from the API, before local keyword filtering.
const MAX_RESULTS: u32 = 10;

/// Client for querying the GNews search API.
#[derive(Clone)]
pub struct GnewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GnewsClient {
    /// Create a new GNews client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - GNews API token.
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GNEWS_API_BASE.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Search for recent fuel-related articles.
    ///
    /// Issues the fixed query (English, India, capped at 10 results) and
    /// returns the raw article list. Non-2xx responses and undecodable
    /// bodies both surface as errors.
    pub async fn search_fuel_news(&self) -> reqwest::Result<Vec<RawArticle>> {
        let url = format!(
            "{}/search?q={}&lang=en&country=in&max={}&token={}",
            self.base_url,
            urlencoding::encode(SEARCH_QUERY),
            MAX_RESULTS,
            self.api_key
        );

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let data = response.json::<GnewsSearchResponse>().await?;
        Ok(data.articles)
    }
}

/// Top-level GNews search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GnewsSearchResponse {
    /// Total number of matching articles upstream.
    #[serde(default, rename = "totalArticles")]
    pub total_articles: i64,

    /// Returned articles.
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// A single raw article as returned by GNews.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    /// Article headline.
    #[serde(default)]
    pub title: String,

    /// Article summary; may be absent or empty.
    #[serde(default)]
    pub description: Option<String>,

    /// Publishing outlet; may be absent.
    #[serde(default)]
    pub source: Option<ArticleSource>,

    /// Link to the article.
    #[serde(default)]
    pub url: String,
}

/// The outlet that published an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    /// Outlet name.
    #[serde(default)]
    pub name: String,

    /// Outlet homepage.
    #[serde(default)]
    pub url: String,
}
