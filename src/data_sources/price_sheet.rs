//! Published fuel price sheet client.
//!
//! District fuel prices are maintained in a publicly shared spreadsheet and
//! consumed through its CSV export URL. The fetch is a plain GET returning
//! raw text; parsing into rows happens in [`crate::normalize`].

/// CSV export URL of the published district price sheet.
const SHEET_EXPORT_URL: &str =
    "https://docs.google.com/spreadsheets/d/1WAEvMsj8XvRUs-MR0jLNewUEJcnFRA5ZbvdoXWFJEj0/export?format=csv";

/// Client for fetching the published price sheet.
#[derive(Clone)]
pub struct PriceSheetClient {
    client: reqwest::Client,
    export_url: String,
}

impl Default for PriceSheetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSheetClient {
    /// Create a client pointed at the published sheet.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            export_url: SHEET_EXPORT_URL.to_string(),
        }
    }

    /// Create a client with a custom export URL (for testing).
    pub fn with_export_url(export_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            export_url: export_url.to_string(),
        }
    }

    /// Fetch the sheet's CSV export as raw text.
    pub async fn fetch_csv(&self) -> reqwest::Result<String> {
        let response = self
            .client
            .get(&self.export_url)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}
