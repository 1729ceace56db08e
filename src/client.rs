use log::error;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dashboard::DataSource;
use crate::error::{DashboardError, Result};
use crate::listing::SpreadsheetInfo;
use crate::rows::{NormalizedRow, RawRow, normalize_all};

/// Client for the dashboard's own JSON API, reached through a base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Message to surface for an `{error, details?}` body: the details when
/// present and non-empty, the error otherwise.
pub fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let details = body
        .get("details")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty());
    let message = match (details, error.as_str()) {
        (Some(details), _) => details.to_string(),
        (None, Some(error)) => error.to_string(),
        (None, None) => error.to_string(),
    };
    Some(message)
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn spreadsheets_url(&self) -> String {
        format!("{}/api/spreadsheets", self.base_url)
    }

    pub fn spreadsheet_data_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/api/spreadsheet-data?id={}",
            self.base_url,
            urlencoding::encode(spreadsheet_id)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body: Value = self.http.get(url).send().await?.json().await?;
        if let Some(message) = error_message(&body) {
            error!("Request to {} failed: {}", url, message);
            return Err(DashboardError::Remote(message));
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Spreadsheet listing, already ordered newest-first by the server.
    pub async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetInfo>> {
        self.get_json(&self.spreadsheets_url()).await
    }

    /// Raw header-keyed rows of one spreadsheet.
    pub async fn fetch_raw(&self, spreadsheet_id: &str) -> Result<Vec<RawRow>> {
        self.get_json(&self.spreadsheet_data_url(spreadsheet_id))
            .await
    }

    /// Rows of one spreadsheet, coerced into the dashboard schema.
    pub async fn fetch_data(&self, spreadsheet_id: &str) -> Result<Vec<NormalizedRow>> {
        let raw = self.fetch_raw(spreadsheet_id).await?;
        Ok(normalize_all(&raw))
    }
}

impl DataSource for ApiClient {
    async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetInfo>> {
        ApiClient::list_spreadsheets(self).await
    }

    async fn fetch_rows(&self, spreadsheet_id: &str) -> Result<Vec<RawRow>> {
        self.fetch_raw(spreadsheet_id).await
    }
}
