use log::info;
use serde::Deserialize;
use serde_json::Value;

use super::{GoogleClient, SHEETS_READONLY_SCOPE, read_json};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::rows::{RawRow, records_from_values};

// <https://developers.google.com/sheets/api/reference/rest/v4/spreadsheets.values#ValueRange>
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// URL of the values endpoint for one range of one spreadsheet.
pub fn values_url(sheets_api: &str, spreadsheet_id: &str, range: &str) -> String {
    format!(
        "{}/spreadsheets/{}/values/{}",
        sheets_api,
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(range)
    )
}

/// Fetch a spreadsheet range as header-keyed records
///
/// # Arguments
/// * `client` - Google client to issue requests with
/// * `credentials` - Service account used for the bearer token
/// * `spreadsheet_id` - Sheets document id
/// * `range` - A1 notation range, normally [`crate::config::DEFAULT_RANGE`]
///
/// # Returns
/// * `Result<Vec<RawRow>>` - One record per data row
///
/// # Errors
/// * [`crate::error::DashboardError::NotEnoughData`] when the range holds
///   fewer than a header row plus one data row
/// * token, transport and API errors otherwise
pub async fn fetch_rows(
    client: &GoogleClient,
    credentials: &Credentials,
    spreadsheet_id: &str,
    range: &str,
) -> Result<Vec<RawRow>> {
    let token = client
        .access_token(credentials, &[SHEETS_READONLY_SCOPE])
        .await?;

    let url = values_url(&client.endpoints().sheets_api, spreadsheet_id, range);
    let response = client
        .http()
        .get(&url)
        .bearer_auth(&token.access_token)
        .send()
        .await?;
    let range: ValueRange = read_json("sheets", response).await?;

    info!(
        "Spreadsheet {} returned {} rows",
        spreadsheet_id,
        range.values.len()
    );
    records_from_values(&range.values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RANGE;

    #[test]
    fn encodes_path_segments() {
        assert_eq!(
            values_url("https://sheets.example/v4", "abc/def", DEFAULT_RANGE),
            "https://sheets.example/v4/spreadsheets/abc%2Fdef/values/A1%3AZ1000"
        );
    }

    #[test]
    fn missing_values_decode_as_empty() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range":"Sheet1!A1:Z1000","majorDimension":"ROWS"}"#)
                .unwrap();
        assert!(range.values.is_empty());
    }
}
