use log::{debug, info};
use serde::Deserialize;

use super::{DRIVE_READONLY_SCOPE, GoogleClient, SHEETS_READONLY_SCOPE, read_json};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::listing::SpreadsheetInfo;

pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

const LIST_FIELDS: &str = "nextPageToken, files(id, name)";
const PAGE_SIZE: &str = "1000";

// <https://developers.google.com/drive/api/reference/rest/v3/files/list>
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: Option<String>,
    name: Option<String>,
}

/// Drive search query selecting the spreadsheets directly inside a folder.
pub fn folder_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "'{}' in parents and mimeType='{}'",
        escaped, SPREADSHEET_MIME_TYPE
    )
}

/// List the spreadsheets in a Drive folder
///
/// Requests only the `id` and `name` fields and follows pagination until the
/// listing is exhausted. Results come back in Drive's `name desc` order; date
/// ordering is done by [`crate::listing::sort_newest_first`].
///
/// # Arguments
/// * `client` - Google client to issue requests with
/// * `credentials` - Service account used for the bearer token
/// * `folder_id` - Drive folder to list
///
/// # Returns
/// * `Result<Vec<SpreadsheetInfo>>` - Every spreadsheet in the folder, or the
///   token/transport/API error with its detail message
pub async fn list_spreadsheets(
    client: &GoogleClient,
    credentials: &Credentials,
    folder_id: &str,
) -> Result<Vec<SpreadsheetInfo>> {
    let token = client
        .access_token(credentials, &[DRIVE_READONLY_SCOPE, SHEETS_READONLY_SCOPE])
        .await?;

    info!("Fetching spreadsheets from folder: {}", folder_id);
    let url = format!("{}/files", client.endpoints().drive_api);
    let query = folder_query(folder_id);

    let mut spreadsheets = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let mut request = client
            .http()
            .get(&url)
            .bearer_auth(&token.access_token)
            .query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("orderBy", "name desc"),
                ("pageSize", PAGE_SIZE),
            ]);
        if let Some(page) = &page_token {
            request = request.query(&[("pageToken", page.as_str())]);
        }

        let page: FileList = read_json("drive", request.send().await?).await?;
        debug!("Drive page returned {} files", page.files.len());

        spreadsheets.extend(page.files.into_iter().filter_map(|file| {
            let id = file.id?;
            Some(SpreadsheetInfo::new(id, file.name.unwrap_or_default()))
        }));

        match page.next_page_token {
            Some(next) if !next.is_empty() => page_token = Some(next),
            _ => break,
        }
    }

    info!("Found spreadsheets: {}", spreadsheets.len());
    Ok(spreadsheets)
}
