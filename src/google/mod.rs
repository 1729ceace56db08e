//! Read-only access to the Google Drive and Sheets REST APIs.

pub mod auth;
pub mod drive;
pub mod sheets;

use log::warn;
use reqwest::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::{Config, DEFAULT_DRIVE_API, DEFAULT_SHEETS_API, DEFAULT_TOKEN_URI};
use crate::credentials::Credentials;
use crate::error::{DashboardError, Result};
use auth::{AccessToken, ServiceAccount};

pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Base URLs of the Google services, overridable for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub token_uri: String,
    pub drive_api: String,
    pub sheets_api: String,
}

impl GoogleEndpoints {
    pub fn from_config(config: &Config) -> Self {
        GoogleEndpoints {
            token_uri: config.token_uri.clone(),
            drive_api: config.drive_api.trim_end_matches('/').to_string(),
            sheets_api: config.sheets_api.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        GoogleEndpoints {
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            drive_api: DEFAULT_DRIVE_API.to_string(),
            sheets_api: DEFAULT_SHEETS_API.to_string(),
        }
    }
}

/// Shared HTTP client plus the endpoints it talks to.
///
/// Cheap to clone; a fresh access token is requested for every operation.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    endpoints: GoogleEndpoints,
}

impl GoogleClient {
    pub fn new(endpoints: GoogleEndpoints) -> Self {
        GoogleClient {
            http: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &GoogleEndpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Exchange the service-account credentials for a bearer token.
    pub async fn access_token(
        &self,
        credentials: &Credentials,
        scopes: &[&str],
    ) -> Result<AccessToken> {
        ServiceAccount::new(credentials)
            .fetch_access_token(&self.http, &self.endpoints.token_uri, &scopes.join(" "))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

/// Decode a successful JSON response, or turn an error status into
/// [`DashboardError::Api`] carrying Google's own error message.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|parsed| parsed.error.message)
        .unwrap_or(body);
    warn!("{} request failed with status {}: {}", service, status, message);

    Err(DashboardError::Api {
        service,
        status: status.as_u16(),
        message,
    })
}
