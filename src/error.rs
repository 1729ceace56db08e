use thiserror::Error;

/// Errors raised while listing, fetching or rendering spreadsheets.
///
/// Cell-level parse failures never show up here: counts that do not parse
/// are coerced to zero by [`crate::rows::coerce_count`].
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Missing required credentials")]
    MissingCredentials,

    #[error("{0} is not set")]
    MissingConfig(&'static str),

    #[error("Spreadsheet ID is required")]
    MissingSpreadsheetId,

    #[error("Not enough data in spreadsheet")]
    NotEnoughData,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Token exchange failed: {0}")]
    Auth(String),

    #[error("{service} request failed with status {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[cfg(feature = "web")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),

    /// Error reported by a remote dashboard API, already reduced to its
    /// `details` (or `error`) string.
    #[error("{0}")]
    Remote(String),
}

impl DashboardError {
    /// Whether the caller can fix the request (HTTP 400) rather than the
    /// server or an upstream service being at fault (HTTP 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingSpreadsheetId | DashboardError::NotEnoughData
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
