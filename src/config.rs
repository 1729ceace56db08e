use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_RANGE: &str = "A1:Z1000";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_SHEETS_API: &str = "https://sheets.googleapis.com/v4";

/// Server configuration, read from flags or the environment.
///
/// Environment values that are set but empty count as unset.
#[derive(Parser, Debug, Clone)]
#[command(name = "website", about = "Dashboard over the spreadsheets of a Google Drive folder")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "DASHBOARD_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Service-account email
    #[arg(long, env = "GOOGLE_CLIENT_EMAIL")]
    pub client_email: Option<String>,

    /// Service-account private key (PEM, may be quoted and use literal \n)
    #[arg(long, env = "GOOGLE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Drive folder whose spreadsheets are listed
    #[arg(long, env = "GOOGLE_DRIVE_FOLDER_ID")]
    pub folder_id: Option<String>,

    /// Base URL of a dashboard API to render pages from instead of calling
    /// Google directly
    #[arg(long, env = "DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Path prefix all routes are served under, e.g. /twol
    #[arg(long, env = "DASHBOARD_BASE_PATH", default_value = "")]
    pub base_path: String,

    /// Directory served under /static
    #[arg(long, env = "DASHBOARD_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Cell range read from each spreadsheet
    #[arg(long, env = "DASHBOARD_SHEET_RANGE", default_value = DEFAULT_RANGE)]
    pub range: String,

    #[arg(long, env = "GOOGLE_TOKEN_URI", default_value = DEFAULT_TOKEN_URI)]
    pub token_uri: String,

    #[arg(long, env = "GOOGLE_DRIVE_API", default_value = DEFAULT_DRIVE_API)]
    pub drive_api: String,

    #[arg(long, env = "GOOGLE_SHEETS_API", default_value = DEFAULT_SHEETS_API)]
    pub sheets_api: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            client_email: None,
            private_key: None,
            folder_id: None,
            api_url: None,
            base_path: String::new(),
            static_dir: PathBuf::from("static"),
            range: DEFAULT_RANGE.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            drive_api: DEFAULT_DRIVE_API.to_string(),
            sheets_api: DEFAULT_SHEETS_API.to_string(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn folder_id(&self) -> Option<&str> {
        non_empty(&self.folder_id)
    }

    /// API base URL override without its trailing slash.
    pub fn api_url(&self) -> Option<&str> {
        non_empty(&self.api_url).map(|url| url.trim_end_matches('/'))
    }

    /// Route prefix with a leading slash and no trailing slash; `""` for root.
    pub fn base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}
