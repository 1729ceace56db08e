use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use handlebars::Handlebars;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::client::ApiClient;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::dashboard::{self, DataSource};
use crate::error::{DashboardError, Result};
use crate::google::{GoogleClient, GoogleEndpoints, drive, sheets};
use crate::listing::{SpreadsheetInfo, sort_newest_first};
use crate::rows::RawRow;
use crate::table::{SortDirection, SortKey};

pub struct AppState {
    config: Config,
    google: GoogleClient,
    api_client: Option<ApiClient>,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let google = GoogleClient::new(GoogleEndpoints::from_config(&config));
        let api_client = config.api_url().map(ApiClient::new);
        Ok(AppState {
            config,
            google,
            api_client,
            templates: dashboard::templates()?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn credentials(&self) -> Result<Credentials> {
        Credentials::from_values(
            self.config.client_email.as_deref(),
            self.config.private_key.as_deref(),
        )
    }

    /// Spreadsheets of the configured folder, newest first, undated ones dropped.
    pub async fn spreadsheets(&self) -> Result<Vec<SpreadsheetInfo>> {
        let folder_id = self
            .config
            .folder_id()
            .ok_or(DashboardError::MissingConfig("GOOGLE_DRIVE_FOLDER_ID"))?;
        let credentials = self.credentials()?;

        let files = drive::list_spreadsheets(&self.google, &credentials, folder_id).await?;
        Ok(sort_newest_first(files))
    }

    /// Header-keyed rows of one spreadsheet.
    pub async fn spreadsheet_rows(&self, spreadsheet_id: &str) -> Result<Vec<RawRow>> {
        if spreadsheet_id.is_empty() {
            return Err(DashboardError::MissingSpreadsheetId);
        }
        let credentials = self.credentials()?;
        sheets::fetch_rows(&self.google, &credentials, spreadsheet_id, &self.config.range).await
    }
}

impl DataSource for AppState {
    async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetInfo>> {
        self.spreadsheets().await
    }

    async fn fetch_rows(&self, spreadsheet_id: &str) -> Result<Vec<RawRow>> {
        self.spreadsheet_rows(spreadsheet_id).await
    }
}

/// JSON error body returned by the API routes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A route failure: the route's generic message plus the underlying cause.
#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    source: DashboardError,
}

impl ApiError {
    pub fn new(context: &'static str, source: DashboardError) -> Self {
        ApiError { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.source.is_client_error() {
            let body = ErrorBody {
                error: self.source.to_string(),
                details: None,
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        error!("{}: {}", self.context, self.source);
        let body = ErrorBody {
            error: self.context.to_string(),
            details: Some(self.source.to_string()),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
struct DataQuery {
    id: Option<String>,
}

#[derive(Deserialize)]
struct PageQuery {
    id: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

/// Build the router with every route, nested under the configured base path.
pub fn router(state: Arc<AppState>) -> Router {
    let base_path = state.config.base_path();
    let routes = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/spreadsheets", get(list_spreadsheets))
        .route("/api/spreadsheet-data", get(spreadsheet_data))
        .nest_service("/static", ServeDir::new(&state.config.static_dir));

    // A nested "/" only answers at the bare prefix; page links use "{base}/".
    let app = if base_path.is_empty() {
        routes
    } else {
        Router::new()
            .route(&format!("{}/", base_path), get(serve_dashboard))
            .nest(&base_path, routes)
    };

    app.with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let bind = config.bind;
    let state = Arc::new(AppState::new(config)?);
    let base_path = state.config.base_path();

    match state.config.folder_id() {
        Some(folder_id) => info!("Folder ID: {}", folder_id),
        None => info!("GOOGLE_DRIVE_FOLDER_ID is not set; listing requests will fail"),
    }
    if let Some(api_url) = state.config.api_url() {
        info!("Dashboard pages read from API at {}", api_url);
    }

    let app = router(state);

    // Start server
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}{}/", listener.local_addr()?, base_path);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_spreadsheets(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<SpreadsheetInfo>>, ApiError> {
    state
        .spreadsheets()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch spreadsheets", e))
}

async fn spreadsheet_data(
    Query(params): Query<DataQuery>,
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<RawRow>>, ApiError> {
    let id = params.id.unwrap_or_default();
    state
        .spreadsheet_rows(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch spreadsheet data", e))
}

async fn serve_dashboard(
    Query(params): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = params.id.as_deref().filter(|id| !id.is_empty());
    let page = match &state.api_client {
        Some(client) => dashboard::load(client, selection).await,
        None => dashboard::load(state.as_ref(), selection).await,
    };

    let sort = params.sort.as_deref().and_then(SortKey::from_strng).map(|key| {
        let direction = params
            .order
            .as_deref()
            .and_then(SortDirection::from_strng)
            .unwrap_or_default();
        (key, direction)
    });

    match dashboard::render(&state.templates, &page, sort, &state.config.base_path()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render dashboard: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
