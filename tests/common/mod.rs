//! Fake Google endpoints and helpers shared by the integration tests.

#![allow(dead_code)]

use axum::{
    Form, Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceExt;

use sheet_dashboard::config::Config;

pub const TEST_KEY: &str = include_str!("../fixtures/service_account_key.pem");
pub const CLIENT_EMAIL: &str = "dashboard@example.iam.gserviceaccount.com";
pub const REVOKED_EMAIL: &str = "revoked@example.iam.gserviceaccount.com";
pub const FOLDER_ID: &str = "folder-1";
pub const ACCESS_TOKEN: &str = "test-token";

/// The fixture key the way it usually sits in an environment file: quoted,
/// with literal `\n` escapes.
pub fn escaped_key() -> String {
    format!("\"{}\"", TEST_KEY.replace('\n', "\\n"))
}

fn google_error(status: StatusCode, message: &str) -> Response {
    let body = json!({"error": {"code": status.as_u16(), "message": message, "status": "ERROR"}});
    (status, Json(body)).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", ACCESS_TOKEN))
}

fn claims_issuer(assertion: &str) -> Option<String> {
    use base64::Engine;
    use base64::prelude::BASE64_URL_SAFE_NO_PAD;

    let claims = assertion.split('.').nth(1)?;
    let bytes = BASE64_URL_SAFE_NO_PAD.decode(claims).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims["iss"].as_str().map(str::to_string)
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("grant_type").map(String::as_str)
        != Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "unsupported_grant_type"})))
            .into_response();
    }
    let assertion = form.get("assertion").cloned().unwrap_or_default();
    if assertion.split('.').count() != 3 {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_request"})))
            .into_response();
    }
    if claims_issuer(&assertion).as_deref() == Some(REVOKED_EMAIL) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid JWT Signature."})),
        )
            .into_response();
    }

    Json(json!({"access_token": ACCESS_TOKEN, "expires_in": 3599, "token_type": "Bearer"}))
        .into_response()
}

async fn list_files(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return google_error(StatusCode::UNAUTHORIZED, "Request had invalid authentication credentials.");
    }
    let expected_query = format!(
        "'{}' in parents and mimeType='application/vnd.google-apps.spreadsheet'",
        FOLDER_ID
    );
    if params.get("q") != Some(&expected_query) {
        return google_error(StatusCode::NOT_FOUND, "File not found: folder.");
    }

    match params.get("pageToken").map(String::as_str) {
        None => Json(json!({
            "nextPageToken": "page-2",
            "files": [
                {"id": "may", "name": "Report 2024-05-01"},
                {"id": "invalid", "name": "Report 2024-13-40.xlsx"}
            ]
        }))
        .into_response(),
        Some("page-2") => Json(json!({
            "files": [
                {"id": "june", "name": "Report 2024-06-01"},
                {"id": "undated", "name": "Notes"},
                {"id": "may-rerun", "name": "Rerun 2024-05-01"}
            ]
        }))
        .into_response(),
        Some(_) => google_error(StatusCode::BAD_REQUEST, "Invalid page token."),
    }
}

async fn sheet_values(headers: HeaderMap, Path((id, range)): Path<(String, String)>) -> Response {
    if !authorized(&headers) {
        return google_error(StatusCode::UNAUTHORIZED, "Request had invalid authentication credentials.");
    }
    if range != "A1:Z1000" {
        return google_error(StatusCode::BAD_REQUEST, "Unable to parse range.");
    }

    match id.as_str() {
        "full" => Json(json!({
            "range": "Sheet1!A1:Z1000",
            "majorDimension": "ROWS",
            "values": [
                ["Store Name", "Keyword", "scroll (Success)", "alarm (Success)",
                 "save_place (Success)", "save_keep (Success)", "feed (Success)"],
                ["Acme Mart - East", "shoes", "12", "", "3", "x", "1"],
                ["Bolt Store - West", "hats", "40", "2"],
                ["Corner Shop", "bags", "7", "1", "1", "1", "1"]
            ]
        }))
        .into_response(),
        "header-only" => Json(json!({
            "range": "Sheet1!A1:Z1000",
            "majorDimension": "ROWS",
            "values": [["Store Name", "Keyword"]]
        }))
        .into_response(),
        "blank" => Json(json!({"range": "Sheet1!A1:Z1000", "majorDimension": "ROWS"}))
            .into_response(),
        _ => google_error(StatusCode::NOT_FOUND, "Requested entity was not found."),
    }
}

/// Router standing in for the token, Drive and Sheets endpoints.
pub fn fake_google() -> Router {
    Router::new()
        .route("/token", post(token))
        .route("/drive/v3/files", get(list_files))
        .route("/v4/spreadsheets/:id/values/:range", get(sheet_values))
}

/// Serve a router on an ephemeral local port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Configuration pointing at a fake Google server.
pub fn config_for(google: SocketAddr) -> Config {
    Config {
        client_email: Some(CLIENT_EMAIL.to_string()),
        private_key: Some(escaped_key()),
        folder_id: Some(FOLDER_ID.to_string()),
        token_uri: format!("http://{}/token", google),
        drive_api: format!("http://{}/drive/v3", google),
        sheets_api: format!("http://{}/v4", google),
        ..Default::default()
    }
}

/// Send one GET request through a router, returning status and body text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_text(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}
