//! API client tests against a running dashboard server.

#![cfg(feature = "web")]

mod common;

use axum::http::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;

use common::{config_for, fake_google, get_text, spawn};
use sheet_dashboard::DashboardError;
use sheet_dashboard::app::{AppState, router};
use sheet_dashboard::client::ApiClient;
use sheet_dashboard::config::Config;

/// Dashboard server backed by the fake Google endpoints.
async fn spawn_dashboard() -> SocketAddr {
    let google = spawn(fake_google()).await;
    let state = AppState::new(config_for(google)).unwrap();
    spawn(router(Arc::new(state))).await
}

#[tokio::test]
async fn lists_through_api() {
    let server = spawn_dashboard().await;
    let client = ApiClient::new(&format!("http://{}/", server));

    let sheets = client.list_spreadsheets().await.unwrap();
    let ids: Vec<&str> = sheets.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["june", "may", "may-rerun"]);
}

#[tokio::test]
async fn fetches_normalized_rows() {
    let server = spawn_dashboard().await;
    let client = ApiClient::new(&format!("http://{}", server));

    let rows = client.fetch_data("full").await.unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].store_name, "Acme Mart");
    assert_eq!(rows[0].keyword, "shoes");
    assert_eq!(rows[0].scroll_success, 12);
    assert_eq!(rows[0].alarm_success, 0);
    assert_eq!(rows[0].save_keep_success, 0);

    assert_eq!(rows[1].store_name, "Bolt Store");
    assert_eq!(rows[1].alarm_success, 2);
    assert_eq!(rows[1].feed_success, 0);
}

#[tokio::test]
async fn surfaces_api_errors() {
    let server = spawn_dashboard().await;
    let client = ApiClient::new(&format!("http://{}", server));

    match client.fetch_data("header-only").await {
        Err(DashboardError::Remote(message)) => {
            assert_eq!(message, "Not enough data in spreadsheet")
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match client.fetch_data("unknown").await {
        Err(DashboardError::Remote(message)) => assert_eq!(
            message,
            "sheets request failed with status 404: Requested entity was not found."
        ),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn dashboard_renders_from_api_url() {
    let server = spawn_dashboard().await;
    // no Google credentials here: every read goes through the API
    let config = Config {
        api_url: Some(format!("http://{}/", server)),
        ..Default::default()
    };
    let app = router(Arc::new(AppState::new(config).unwrap()));

    let (status, html) = get_text(app, "/?id=full&sort=keyword&order=asc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("2024. 05. 01. Rerun"));

    let bags = html.find("<td>bags</td>").unwrap();
    let hats = html.find("<td>hats</td>").unwrap();
    let shoes = html.find("<td>shoes</td>").unwrap();
    assert!(bags < hats && hats < shoes);
    assert!(!html.contains("error-message"));
}
