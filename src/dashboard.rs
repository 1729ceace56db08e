//! Dashboard page state and rendering.
//!
//! [`DashboardState`] owns everything the page shows (listing, selection,
//! rows, loading flag, error banner) and is only changed through its
//! transition methods. A selection hands out a [`FetchTicket`]; results that
//! arrive with a ticket from an older selection are dropped, so the latest
//! selection always wins.

use log::{error, info};
#[cfg(feature = "web")]
use serde::Serialize;
use std::future::Future;

use crate::error::Result;
use crate::listing::SpreadsheetInfo;
use crate::rows::{NormalizedRow, RawRow, normalize_all};
#[cfg(feature = "web")]
use crate::{
    listing::display_name,
    table::{SortDirection, SortKey, sort_rows},
};

/// Where the dashboard gets its listing and rows from.
pub trait DataSource {
    /// Spreadsheets to offer, newest first.
    fn list_spreadsheets(&self) -> impl Future<Output = Result<Vec<SpreadsheetInfo>>> + Send;

    /// Header-keyed rows of one spreadsheet.
    fn fetch_rows(&self, spreadsheet_id: &str) -> impl Future<Output = Result<Vec<RawRow>>> + Send;
}

/// Identifies the selection a fetch was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    spreadsheets: Vec<SpreadsheetInfo>,
    selected: Option<String>,
    rows: Vec<NormalizedRow>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    /// Initial state: the listing is being fetched.
    pub fn new() -> Self {
        DashboardState {
            spreadsheets: Vec::new(),
            selected: None,
            rows: Vec::new(),
            loading: true,
            error: None,
            generation: 0,
        }
    }

    pub fn spreadsheets(&self) -> &[SpreadsheetInfo] {
        &self.spreadsheets
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_listing(&mut self, spreadsheets: Vec<SpreadsheetInfo>) {
        self.spreadsheets = spreadsheets;
        self.loading = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Change the selection, clearing rows and any error.
    ///
    /// Returns a ticket when a fetch should start. An empty or absent id
    /// clears the selection and starts nothing.
    pub fn select(&mut self, spreadsheet_id: Option<String>) -> Option<FetchTicket> {
        self.generation += 1;
        self.rows.clear();
        self.error = None;
        self.selected = spreadsheet_id.filter(|id| !id.is_empty());

        if self.selected.is_some() {
            self.loading = true;
            Some(FetchTicket(self.generation))
        } else {
            self.loading = false;
            None
        }
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Install fetched rows. Returns `false` if the ticket is stale.
    pub fn set_rows(&mut self, ticket: FetchTicket, rows: Vec<NormalizedRow>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.rows = rows;
        self.loading = false;
        true
    }

    /// Record a failed fetch. Returns `false` if the ticket is stale.
    pub fn fail_fetch(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.set_error(message);
        true
    }
}

/// Build the page state: fetch the listing, then the selected spreadsheet.
pub async fn load<D: DataSource>(source: &D, selection: Option<&str>) -> DashboardState {
    let mut state = DashboardState::new();

    match source.list_spreadsheets().await {
        Ok(spreadsheets) => state.set_listing(spreadsheets),
        Err(e) => {
            error!("Error fetching spreadsheets: {}", e);
            state.set_error(e.to_string());
        }
    }

    if let Some(ticket) = state.select(selection.map(str::to_string)) {
        let id = state.selected().unwrap_or_default().to_string();
        match source.fetch_rows(&id).await {
            Ok(raw) => {
                info!("Loaded {} rows from {}", raw.len(), id);
                state.set_rows(ticket, normalize_all(&raw));
            }
            Err(e) => {
                error!("Error fetching data: {}", e);
                state.fail_fetch(ticket, e.to_string());
            }
        }
    }

    state
}

#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
struct OptionView {
    id: String,
    label: String,
    selected: bool,
}

#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
struct ColumnView {
    label: &'static str,
    href: String,
    active: bool,
    arrow: &'static str,
}

#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
struct PageView<'a> {
    base_path: &'a str,
    options: Vec<OptionView>,
    loading: bool,
    error: Option<&'a str>,
    columns: Vec<ColumnView>,
    rows: Vec<NormalizedRow>,
    has_rows: bool,
    empty_message: &'static str,
}

#[cfg(feature = "web")]
fn column_views(
    base_path: &str,
    selected: Option<&str>,
    sort: Option<(SortKey, SortDirection)>,
) -> Vec<ColumnView> {
    let id = selected
        .map(|id| urlencoding::encode(id).into_owned())
        .unwrap_or_default();
    SortKey::ALL
        .into_iter()
        .map(|key| {
            let current = sort.filter(|(k, _)| *k == key).map(|(_, dir)| dir);
            let active = current.is_some();
            // active column links to the opposite direction
            let (direction, arrow) = match current {
                Some(dir) => (
                    dir.reversed(),
                    if dir == SortDirection::Asc { "▲" } else { "▼" },
                ),
                None => (SortDirection::Asc, ""),
            };
            ColumnView {
                label: key.label(),
                href: format!(
                    "{}/?id={}&sort={}&order={}",
                    base_path,
                    id,
                    key.as_str(),
                    direction.as_str()
                ),
                active,
                arrow,
            }
        })
        .collect()
}

#[cfg(feature = "web")]
fn page_view<'a>(
    state: &'a DashboardState,
    sort: Option<(SortKey, SortDirection)>,
    base_path: &'a str,
) -> PageView<'a> {
    let mut rows = state.rows.clone();
    if let Some((key, direction)) = sort {
        sort_rows(&mut rows, key, direction);
    }

    let options = state
        .spreadsheets
        .iter()
        .map(|sheet| OptionView {
            id: sheet.id.clone(),
            label: display_name(&sheet.name),
            selected: state.selected.as_deref() == Some(sheet.id.as_str()),
        })
        .collect();

    PageView {
        base_path,
        options,
        loading: state.loading,
        error: state.error.as_deref(),
        columns: column_views(base_path, state.selected.as_deref(), sort),
        has_rows: !rows.is_empty(),
        rows,
        empty_message: if state.selected.is_some() {
            "No data available"
        } else {
            "Please select a spreadsheet"
        },
    }
}

#[cfg(feature = "web")]
const DASHBOARD_TEMPLATE: &str = include_str!("./templates/dashboard.hbs");

/// Template registry with the dashboard page registered.
#[cfg(feature = "web")]
pub fn templates() -> Result<handlebars::Handlebars<'static>> {
    let mut registry = handlebars::Handlebars::new();
    registry
        .register_template_string("dashboard", DASHBOARD_TEMPLATE)
        .map_err(|e| crate::error::DashboardError::Template(e.to_string()))?;
    Ok(registry)
}

/// Render the dashboard page
///
/// # Arguments
/// * `registry` - Registry from [`templates`]
/// * `state` - Page state, usually from [`load`]
/// * `sort` - Column and direction to order the table by, if any
/// * `base_path` - Route prefix used in links
///
/// # Returns
/// * `Result<String>` - The HTML page
#[cfg(feature = "web")]
pub fn render(
    registry: &handlebars::Handlebars<'_>,
    state: &DashboardState,
    sort: Option<(SortKey, SortDirection)>,
    base_path: &str,
) -> Result<String> {
    registry
        .render("dashboard", &page_view(state, sort, base_path))
        .map_err(|e| crate::error::DashboardError::Template(e.to_string()))
}
