use serde::{Deserialize, Serialize};
use serde_json::Value;
use indexmap::IndexMap;

use crate::error::{DashboardError, Result};

pub const STORE_NAME_HEADER: &str = "Store Name";
pub const KEYWORD_HEADER: &str = "Keyword";
pub const SCROLL_SUCCESS_HEADER: &str = "scroll (Success)";
pub const ALARM_SUCCESS_HEADER: &str = "alarm (Success)";
pub const SAVE_PLACE_SUCCESS_HEADER: &str = "save_place (Success)";
pub const SAVE_KEEP_SUCCESS_HEADER: &str = "save_keep (Success)";
pub const FEED_SUCCESS_HEADER: &str = "feed (Success)";

/// A data row keyed by the header row of the fetched range.
///
/// Serialized as a flat JSON object (`{"Store Name": "...", ...}`) with the
/// keys in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(IndexMap<String, String>);

impl RawRow {
    pub fn new() -> Self {
        RawRow(IndexMap::new())
    }

    /// Cell value under `header`, or `""` when the header is absent.
    pub fn get(&self, header: &str) -> &str {
        self.0.get(header).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.0.insert(header.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRow(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A row reshaped into the dashboard schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub store_name: String,
    pub keyword: String,
    pub scroll_success: u32,
    pub alarm_success: u32,
    pub save_place_success: u32,
    pub save_keep_success: u32,
    pub feed_success: u32,
}

/// Render a JSON cell as the string a spreadsheet would show.
fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turn a fetched cell range into header-keyed records
///
/// The first row supplies the field names for every following row. Data rows
/// shorter than the header row get `""` for the missing cells; cells beyond
/// the header row are dropped. When a header repeats, the later column wins.
///
/// # Arguments
/// * `values` - Rows of cells as returned by the values API
///
/// # Returns
/// * `Result<Vec<RawRow>>` - One record per data row
///
/// # Errors
/// * [`DashboardError::NotEnoughData`] when there is no data row after the header
pub fn records_from_values(values: &[Vec<Value>]) -> Result<Vec<RawRow>> {
    if values.len() < 2 {
        return Err(DashboardError::NotEnoughData);
    }

    let headers: Vec<String> = values[0].iter().map(cell_to_string).collect();
    let records = values[1..]
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let value = row.get(index).map(cell_to_string).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(records)
}

/// Coerce a success-count cell to an integer
///
/// Anything that is not a plain base-10 non-negative integer (after trimming
/// whitespace) counts as zero: empty cells, text, partial numbers such as
/// `12abc`, decimals, negatives and values that overflow.
///
/// # Examples
/// ```
/// use sheet_dashboard::rows::coerce_count;
///
/// assert_eq!(coerce_count("12"), 12);
/// assert_eq!(coerce_count(" 7 "), 7);
/// assert_eq!(coerce_count(""), 0);
/// assert_eq!(coerce_count("12abc"), 0);
/// ```
pub fn coerce_count(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0)
}

/// First hyphen-separated segment of a composite store name, trimmed.
pub fn store_name(value: &str) -> String {
    value.split('-').next().unwrap_or_default().trim().to_string()
}

/// Reshape one raw record into the dashboard schema. Never fails.
pub fn normalize(row: &RawRow) -> NormalizedRow {
    NormalizedRow {
        store_name: store_name(row.get(STORE_NAME_HEADER)),
        keyword: row.get(KEYWORD_HEADER).to_string(),
        scroll_success: coerce_count(row.get(SCROLL_SUCCESS_HEADER)),
        alarm_success: coerce_count(row.get(ALARM_SUCCESS_HEADER)),
        save_place_success: coerce_count(row.get(SAVE_PLACE_SUCCESS_HEADER)),
        save_keep_success: coerce_count(row.get(SAVE_KEEP_SUCCESS_HEADER)),
        feed_success: coerce_count(row.get(FEED_SUCCESS_HEADER)),
    }
}

pub fn normalize_all(rows: &[RawRow]) -> Vec<NormalizedRow> {
    rows.iter().map(normalize).collect()
}
