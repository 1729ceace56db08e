use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref DATE_TOKEN_REGEX: Regex = Regex::new(r"([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap();
}

/// A spreadsheet document found in the configured Drive folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetInfo {
    /// Opaque Drive file id
    pub id: String,

    /// Display name, usually carrying a `YYYY-MM-DD` token
    pub name: String,
}

impl SpreadsheetInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        SpreadsheetInfo {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Find the leftmost `YYYY-MM-DD` token in a name, as its byte range.
fn find_date_token(name: &str) -> Option<regex::Match<'_>> {
    DATE_TOKEN_REGEX.find(name)
}

/// Extract the date embedded in a file name
///
/// Only the first `YYYY-MM-DD` token is considered. If that token is not a
/// real calendar date (for example `2024-13-40`) the name has no date, even
/// when a later token would parse.
///
/// # Arguments
/// * `name` - File name to inspect
///
/// # Returns
/// * `Option<NaiveDate>` - The parsed date, or `None`
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use sheet_dashboard::listing::extract_date;
///
/// assert_eq!(
///     extract_date("Report 2024-05-01.xlsx"),
///     NaiveDate::from_ymd_opt(2024, 5, 1)
/// );
/// assert_eq!(extract_date("Report 2024-13-40.xlsx"), None);
/// assert_eq!(extract_date("Report.xlsx"), None);
/// ```
pub fn extract_date(name: &str) -> Option<NaiveDate> {
    let token = find_date_token(name)?;
    NaiveDate::parse_from_str(token.as_str(), "%Y-%m-%d").ok()
}

/// Order a listing newest-first by the date in each file name
///
/// Entries without an extractable date are dropped. Entries sharing a date
/// keep their input order.
pub fn sort_newest_first(files: Vec<SpreadsheetInfo>) -> Vec<SpreadsheetInfo> {
    let mut dated: Vec<(NaiveDate, SpreadsheetInfo)> = files
        .into_iter()
        .filter_map(|file| extract_date(&file.name).map(|date| (date, file)))
        .collect();

    // sort_by is stable
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    dated.into_iter().map(|(_, file)| file).collect()
}

/// Label shown in the spreadsheet selector
///
/// Moves the date to the front in `YYYY. MM. DD.` form and keeps the rest of
/// the name. Names without a valid date are returned as-is.
///
/// # Examples
/// ```
/// use sheet_dashboard::listing::display_name;
///
/// assert_eq!(display_name("Daily report 2024-05-01"), "2024. 05. 01. Daily report");
/// assert_eq!(display_name("notes"), "notes");
/// ```
pub fn display_name(name: &str) -> String {
    let Some(token) = find_date_token(name) else {
        return name.to_string();
    };
    let Ok(date) = NaiveDate::parse_from_str(token.as_str(), "%Y-%m-%d") else {
        return name.to_string();
    };

    let rest = format!("{}{}", &name[..token.start()], &name[token.end()..]);
    let rest = rest.trim();
    let formatted = date.format("%Y. %m. %d.").to_string();
    if rest.is_empty() {
        formatted
    } else {
        format!("{} {}", formatted, rest)
    }
}
