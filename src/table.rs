use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::rows::NormalizedRow;

/// Column of the dashboard table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    StoreName,
    Keyword,
    ScrollSuccess,
    AlarmSuccess,
    SavePlaceSuccess,
    SaveKeepSuccess,
    FeedSuccess,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_strng(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl SortKey {
    /// Every column, in display order.
    pub const ALL: [SortKey; 7] = [
        SortKey::StoreName,
        SortKey::Keyword,
        SortKey::ScrollSuccess,
        SortKey::AlarmSuccess,
        SortKey::SavePlaceSuccess,
        SortKey::SaveKeepSuccess,
        SortKey::FeedSuccess,
    ];

    pub fn from_strng(name: &str) -> Option<Self> {
        SortKey::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Field name used in query strings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::StoreName => "store_name",
            SortKey::Keyword => "keyword",
            SortKey::ScrollSuccess => "scroll_success",
            SortKey::AlarmSuccess => "alarm_success",
            SortKey::SavePlaceSuccess => "save_place_success",
            SortKey::SaveKeepSuccess => "save_keep_success",
            SortKey::FeedSuccess => "feed_success",
        }
    }

    /// Column heading shown in the table.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::StoreName => "Store Name",
            SortKey::Keyword => "Keyword",
            SortKey::ScrollSuccess => "Scroll Success",
            SortKey::AlarmSuccess => "Alarm Success",
            SortKey::SavePlaceSuccess => "Save Place Success",
            SortKey::SaveKeepSuccess => "Save Keep Success",
            SortKey::FeedSuccess => "Feed Success",
        }
    }

    fn compare(self, a: &NormalizedRow, b: &NormalizedRow) -> Ordering {
        match self {
            SortKey::StoreName => a.store_name.cmp(&b.store_name),
            SortKey::Keyword => a.keyword.cmp(&b.keyword),
            SortKey::ScrollSuccess => a.scroll_success.cmp(&b.scroll_success),
            SortKey::AlarmSuccess => a.alarm_success.cmp(&b.alarm_success),
            SortKey::SavePlaceSuccess => a.save_place_success.cmp(&b.save_place_success),
            SortKey::SaveKeepSuccess => a.save_keep_success.cmp(&b.save_keep_success),
            SortKey::FeedSuccess => a.feed_success.cmp(&b.feed_success),
        }
    }
}

/// Stable sort of table rows by one column.
pub fn sort_rows(rows: &mut [NormalizedRow], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(store: &str, scroll: u32) -> NormalizedRow {
        NormalizedRow {
            store_name: store.to_string(),
            scroll_success: scroll,
            ..Default::default()
        }
    }

    #[test]
    fn parses_column_names() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_strng(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::from_strng("Store Name"), None);
        assert_eq!(SortDirection::from_strng("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_strng("sideways"), None);
    }

    #[test]
    fn sorts_counts_numerically() {
        let mut rows = vec![row("a", 10), row("b", 9), row("c", 100)];
        sort_rows(&mut rows, SortKey::ScrollSuccess, SortDirection::Asc);
        let stores: Vec<&str> = rows.iter().map(|r| r.store_name.as_str()).collect();
        assert_eq!(stores, vec!["b", "a", "c"]);
    }

    #[test]
    fn descending_sort_keeps_ties_in_order() {
        let mut rows = vec![row("first", 5), row("top", 8), row("second", 5)];
        sort_rows(&mut rows, SortKey::ScrollSuccess, SortDirection::Desc);
        let stores: Vec<&str> = rows.iter().map(|r| r.store_name.as_str()).collect();
        assert_eq!(stores, vec!["top", "first", "second"]);
    }

    #[test]
    fn sorts_text_columns() {
        let mut rows = vec![row("Bolt", 0), row("Acme", 0)];
        sort_rows(&mut rows, SortKey::StoreName, SortDirection::Asc);
        assert_eq!(rows[0].store_name, "Acme");
    }
}
