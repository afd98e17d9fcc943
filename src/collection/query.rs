//! Query state for a remote collection.
//!
//! Holds the search text, filters, date range and pagination cursor that
//! drive a list fetch. Pure state, no I/O.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Inclusive date range sent as `startDate`/`endDate`.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Return a range, swapping the bounds if they were given backwards.
    ///
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            DateRange { start, end }
        } else {
            DateRange {
                start: end,
                end: start,
            }
        }
    }
}

/// Date ranges offered when cycling with the date key.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DatePreset {
    #[default]
    AllTime,
    Today,
    Last7Days,
    Last30Days,
    ThisMonth,
}

impl DatePreset {
    pub fn next(self) -> DatePreset {
        match self {
            DatePreset::AllTime => DatePreset::Today,
            DatePreset::Today => DatePreset::Last7Days,
            DatePreset::Last7Days => DatePreset::Last30Days,
            DatePreset::Last30Days => DatePreset::ThisMonth,
            DatePreset::ThisMonth => DatePreset::AllTime,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatePreset::AllTime => "All time",
            DatePreset::Today => "Today",
            DatePreset::Last7Days => "Last 7 days",
            DatePreset::Last30Days => "Last 30 days",
            DatePreset::ThisMonth => "This month",
        }
    }

    /// Return the concrete range relative to `today`, or `None` for all time.
    ///
    pub fn range(self, today: NaiveDate) -> Option<DateRange> {
        match self {
            DatePreset::AllTime => None,
            DatePreset::Today => Some(DateRange::new(today, today)),
            DatePreset::Last7Days => Some(DateRange::new(today - Duration::days(6), today)),
            DatePreset::Last30Days => Some(DateRange::new(today - Duration::days(29), today)),
            DatePreset::ThisMonth => today
                .with_day(1)
                .map(|first| DateRange::new(first, today)),
        }
    }
}

/// Current filter and pagination state of one list screen.
///
/// `page` is always at least 1, and any change to the search text, a
/// filter or the date range puts it back to 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    search: String,
    page: usize,
    page_size: usize,
    filters: BTreeMap<String, String>,
    date_range: Option<DateRange>,
}

impl QueryState {
    /// Return default state for the given page size (clamped to at least 1).
    ///
    pub fn new(page_size: usize) -> Self {
        QueryState {
            search: String::new(),
            page: 1,
            page_size: page_size.max(1),
            filters: BTreeMap::new(),
            date_range: None,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Replace the search text. Returns true if anything changed.
    ///
    pub fn set_search(&mut self, search: &str) -> bool {
        let search = search.trim();
        if self.search == search {
            return false;
        }
        self.search = search.to_owned();
        self.page = 1;
        true
    }

    /// Set a filter value. Returns true if anything changed.
    ///
    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        if self.filter(key) == Some(value) {
            return false;
        }
        self.filters.insert(key.to_owned(), value.to_owned());
        self.page = 1;
        true
    }

    /// Remove a filter. Returns true if it was set.
    ///
    pub fn clear_filter(&mut self, key: &str) -> bool {
        if self.filters.remove(key).is_none() {
            return false;
        }
        self.page = 1;
        true
    }

    /// Remove every filter. Returns true if any was set.
    ///
    pub fn clear_filters(&mut self) -> bool {
        if self.filters.is_empty() {
            return false;
        }
        self.filters.clear();
        self.page = 1;
        true
    }

    /// Set or clear the date range. Returns true if anything changed.
    ///
    pub fn set_date_range(&mut self, date_range: Option<DateRange>) -> bool {
        if self.date_range == date_range {
            return false;
        }
        self.date_range = date_range;
        self.page = 1;
        true
    }

    /// Return true if both states select the same rows, whatever page
    /// each one is on.
    ///
    pub fn same_selection(&self, other: &QueryState) -> bool {
        self.search == other.search
            && self.page_size == other.page_size
            && self.filters == other.filters
            && self.date_range == other.date_range
    }

    /// Move the cursor to the given page. Zero is rejected.
    ///
    pub(crate) fn set_page(&mut self, page: usize) -> bool {
        if page == 0 || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Encode the state as request query parameters.
    ///
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("pageNumber".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            params.push(("search".to_string(), self.search.clone()));
        }
        for (key, value) in self.filters.iter() {
            params.push((key.clone(), value.clone()));
        }
        if let Some(range) = &self.date_range {
            params.push((
                "startDate".to_string(),
                range.start.format("%Y-%m-%d").to_string(),
            ));
            params.push((
                "endDate".to_string(),
                range.end.format("%Y-%m-%d").to_string(),
            ));
        }
        params
    }
}
