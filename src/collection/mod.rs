//! Paginated remote collections.
//!
//! This module contains the list machinery shared by every screen:
//! - `QueryState`: search text, filters, date range and page cursor
//! - `Debouncer`: quiet-period filter for typed search input
//! - `pagination`: page count and navigation
//! - `Collection<R>`: one remote collection of rows, tracking the fetch in
//!   flight by sequence number so late responses for older queries are
//!   dropped

mod debounce;
mod page;
pub mod pagination;
mod query;

pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
pub use page::{FetchFailure, PageResult};
pub use pagination::PageInfo;
pub use query::{DatePreset, DateRange, QueryState};

use crate::crm::{decode_page, Column, FilterSpec, Resource, Row};
use log::*;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Per-screen list settings taken from configuration.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListSettings {
    pub page_size: usize,
    pub debounce: Duration,
}

impl Default for ListSettings {
    fn default() -> Self {
        ListSettings {
            page_size: 10,
            debounce: DEFAULT_QUIET_PERIOD,
        }
    }
}

/// Everything the network layer needs to run one fetch.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub resource: Resource,
    pub query: QueryState,
}

/// What the list area should show. Checked in this order.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    Failed(FetchFailure),
    Empty,
    Populated(Vec<Vec<String>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Status {
    Idle,
    Loading,
    Loaded,
    Failed(FetchFailure),
}

/// Object-safe view of a collection, used by the screens and the network
/// layer without knowing the row type.
///
pub trait Listing: Send {
    fn resource(&self) -> Resource;
    fn columns(&self) -> &'static [Column];
    fn filter_specs(&self) -> &'static [FilterSpec];
    fn supports_date_range(&self) -> bool;

    fn query(&self) -> &QueryState;
    fn search_input(&self) -> &str;
    fn is_search_pending(&self) -> bool;
    fn input_search(&mut self, text: String, now: Instant);
    fn tick(&mut self, now: Instant) -> bool;
    fn commit_search(&mut self) -> bool;

    fn set_filter(&mut self, key: &str, value: &str) -> bool;
    fn clear_filter(&mut self, key: &str) -> bool;
    fn clear_filters(&mut self) -> bool;
    fn set_date_range(&mut self, date_range: Option<DateRange>) -> bool;

    fn page_info(&self) -> PageInfo;
    fn go_to(&mut self, page: usize) -> bool;
    fn next_page(&mut self) -> bool;
    fn prev_page(&mut self) -> bool;
    fn first_page(&mut self) -> bool;
    fn last_page(&mut self) -> bool;

    fn clamp_page(&mut self) -> bool;

    fn begin_fetch(&mut self) -> FetchTicket;
    fn complete_raw(&mut self, seq: u64, outcome: Result<PageResult<Value>, FetchFailure>) -> bool;
    fn latest_seq(&self) -> u64;
    fn is_loading(&self) -> bool;
    fn failure(&self) -> Option<&FetchFailure>;
    fn render_state(&self) -> RenderState;
    fn row_cells(&self) -> Vec<Vec<String>>;

    fn selected(&self) -> Option<usize>;
    fn select_next(&mut self);
    fn select_prev(&mut self);

    fn reset(&mut self);
}

/// Row count reported for a query, kept across failed fetches.
#[derive(Clone, Debug, PartialEq, Eq)]
struct PageCount {
    total: usize,
    page_size: usize,
    query: QueryState,
}

impl PageCount {
    fn total_pages(&self) -> usize {
        pagination::total_pages(self.total, self.page_size)
    }
}

/// One remote collection of rows of type `R`.
///
/// Page navigation is bounded by the last count the server reported for
/// the current search, filters and date range. Until a response for a
/// changed query arrives, only page 1 is reachable.
pub struct Collection<R: Row> {
    settings: ListSettings,
    query: QueryState,
    search_input: String,
    debouncer: Debouncer<String>,
    result: Option<PageResult<R>>,
    count: Option<PageCount>,
    in_flight: Option<QueryState>,
    status: Status,
    latest_seq: u64,
    selected: usize,
}

impl<R: Row> Collection<R> {
    pub fn new(settings: ListSettings) -> Self {
        Collection {
            settings,
            query: QueryState::new(settings.page_size),
            search_input: String::new(),
            debouncer: Debouncer::new(settings.debounce),
            result: None,
            count: None,
            in_flight: None,
            status: Status::Idle,
            latest_seq: 0,
            selected: 0,
        }
    }

    /// Apply a typed fetch outcome. Returns false if the response belongs
    /// to a superseded request and was dropped.
    ///
    pub fn complete(&mut self, seq: u64, outcome: Result<PageResult<R>, FetchFailure>) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        let fetched = self.in_flight.take().unwrap_or_else(|| self.query.clone());
        match outcome {
            Ok(page) => {
                self.count = Some(PageCount {
                    total: page.total,
                    page_size: page.page_size,
                    query: fetched,
                });
                self.result = Some(page);
                self.status = Status::Loaded;
            }
            Err(failure) => {
                self.result = None;
                self.status = Status::Failed(failure);
            }
        }
        self.selected = 0;
        true
    }

    fn is_current(&self, seq: u64) -> bool {
        if seq == self.latest_seq {
            return true;
        }
        debug!(
            "Dropping stale response #{} for '{}' (latest is #{}).",
            seq,
            R::RESOURCE.path,
            self.latest_seq
        );
        false
    }

    pub fn items(&self) -> &[R] {
        self.result
            .as_ref()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    fn current_count(&self) -> Option<&PageCount> {
        self.count
            .as_ref()
            .filter(|count| count.query.same_selection(&self.query))
    }

    fn total_pages(&self) -> usize {
        self.current_count()
            .map(PageCount::total_pages)
            .unwrap_or(1)
    }
}

impl<R: Row> Listing for Collection<R> {
    fn resource(&self) -> Resource {
        R::RESOURCE
    }

    fn columns(&self) -> &'static [Column] {
        R::columns()
    }

    fn filter_specs(&self) -> &'static [FilterSpec] {
        R::filters()
    }

    fn supports_date_range(&self) -> bool {
        R::supports_date_range()
    }

    fn query(&self) -> &QueryState {
        &self.query
    }

    fn search_input(&self) -> &str {
        &self.search_input
    }

    fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn input_search(&mut self, text: String, now: Instant) {
        self.search_input = text.clone();
        self.debouncer.push(text, now);
    }

    /// Commit typed search text once it has settled. Returns true if the
    /// query changed.
    ///
    fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => self.query.set_search(&text),
            None => false,
        }
    }

    fn commit_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(text) => self.query.set_search(&text),
            None => false,
        }
    }

    fn set_filter(&mut self, key: &str, value: &str) -> bool {
        self.query.set_filter(key, value)
    }

    fn clear_filter(&mut self, key: &str) -> bool {
        self.query.clear_filter(key)
    }

    fn clear_filters(&mut self) -> bool {
        self.query.clear_filters()
    }

    fn set_date_range(&mut self, date_range: Option<DateRange>) -> bool {
        self.query.set_date_range(date_range)
    }

    fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.query.page(),
            total_pages: self.total_pages(),
            total: self.current_count().map(|count| count.total).unwrap_or(0),
        }
    }

    fn go_to(&mut self, page: usize) -> bool {
        let total_pages = self.total_pages();
        pagination::go_to(&mut self.query, total_pages, page)
    }

    fn next_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        pagination::next(&mut self.query, total_pages)
    }

    fn prev_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        pagination::prev(&mut self.query, total_pages)
    }

    fn first_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        pagination::first(&mut self.query, total_pages)
    }

    fn last_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        pagination::last(&mut self.query, total_pages)
    }

    /// Pull the cursor back to the last page if the server now reports
    /// fewer pages than the cursor points at. Returns true if it moved.
    ///
    fn clamp_page(&mut self) -> bool {
        let total_pages = match self.current_count() {
            Some(count) => count.total_pages(),
            None => return false,
        };
        if self.query.page() <= total_pages {
            return false;
        }
        warn!(
            "Page {} of '{}' no longer exists, moving to page {}.",
            self.query.page(),
            R::RESOURCE.path,
            total_pages
        );
        self.query.set_page(total_pages)
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.status = Status::Loading;
        self.in_flight = Some(self.query.clone());
        FetchTicket {
            seq: self.latest_seq,
            resource: R::RESOURCE,
            query: self.query.clone(),
        }
    }

    fn complete_raw(&mut self, seq: u64, outcome: Result<PageResult<Value>, FetchFailure>) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        let outcome = outcome.and_then(|page| {
            decode_page::<R>(page).map_err(|e| {
                error!("Failed to decode rows from '{}': {}", R::RESOURCE.path, e);
                FetchFailure::from(e)
            })
        });
        self.complete(seq, outcome)
    }

    fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    fn failure(&self) -> Option<&FetchFailure> {
        match &self.status {
            Status::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    fn render_state(&self) -> RenderState {
        match &self.status {
            Status::Idle | Status::Loading => RenderState::Loading,
            Status::Failed(failure) => RenderState::Failed(failure.clone()),
            Status::Loaded if self.items().is_empty() => RenderState::Empty,
            Status::Loaded => RenderState::Populated(self.row_cells()),
        }
    }

    fn row_cells(&self) -> Vec<Vec<String>> {
        self.items().iter().map(Row::cells).collect()
    }

    fn selected(&self) -> Option<usize> {
        if self.items().is_empty() {
            None
        } else {
            Some(self.selected.min(self.items().len() - 1))
        }
    }

    fn select_next(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Discard query state and results. The sequence counter keeps
    /// counting so responses still in flight are dropped.
    ///
    fn reset(&mut self) {
        self.query = QueryState::new(self.settings.page_size);
        self.search_input.clear();
        self.debouncer.cancel();
        self.result = None;
        self.count = None;
        self.in_flight = None;
        self.status = Status::Idle;
        self.selected = 0;
        self.latest_seq += 1;
    }
}
