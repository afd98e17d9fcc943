//! Page arithmetic and navigation over a [`QueryState`].

use super::query::QueryState;

/// Return the number of pages needed for `total` rows. An empty
/// collection still has one (empty) page.
///
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Move the query to `page` if it lies within `1..=total_pages`.
/// Returns true if the page changed.
///
pub fn go_to(query: &mut QueryState, total_pages: usize, page: usize) -> bool {
    if page < 1 || page > total_pages {
        return false;
    }
    query.set_page(page)
}

pub fn next(query: &mut QueryState, total_pages: usize) -> bool {
    let page = query.page() + 1;
    go_to(query, total_pages, page)
}

pub fn prev(query: &mut QueryState, total_pages: usize) -> bool {
    let page = query.page().saturating_sub(1);
    go_to(query, total_pages, page)
}

pub fn first(query: &mut QueryState, total_pages: usize) -> bool {
    go_to(query, total_pages, 1)
}

pub fn last(query: &mut QueryState, total_pages: usize) -> bool {
    go_to(query, total_pages, total_pages)
}

/// Summary of where the cursor sits in the collection.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl PageInfo {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Return the page numbers to show in a pager, with `None` marking a gap.
///
/// Keeps `edge` pages at both ends and `around` pages either side of the
/// current one.
pub fn page_window(total_pages: usize, current: usize, edge: usize, around: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }
    let current = current.clamp(1, total_pages);
    let mut pages = Vec::new();

    let left_end = (1 + edge).min(total_pages + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current.saturating_sub(around));
    let mid_end = (current + around + 1).min(total_pages + 1);
    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(edge) + 1);
    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));

    pages
}
