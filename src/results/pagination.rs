use crate::query::models::{PaginationState, QueryResult, Row};

impl PaginationState {
    /// Window for `page` (1-based). Pages below 1 are treated as page 1.
    pub fn for_page(page: u64, page_size: u64, total_count: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let window_end = page.saturating_mul(page_size);

        Self {
            page_size,
            total_count,
            start_index: (page - 1) * page_size,
            end_index: window_end.min(total_count) as i64 - 1,
            has_next_page: window_end < total_count,
            has_previous_page: page > 1,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.start_index / self.page_size.max(1) + 1
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size.max(1))
    }

    /// "Showing 41 to 45 of 45 results" style summary of the window.
    pub fn summary(&self) -> String {
        if self.total_count == 0 {
            return "No results".to_string();
        }
        let last = (self.end_index + 1).min(self.total_count as i64).max(0);
        format!(
            "Showing {} to {} of {} results",
            self.start_index + 1,
            last,
            self.total_count
        )
    }
}

/// Pagination of a freshly received top-level result.
///
/// Uses the service-provided descriptor when present, otherwise derives
/// page 1 from `fallback_page_size` and the result total.
pub fn initial_pagination(result: &QueryResult, fallback_page_size: u64) -> PaginationState {
    result
        .pagination
        .unwrap_or_else(|| PaginationState::for_page(1, fallback_page_size, result.total()))
}

/// Merges a fetched page into the previous result.
///
/// `pageSize` and `totalCount` are held from `previous`; every other field
/// except `results` and `pagination` is carried over unchanged.
pub fn reconcile(
    previous: &QueryResult,
    rows: Vec<Row>,
    page: u64,
    fallback_page_size: u64,
) -> QueryResult {
    let current = initial_pagination(previous, fallback_page_size);

    QueryResult {
        results: rows,
        pagination: Some(PaginationState::for_page(
            page,
            current.page_size,
            current.total_count,
        )),
        ..previous.clone()
    }
}
