// ── Remote lists ──
//
// One generic controller pages, sorts, filters, and deletes rows of any
// `Resource` through a `ResourceFetcher`.

mod controller;
mod state;
mod view;

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::error::TransportError;

pub use controller::{LoadOutcome, RemoteListController};
pub use state::{ListPhase, ListQuery, ListState, SortDirection, SortSpec};

/// Paging metadata returned alongside each page. `page` is 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// One page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// The remote side of a list: fetch one page, delete one row.
pub trait ResourceFetcher: Send + Sync {
    /// Fetch page `page` (1-based) of `path` with `per_page` rows.
    fn get<T>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<PagedResponse<T>, TransportError>> + Send
    where
        T: DeserializeOwned + Send + 'static;

    fn delete(&self, path: &str) -> impl Future<Output = Result<(), TransportError>> + Send;
}
