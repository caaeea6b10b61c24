//! Traversal of cursor-paginated results.
//!
//! The first request carries filter, sort and page size. Every following
//! request carries only the `next` cursor of the page before it (and the
//! same page size). Traversal ends at the first page with `hasNext = false`.

use std::collections::HashSet;
use std::future::Future;

use wix_api::types::CursorPage;
use wix_api::{CursorQuery, CursorSearch};

use crate::error::WixError;

/// A request that can be continued from a cursor.
pub trait PagedRequest: Clone {
    /// The request for the page at `cursor`, keeping the page size.
    fn continue_from(&self, cursor: &str) -> Self;
}

impl PagedRequest for CursorQuery {
    fn continue_from(&self, cursor: &str) -> Self {
        self.next_page(cursor)
    }
}

impl PagedRequest for CursorSearch {
    fn continue_from(&self, cursor: &str) -> Self {
        self.next_page(cursor)
    }
}

/// Walks one cursor chain page by page.
///
/// A chain is strictly sequential. Independent chains can be driven
/// concurrently with separate pagers.
pub struct Pager<Q, F> {
    next_request: Option<Q>,
    fetch: F,
    seen_cursors: HashSet<String>,
    pages: usize,
}

impl<Q: PagedRequest, F> Pager<Q, F> {
    /// A pager whose first request is `first`. `fetch` performs one request.
    pub fn new(first: Q, fetch: F) -> Self {
        Self {
            next_request: Some(first),
            fetch,
            seen_cursors: HashSet::new(),
            pages: 0,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn is_done(&self) -> bool {
        self.next_request.is_none()
    }

    /// Fetches the next page. Returns `None` once the chain is exhausted.
    pub async fn next_page<P, Fut>(&mut self) -> Result<Option<Vec<P::Item>>, WixError>
    where
        F: FnMut(Q) -> Fut,
        Fut: Future<Output = Result<P, WixError>>,
        P: CursorPage,
    {
        let Some(request) = self.next_request.take() else {
            return Ok(None);
        };
        let page = match (self.fetch)(request.clone()).await {
            Ok(page) => page,
            Err(err) => {
                // Keep the failed request so the caller can retry this page.
                self.next_request = Some(request);
                return Err(err);
            }
        };
        self.pages += 1;

        let paging = page.paging_metadata();
        if paging.has_next && paging.next_cursor().is_none() {
            tracing::error!(
                "page {} reports more results but carries no next cursor",
                self.pages
            );
            return Err(WixError::Pagination(format!(
                "page {} has hasNext without a next cursor",
                self.pages
            )));
        }
        if let Some(cursor) = paging.next_cursor() {
            if !self.seen_cursors.insert(cursor.to_string()) {
                tracing::error!(
                    "cursor repeated after {} pages, stopping traversal",
                    self.pages
                );
                return Err(WixError::Pagination(format!(
                    "service returned cursor '{}' twice",
                    cursor
                )));
            }
            self.next_request = Some(request.continue_from(cursor));
        }
        Ok(Some(page.into_items()))
    }
}

/// Fetches every page of a cursor chain and returns all items in order.
pub async fn collect_all<Q, F, Fut, P>(first: Q, fetch: F) -> Result<Vec<P::Item>, WixError>
where
    Q: PagedRequest,
    F: FnMut(Q) -> Fut,
    Fut: Future<Output = Result<P, WixError>>,
    P: CursorPage,
{
    let mut pager = Pager::new(first, fetch);
    let mut items = Vec::new();
    while let Some(page) = pager.next_page().await? {
        items.extend(page);
    }
    tracing::debug!("collected {} items over {} pages", items.len(), pager.pages());
    Ok(items)
}
