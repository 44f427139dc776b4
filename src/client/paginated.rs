//! Offset/limit pagination over list endpoints.
//!
//! Every list operation returns a [`Paginator`], a forward-only cursor that
//! fetches one page at a time and only when the consumer asks for an item
//! past the end of the current page. Pages are requested with `limit` and
//! `offset` query parameters; iteration ends when the server returns an
//! empty page or the caller's overall limit has been reached.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::Stream;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::http::RequestTemplate;
use super::ClientInner;
use crate::{Error, Result};

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page most list endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Caller-facing options for a list operation.
///
/// # Example
///
/// ```
/// use domo_rs::ListOptions;
///
/// // Skip the first 10 records, then take 120 in pages of 25.
/// let options = ListOptions::default().page_size(25).offset(10).limit(120);
/// assert_eq!(options.limit, Some(120));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Records requested per page
    pub page_size: u32,
    /// Offset of the first record
    pub offset: u64,
    /// Overall cap on records yielded; `None` reads until the server runs out
    pub limit: Option<u64>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
            limit: None,
        }
    }
}

impl ListOptions {
    /// Set the page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the starting offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Cap the total number of records yielded.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Limit and offset of the next page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageRequest {
    pub(crate) limit: u64,
    pub(crate) offset: u64,
}

/// Pure pagination state, separated from I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageCursor {
    page_size: u64,
    offset: u64,
    remaining: Option<u64>,
    done: bool,
}

impl PageCursor {
    pub(crate) fn new(page_size: u32, offset: u64, limit: Option<u64>) -> Self {
        Self {
            page_size: u64::from(page_size),
            offset,
            remaining: limit,
            done: limit == Some(0),
        }
    }

    /// The next page to request, or `None` once iteration is over.
    ///
    /// With a limit in place the last page is sized to exactly the
    /// remaining count.
    pub(crate) fn next_request(&self) -> Option<PageRequest> {
        if self.done {
            return None;
        }
        let limit = match self.remaining {
            Some(remaining) => self.page_size.min(remaining),
            None => self.page_size,
        };
        Some(PageRequest {
            limit,
            offset: self.offset,
        })
    }

    /// Record a received page and return how many of its records to keep.
    pub(crate) fn record_page(&mut self, received: usize) -> usize {
        if received == 0 {
            self.done = true;
            return 0;
        }

        let mut keep = received as u64;
        if let Some(remaining) = self.remaining.as_mut() {
            keep = keep.min(*remaining);
            *remaining -= keep;
            if *remaining == 0 {
                self.done = true;
            }
        }
        self.offset += keep;
        keep as usize
    }

    pub(crate) fn finish(&mut self) {
        self.done = true;
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }
}

/// Check a requested page size against an endpoint's maximum.
pub(crate) fn validate_page_size(page_size: u32, max_page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > max_page_size {
        return Err(Error::Validation(format!(
            "page size must be between 1 and {max_page_size}, got {page_size}"
        )));
    }
    Ok(())
}

/// A lazy cursor over the records of a list endpoint.
///
/// A paginator is not restartable: calling the list operation again issues
/// fresh requests from the starting offset.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{DomoClient, ListOptions};
///
/// # async fn example(client: DomoClient) -> domo_rs::Result<()> {
/// let mut users = client.users().list(ListOptions::default().limit(10))?;
///
/// while let Some(page) = users.next_page().await? {
///     println!("fetched {} users", page.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Paginator<T> {
    inner: Arc<ClientInner>,
    path: String,
    resource: &'static str,
    filters: Vec<(String, String)>,
    cursor: PageCursor,
    buffer: VecDeque<T>,
}

impl<T: DeserializeOwned> Paginator<T> {
    /// Yield the next record, fetching a new page if the current one is
    /// used up.
    pub async fn next(&mut self) -> Option<Result<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            match self.fetch().await {
                Ok(Some(page)) => self.buffer.extend(page),
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Return the rest of the current page, or fetch the next one.
    ///
    /// Returns `Ok(None)` once iteration is over.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        if !self.buffer.is_empty() {
            return Ok(Some(self.buffer.drain(..).collect()));
        }
        self.fetch().await
    }

    /// Returns `true` if more records may follow.
    ///
    /// A `true` answer may still be followed by an empty page; only the
    /// server can confirm exhaustion.
    pub fn has_next(&self) -> bool {
        !self.buffer.is_empty() || !self.cursor.is_done()
    }

    /// Drain every remaining record into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(page) = self.next_page().await? {
            records.extend(page);
        }
        Ok(records)
    }

    /// Convert into a [`Stream`] of records.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        futures_util::stream::unfold(self, |mut paginator| async move {
            paginator.next().await.map(|item| (item, paginator))
        })
    }

    async fn fetch(&mut self) -> Result<Option<Vec<T>>> {
        let Some(request) = self.cursor.next_request() else {
            return Ok(None);
        };

        debug!(
            path = %self.path,
            limit = request.limit,
            offset = request.offset,
            "fetching page"
        );

        let template = RequestTemplate::new(Method::GET, self.path.as_str())
            .queries(self.filters.iter().cloned())
            .query("limit", request.limit)
            .query("offset", request.offset);

        let mut page: Vec<T> = match self.load(template).await {
            Ok(page) => page,
            Err(e) => {
                self.cursor.finish();
                return Err(e);
            }
        };

        let keep = self.cursor.record_page(page.len());
        if keep == 0 {
            return Ok(None);
        }
        page.truncate(keep);
        Ok(Some(page))
    }

    async fn load(&self, template: RequestTemplate) -> Result<Vec<T>> {
        self.inner
            .send(template)
            .await?
            .expect_status(&[StatusCode::OK], "retrieving", self.resource)?
            .json()
    }
}

impl<T> std::fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("path", &self.path)
            .field("filters", &self.filters)
            .field("cursor", &self.cursor)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

/// Builder used by services to set up a [`Paginator`].
pub(crate) struct PaginatorBuilder {
    inner: Arc<ClientInner>,
    path: String,
    resource: &'static str,
    filters: Vec<(String, String)>,
    max_page_size: u32,
}

impl PaginatorBuilder {
    pub(crate) fn new(inner: Arc<ClientInner>, path: impl Into<String>, resource: &'static str) -> Self {
        Self {
            inner,
            path: path.into(),
            resource,
            filters: Vec::new(),
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// Add a fixed query filter sent with every page request.
    pub(crate) fn filter(mut self, key: &str, value: impl ToString) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a filter only when a value is present.
    pub(crate) fn filter_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.filter(key, value),
            None => self,
        }
    }

    /// Raise or lower the endpoint's page size cap.
    pub(crate) fn max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Validate the options and build the paginator. No request is made.
    pub(crate) fn build<T>(self, options: ListOptions) -> Result<Paginator<T>> {
        validate_page_size(options.page_size, self.max_page_size)?;

        Ok(Paginator {
            inner: self.inner,
            path: self.path,
            resource: self.resource,
            filters: self.filters,
            cursor: PageCursor::new(options.page_size, options.offset, options.limit),
            buffer: VecDeque::new(),
        })
    }
}
