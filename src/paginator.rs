//! Lazy, cursor-driven pagination over page-based API endpoints.
//!
//! A [`Paginator`] wraps a page-fetch callback and produces items on demand:
//! one network call per page, with unconsumed items buffered for single-item
//! consumption. [`MappedPaginator`] and [`FilteredPaginator`] decorate another
//! producer without breaking laziness, so transformation and filtering still
//! pull exactly one page's worth of work per fetch.

use crate::{LastFmError, Result};
use async_trait::async_trait;
use futures::future::LocalBoxFuture;

/// Hard ceiling on the number of pages a [`Paginator`] will ever request.
pub const MAX_PAGES: u32 = 1000;

/// Number of items requested per page when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Why a paginator stopped producing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhausted {
    /// The underlying fetch returned zero items.
    EmptyPage,
    /// The configured item ceiling or the absolute page ceiling was reached.
    MaxReached,
}

/// Outcome of a single page fetch.
///
/// Exhaustion is a control signal, not a user-facing failure: the single-item
/// methods translate it into a clean end of sequence and only ever surface
/// [`FetchError::Failed`] to callers.
#[derive(Debug)]
pub enum FetchError {
    /// No more pages will be produced.
    Exhausted(Exhausted),
    /// A real failure from the fetch callback, propagated verbatim.
    Failed(LastFmError),
}

impl From<LastFmError> for FetchError {
    fn from(err: LastFmError) -> Self {
        FetchError::Failed(err)
    }
}

/// Result type for [`AsyncPaginatedIterator::fetch_next`].
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Page-fetch callback: maps `(page, limit)` to one page of items.
///
/// `page` is 1-based. Any fixed arguments the endpoint needs (query string,
/// country, username, ...) are captured by the closure.
pub type PageFn<'a, T> = Box<dyn FnMut(u32, u32) -> LocalBoxFuture<'a, Result<Vec<T>>> + 'a>;

/// Pagination options for endpoints that return a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Number of items to request per page.
    pub limit: u32,
    /// Ceiling on the total number of items ever fetched (not buffered).
    pub max: Option<u32>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            max: None,
        }
    }
}

/// Async iterator trait for paginated Last.fm data.
///
/// This trait provides a common interface for iterating over paginated data:
/// [`Paginator`] drives the network directly, while [`MappedPaginator`] and
/// [`FilteredPaginator`] implement the same contract on top of another
/// implementation.
///
/// Items within a page are consumed most-recently-fetched first (the buffer
/// is popped from the end), while pages themselves arrive in forward order.
/// [`collect_all`](Self::collect_all) reflects that order.
///
/// # Examples
///
/// ```rust
/// use futures::FutureExt;
/// use lastfm_api::paginator::{AsyncPaginatedIterator, Paginator};
///
/// # tokio_test::block_on(async {
/// let pages = vec![vec![1, 2, 3], vec![4, 5]];
/// let mut paginator = Paginator::new(Box::new(move |page, _limit| {
///     let items = pages.get((page - 1) as usize).cloned().unwrap_or_default();
///     async move { Ok(items) }.boxed_local()
/// }));
///
/// let all = paginator.collect_all().await?;
/// assert_eq!(all, vec![3, 2, 1, 5, 4]);
/// # Ok::<(), lastfm_api::LastFmError>(())
/// # });
/// ```
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait AsyncPaginatedIterator<T> {
    /// Buffer of fetched but not yet consumed items, in arrival order.
    fn buffer(&mut self) -> &mut Vec<T>;

    /// Fetch exactly one page, appending it to the buffer.
    ///
    /// Returns the newly fetched items only, never the whole buffer. An
    /// `Err(FetchError::Exhausted(_))` means no further pages will ever be
    /// produced; it is sticky and safe to observe repeatedly.
    async fn fetch_next(&mut self) -> FetchResult<Vec<T>>;

    /// Fetch the next item.
    ///
    /// Pops from the buffer, fetching a new page only when the buffer is
    /// empty. Returns `Ok(None)` once the source is exhausted; exhaustion is
    /// never an error at this boundary.
    async fn next(&mut self) -> Result<Option<T>> {
        if let Some(item) = self.buffer().pop() {
            return Ok(Some(item));
        }
        match self.fetch_next().await {
            Ok(_) => Ok(self.buffer().pop()),
            Err(FetchError::Exhausted(_)) => Ok(None),
            Err(FetchError::Failed(err)) => Err(err),
        }
    }

    /// Collect all remaining items into a `Vec`.
    ///
    /// **Warning**: this fetches every remaining page, which could be many
    /// thousands of items. Use [`take`](Self::take) or a `max` ceiling for
    /// bounded collection.
    async fn collect_all(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Take up to `n` items from the iterator.
    async fn take(&mut self, n: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for _ in 0..n {
            match self.next().await? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Active,
    Exhausted(Exhausted),
}

/// A lazy, page-based data source.
///
/// Owns the cursor state (next page number, cumulative item offset) and a
/// buffer of unconsumed items. Nothing is fetched at construction; the first
/// request happens when an item or page is pulled.
pub struct Paginator<'a, T> {
    items: Vec<T>,
    page: u32,
    offset: u32,
    limit: u32,
    max: Option<u32>,
    state: State,
    fetch: PageFn<'a, T>,
}

impl<'a, T> Paginator<'a, T> {
    /// Create a paginator with the default page size and no item ceiling.
    pub fn new(fetch: PageFn<'a, T>) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            max: None,
            state: State::Active,
            fetch,
        }
    }

    /// Create a paginator with an explicit page size and item ceiling.
    ///
    /// The effective page size is clamped to the ceiling when one is set. A
    /// ceiling of zero is rejected with [`LastFmError::Config`] before any
    /// fetch is issued.
    pub fn with_options(fetch: PageFn<'a, T>, options: PageOptions) -> Result<Self> {
        let limit = match options.max {
            Some(0) => {
                return Err(LastFmError::Config(
                    "max must be greater than 0".to_string(),
                ))
            }
            Some(max) => options.limit.min(max),
            None => options.limit,
        };
        Ok(Self {
            items: Vec::new(),
            page: 1,
            offset: 0,
            limit,
            max: options.max,
            state: State::Active,
            fetch,
        })
    }

    /// 1-based number of the next page to fetch.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Cumulative number of items fetched so far, across all pages.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Effective page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of buffered, unconsumed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer is currently empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decorate this paginator with a per-item transform.
    ///
    /// Lazy: nothing is fetched or transformed until the decorator is pulled,
    /// and `f` runs exactly once per fetched item.
    pub fn map<'p, R, F>(&'p mut self, f: F) -> MappedPaginator<'p, T, R>
    where
        T: Clone,
        F: FnMut(T) -> R + 'p,
    {
        MappedPaginator::new(self, f)
    }

    /// Decorate this paginator with a predicate.
    ///
    /// Items failing the predicate are discarded; the decorator transparently
    /// fetches further pages when an entire page is filtered out.
    pub fn filter<'p, F>(&'p mut self, f: F) -> FilteredPaginator<'p, T>
    where
        T: Clone,
        F: FnMut(&T) -> bool + 'p,
    {
        FilteredPaginator::new(self, f)
    }
}

impl<T> std::fmt::Debug for Paginator<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("page", &self.page)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("buffered", &self.items.len())
            .finish()
    }
}

#[async_trait(?Send)]
impl<'a, T: Clone> AsyncPaginatedIterator<T> for Paginator<'a, T> {
    fn buffer(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    async fn fetch_next(&mut self) -> FetchResult<Vec<T>> {
        if let State::Exhausted(kind) = self.state {
            return Err(FetchError::Exhausted(kind));
        }

        // Ceilings are checked before the network call; a known-exhausted
        // paginator never issues I/O.
        let max_reached = self.max.map_or(false, |max| self.offset >= max);
        if max_reached || self.page > MAX_PAGES {
            self.state = State::Exhausted(Exhausted::MaxReached);
            return Err(FetchError::Exhausted(Exhausted::MaxReached));
        }

        log::debug!(
            "fetching page {} (limit {}, offset {})",
            self.page,
            self.limit,
            self.offset
        );
        let page = (self.fetch)(self.page, self.limit).await?;

        if page.is_empty() {
            self.state = State::Exhausted(Exhausted::EmptyPage);
            return Err(FetchError::Exhausted(Exhausted::EmptyPage));
        }

        // Cursor state moves only after the awaited fetch succeeds, so an
        // abandoned or failed call leaves the paginator unchanged.
        self.page += 1;
        self.offset += page.len() as u32;
        self.items.extend(page.iter().cloned());
        Ok(page)
    }
}

/// Paginator decorator that transforms every freshly fetched page.
///
/// Holds its own buffer of already-transformed items; cursor state and
/// ceilings live entirely in the wrapped producer.
pub struct MappedPaginator<'p, T, R> {
    inner: &'p mut (dyn AsyncPaginatedIterator<T> + 'p),
    map: Box<dyn FnMut(T) -> R + 'p>,
    items: Vec<R>,
}

impl<'p, T, R> MappedPaginator<'p, T, R> {
    /// Wrap any page producer with a per-item transform.
    pub fn new<F>(inner: &'p mut (dyn AsyncPaginatedIterator<T> + 'p), f: F) -> Self
    where
        F: FnMut(T) -> R + 'p,
    {
        Self {
            inner,
            map: Box::new(f),
            items: Vec::new(),
        }
    }
}

#[async_trait(?Send)]
impl<'p, T, R: Clone> AsyncPaginatedIterator<R> for MappedPaginator<'p, T, R> {
    fn buffer(&mut self) -> &mut Vec<R> {
        &mut self.items
    }

    async fn fetch_next(&mut self) -> FetchResult<Vec<R>> {
        let page = self.inner.fetch_next().await?;
        let mapped: Vec<R> = page.into_iter().map(&mut self.map).collect();
        self.items.extend(mapped.iter().cloned());
        Ok(mapped)
    }
}

/// Paginator decorator that discards items failing a predicate.
///
/// A fetched page may yield zero survivors without the source being
/// exhausted, so single-item consumption keeps pulling pages until something
/// survives or the source runs dry.
pub struct FilteredPaginator<'p, T> {
    inner: &'p mut (dyn AsyncPaginatedIterator<T> + 'p),
    predicate: Box<dyn FnMut(&T) -> bool + 'p>,
    items: Vec<T>,
}

impl<'p, T> FilteredPaginator<'p, T> {
    /// Wrap any page producer with a predicate.
    pub fn new<F>(inner: &'p mut (dyn AsyncPaginatedIterator<T> + 'p), f: F) -> Self
    where
        F: FnMut(&T) -> bool + 'p,
    {
        Self {
            inner,
            predicate: Box::new(f),
            items: Vec::new(),
        }
    }
}

#[async_trait(?Send)]
impl<'p, T: Clone> AsyncPaginatedIterator<T> for FilteredPaginator<'p, T> {
    fn buffer(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    async fn fetch_next(&mut self) -> FetchResult<Vec<T>> {
        let page = self.inner.fetch_next().await?;
        let predicate = &mut self.predicate;
        let kept: Vec<T> = page.into_iter().filter(|item| predicate(item)).collect();
        self.items.extend(kept.iter().cloned());
        Ok(kept)
    }

    async fn next(&mut self) -> Result<Option<T>> {
        if let Some(item) = self.items.pop() {
            return Ok(Some(item));
        }
        // An explicit loop, not recursion: arbitrarily many consecutive pages
        // may be filtered out before one survives.
        while self.items.is_empty() {
            match self.fetch_next().await {
                Ok(_) => {}
                Err(FetchError::Exhausted(_)) => return Ok(None),
                Err(FetchError::Failed(err)) => return Err(err),
            }
        }
        Ok(self.items.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Fetcher serving fixed pages; out-of-range pages are empty.
    fn paged_fetcher(pages: Vec<Vec<u32>>, calls: Rc<Cell<u32>>) -> PageFn<'static, u32> {
        Box::new(move |page, _limit| {
            calls.set(calls.get() + 1);
            let items = pages.get((page - 1) as usize).cloned().unwrap_or_default();
            async move { Ok(items) }.boxed_local()
        })
    }

    /// Fetcher serving endless full pages of `limit` items.
    fn endless_fetcher(calls: Rc<Cell<u32>>) -> PageFn<'static, u32> {
        Box::new(move |page, limit| {
            calls.set(calls.get() + 1);
            let start = (page - 1) * limit;
            async move { Ok((start..start + limit).collect()) }.boxed_local()
        })
    }

    #[tokio::test]
    async fn collect_all_yields_every_item_in_pop_order() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator = Paginator::new(paged_fetcher(
            vec![vec![1, 2, 3], vec![4, 5]],
            Rc::clone(&calls),
        ));

        let all = paginator.collect_all().await.unwrap();

        // Pages arrive in forward order, items within a page pop in reverse.
        assert_eq!(all, vec![3, 2, 1, 5, 4]);
        // Two data pages plus the empty page that signalled exhaustion.
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn max_bounds_fetch_volume() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator = Paginator::with_options(
            endless_fetcher(Rc::clone(&calls)),
            PageOptions {
                limit: 2,
                max: Some(5),
            },
        )
        .unwrap();

        assert_eq!(paginator.limit(), 2);

        let all = paginator.collect_all().await.unwrap();

        // ceil(5 / min(2, 5)) pages, and not one fetch more.
        assert_eq!(calls.get(), 3);
        assert_eq!(all.len(), 6);
        assert_eq!(paginator.offset(), 6);
    }

    #[tokio::test]
    async fn limit_is_clamped_to_max() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator = Paginator::with_options(
            endless_fetcher(Rc::clone(&calls)),
            PageOptions {
                limit: 30,
                max: Some(4),
            },
        )
        .unwrap();

        assert_eq!(paginator.limit(), 4);

        let all = paginator.collect_all().await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn empty_page_is_terminal_and_never_refetches() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator =
            Paginator::new(paged_fetcher(vec![vec![1, 2], vec![]], Rc::clone(&calls)));

        assert_eq!(paginator.fetch_next().await.unwrap(), vec![1, 2]);
        assert!(matches!(
            paginator.fetch_next().await,
            Err(FetchError::Exhausted(Exhausted::EmptyPage))
        ));
        assert_eq!(calls.get(), 2);

        // The buffered page drains, then end-of-sequence without new I/O.
        assert_eq!(paginator.next().await.unwrap(), Some(2));
        assert_eq!(paginator.next().await.unwrap(), Some(1));
        assert_eq!(paginator.next().await.unwrap(), None);
        assert_eq!(paginator.next().await.unwrap(), None);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn exhaustion_kind_is_sticky() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator = Paginator::with_options(
            endless_fetcher(Rc::clone(&calls)),
            PageOptions {
                limit: 3,
                max: Some(3),
            },
        )
        .unwrap();

        paginator.fetch_next().await.unwrap();
        for _ in 0..2 {
            assert!(matches!(
                paginator.fetch_next().await,
                Err(FetchError::Exhausted(Exhausted::MaxReached))
            ));
        }
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn page_ceiling_stops_fetching() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator = Paginator::new(endless_fetcher(Rc::clone(&calls)));
        paginator.page = MAX_PAGES + 1;

        assert!(matches!(
            paginator.fetch_next().await,
            Err(FetchError::Exhausted(Exhausted::MaxReached))
        ));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn zero_max_is_a_config_error() {
        let calls = Rc::new(Cell::new(0));
        let result = Paginator::with_options(
            endless_fetcher(Rc::clone(&calls)),
            PageOptions {
                limit: 30,
                max: Some(0),
            },
        );

        assert!(matches!(result, Err(LastFmError::Config(_))));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn collect_all_on_exhausted_paginator_is_empty_and_quiet() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator =
            Paginator::new(paged_fetcher(vec![vec![7, 8]], Rc::clone(&calls)));

        let first = paginator.collect_all().await.unwrap();
        assert_eq!(first, vec![8, 7]);

        let fetches = calls.get();
        let second = paginator.collect_all().await.unwrap();
        assert!(second.is_empty());
        assert_eq!(calls.get(), fetches);
    }

    #[tokio::test]
    async fn transport_errors_propagate_without_state_mutation() {
        let calls = Rc::new(Cell::new(0));
        let calls_in_fetcher = Rc::clone(&calls);
        let mut paginator: Paginator<'_, u32> = Paginator::new(Box::new(move |page, _limit| {
            calls_in_fetcher.set(calls_in_fetcher.get() + 1);
            let attempt = calls_in_fetcher.get();
            async move {
                match (page, attempt) {
                    (1, _) => Ok(vec![1, 2]),
                    (2, 2) => Err(LastFmError::Http("connection reset".to_string())),
                    (2, _) => Ok(vec![5, 6]),
                    _ => Ok(vec![]),
                }
            }
            .boxed_local()
        }));

        assert_eq!(paginator.next().await.unwrap(), Some(2));
        assert_eq!(paginator.next().await.unwrap(), Some(1));

        let err = paginator.next().await.unwrap_err();
        assert!(matches!(err, LastFmError::Http(_)));

        // Cursor and buffer are exactly as before the failed call.
        assert_eq!(paginator.page(), 2);
        assert_eq!(paginator.offset(), 2);
        assert!(paginator.is_empty());

        // The same page can be requested again.
        assert_eq!(paginator.next().await.unwrap(), Some(6));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn map_transforms_each_item_exactly_once() {
        let calls = Rc::new(Cell::new(0));
        let applications = Rc::new(Cell::new(0));
        let mut source = Paginator::new(paged_fetcher(
            vec![vec![1, 2], vec![3]],
            Rc::clone(&calls),
        ));

        let applications_in_map = Rc::clone(&applications);
        let mut doubled = source.map(move |x| {
            applications_in_map.set(applications_in_map.get() + 1);
            x * 2
        });

        let all = doubled.collect_all().await.unwrap();
        assert_eq!(all, vec![4, 2, 6]);
        assert_eq!(applications.get(), 3);
    }

    #[tokio::test]
    async fn mapped_fetch_next_returns_only_the_new_page() {
        let calls = Rc::new(Cell::new(0));
        let mut source = Paginator::new(paged_fetcher(
            vec![vec![1, 2], vec![3]],
            Rc::clone(&calls),
        ));
        let mut doubled = source.map(|x| x * 2);

        assert_eq!(doubled.fetch_next().await.unwrap(), vec![2, 4]);
        assert_eq!(doubled.fetch_next().await.unwrap(), vec![6]);
    }

    #[tokio::test]
    async fn filter_skips_fully_rejected_pages() {
        let calls = Rc::new(Cell::new(0));
        let mut source = Paginator::new(paged_fetcher(
            vec![vec![1, 3], vec![2, 4]],
            Rc::clone(&calls),
        ));
        let mut evens = source.filter(|x| x % 2 == 0);

        // Page 1 contributes nothing; exactly one extra fetch reaches page 2.
        assert_eq!(evens.next().await.unwrap(), Some(4));
        assert_eq!(calls.get(), 2);

        assert_eq!(evens.next().await.unwrap(), Some(2));
        assert_eq!(evens.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn filter_terminates_when_everything_is_rejected() {
        let calls = Rc::new(Cell::new(0));
        let mut source = Paginator::with_options(
            endless_fetcher(Rc::clone(&calls)),
            PageOptions {
                limit: 1,
                max: Some(2),
            },
        )
        .unwrap();
        let mut none = source.filter(|_| false);

        // The ceiling lives in the wrapped paginator, so a filter that
        // rejects everything still terminates after `max` raw items.
        let all = none.collect_all().await.unwrap();
        assert!(all.is_empty());
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn decorators_are_lazy_at_construction() {
        let calls = Rc::new(Cell::new(0));
        let mut source = Paginator::new(endless_fetcher(Rc::clone(&calls)));

        let _ = source.map(|x| x + 1);
        let _ = source.filter(|_| true);

        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn take_stops_midway_through_a_page() {
        let calls = Rc::new(Cell::new(0));
        let mut paginator = Paginator::new(endless_fetcher(Rc::clone(&calls)));

        let some = paginator.take(3).await.unwrap();
        assert_eq!(some.len(), 3);
        assert_eq!(calls.get(), 1);
        assert_eq!(paginator.len(), DEFAULT_PAGE_SIZE as usize - 3);
    }
}
