//! Composition behavior of the pagination decorators through the public API.

use futures::FutureExt;
use lastfm_api::{
    AsyncPaginatedIterator, FilteredPaginator, MappedPaginator, PageFn, PageOptions, Paginator,
};
use std::cell::Cell;
use std::rc::Rc;

fn fixed_pages(pages: Vec<Vec<u32>>, calls: Rc<Cell<u32>>) -> PageFn<'static, u32> {
    Box::new(move |page, _limit| {
        calls.set(calls.get() + 1);
        let items = pages.get((page - 1) as usize).cloned().unwrap_or_default();
        async move { Ok(items) }.boxed_local()
    })
}

#[tokio::test]
async fn map_then_filter_chains_lazily() {
    let calls = Rc::new(Cell::new(0));
    let mut source = Paginator::new(fixed_pages(
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![]],
        calls.clone(),
    ));

    let mut mapped = source.map(|n| n * 10);
    let mut filtered = FilteredPaginator::new(&mut mapped, |n| n % 20 == 0);

    // Construction alone fetches nothing.
    assert_eq!(calls.get(), 0);

    let kept = filtered.collect_all().await.unwrap();
    // Within each page the survivors pop most-recent first.
    assert_eq!(kept, vec![20, 60, 40]);
    assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn filter_then_map_chains_lazily() {
    let calls = Rc::new(Cell::new(0));
    let mut source = Paginator::new(fixed_pages(
        vec![vec![1, 2, 3, 4], vec![]],
        calls.clone(),
    ));

    let mut evens = source.filter(|n| n % 2 == 0);
    let mut labeled = MappedPaginator::new(&mut evens, |n| format!("#{n}"));

    let all = labeled.collect_all().await.unwrap();
    assert_eq!(all, vec!["#4".to_string(), "#2".to_string()]);
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn take_through_a_decorator_stops_early() {
    let calls = Rc::new(Cell::new(0));
    let mut source = Paginator::new(fixed_pages(
        vec![vec![1, 2, 3], vec![4, 5, 6]],
        calls.clone(),
    ));

    let mut mapped = source.map(|n| n + 100);
    let first_two = mapped.take(2).await.unwrap();

    assert_eq!(first_two, vec![103, 102]);
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn decorators_respect_the_source_ceiling() {
    let calls = Rc::new(Cell::new(0));
    let endless = {
        let calls = calls.clone();
        Box::new(move |page: u32, limit: u32| {
            calls.set(calls.get() + 1);
            let start = (page - 1) * limit;
            async move { Ok((start..start + limit).collect::<Vec<u32>>()) }.boxed_local()
        })
    };
    let mut source = Paginator::with_options(
        endless,
        PageOptions {
            limit: 3,
            max: Some(6),
        },
    )
    .unwrap();

    // Reject everything; the ceiling in the source still terminates the
    // otherwise endless filter.
    let mut none = source.filter(|_| false);
    assert!(none.collect_all().await.unwrap().is_empty());
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn decorator_fetch_next_returns_only_new_items() {
    let calls = Rc::new(Cell::new(0));
    let mut source = Paginator::new(fixed_pages(
        vec![vec![1, 2], vec![3, 4]],
        calls.clone(),
    ));

    let mut mapped = source.map(|n| n * 2);
    let first = mapped.fetch_next().await.unwrap();
    let second = mapped.fetch_next().await.unwrap();

    assert_eq!(first, vec![2, 4]);
    assert_eq!(second, vec![6, 8]);
    // Both pages are still buffered and consumable.
    assert_eq!(mapped.collect_all().await.unwrap().len(), 4);
}
