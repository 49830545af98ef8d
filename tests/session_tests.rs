//! Search session flows against an in-process catalog and the memory store,
//! on a paused clock.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cinefind::clients::{Catalog, CatalogError, CatalogRequest};
use cinefind::models::{Movie, MoviePage, NewSearchRecord, SearchRecord};
use cinefind::search::{FetchStatus, Input, SearchSession, Snapshot};
use cinefind::services::{MemoryTrendingStore, StoreError, TrendingService, TrendingStore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

const DEBOUNCE: Duration = Duration::from_millis(500);

struct FakeCatalog {
    calls: Mutex<Vec<CatalogRequest>>,
    slow_terms: HashSet<String>,
    fail_once: Mutex<HashSet<String>>,
    total_pages: u32,
}

impl FakeCatalog {
    fn new(total_pages: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            slow_terms: HashSet::new(),
            fail_once: Mutex::new(HashSet::new()),
            total_pages,
        }
    }

    fn slow(mut self, term: &str) -> Self {
        self.slow_terms.insert(term.to_string());
        self
    }

    fn failing_once(self, term: &str) -> Self {
        self.fail_once.lock().unwrap().insert(term.to_string());
        self
    }

    fn calls(&self) -> Vec<CatalogRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn search_calls(&self) -> Vec<(String, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogRequest::Search { query, page } => Some((query, page)),
                CatalogRequest::Discover { .. } => None,
            })
            .collect()
    }
}

fn movie(term: &str, page: u32, n: u64) -> Movie {
    Movie {
        id: u64::from(page) * 100 + n,
        title: format!("{term} #{page}.{n}"),
        poster_path: Some(format!("/{term}-{page}-{n}.jpg")),
        release_date: Some("2021-10-22".to_string()),
        vote_average: Some(7.8),
        original_language: Some("en".to_string()),
        popularity: None,
        overview: String::new(),
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<MoviePage, CatalogError> {
        self.calls.lock().unwrap().push(request.clone());

        let (term, page) = match request {
            CatalogRequest::Search { query, page } => (query.as_str(), *page),
            CatalogRequest::Discover { page } => ("popular", *page),
        };

        let delay = if self.slow_terms.contains(term) {
            Duration::from_secs(2)
        } else {
            Duration::from_millis(50)
        };
        sleep(delay).await;

        if self.fail_once.lock().unwrap().remove(term) {
            return Err(CatalogError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "upstream down".to_string(),
            });
        }

        let results = if term == "nothing" {
            Vec::new()
        } else {
            (1..=3).map(|n| movie(term, page, n)).collect()
        };

        Ok(MoviePage {
            page,
            total_pages: self.total_pages,
            total_results: u64::from(self.total_pages) * 3,
            results: Some(results),
        })
    }
}

struct BrokenStore;

#[async_trait]
impl TrendingStore for BrokenStore {
    async fn find_by_term(&self, _term: &str) -> Result<Option<SearchRecord>, StoreError> {
        Err(StoreError::NotFound("collection".to_string()))
    }

    async fn top_by_count(&self, _limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        Err(StoreError::NotFound("collection".to_string()))
    }

    async fn create(&self, _record: NewSearchRecord) -> Result<SearchRecord, StoreError> {
        Err(StoreError::NotFound("collection".to_string()))
    }

    async fn update_count(&self, id: &str, _count: u64) -> Result<SearchRecord, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }
}

struct Harness {
    inputs: mpsc::Sender<Input>,
    snapshots: tokio::sync::watch::Receiver<Snapshot>,
    handle: JoinHandle<Snapshot>,
}

impl Harness {
    fn start(catalog: Arc<FakeCatalog>, store: Arc<dyn TrendingStore>) -> Self {
        let (session, snapshots) =
            SearchSession::new(catalog, TrendingService::new(store), DEBOUNCE, 5);
        let (inputs, rx) = mpsc::channel(16);
        let handle = tokio::spawn(session.run(rx));

        Self {
            inputs,
            snapshots,
            handle,
        }
    }

    async fn send(&self, input: Input) {
        self.inputs.send(input).await.unwrap();
    }

    async fn type_text(&self, text: &str) {
        self.send(Input::Edit(text.to_string())).await;
    }

    fn latest(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    async fn finish(self) -> Snapshot {
        drop(self.inputs);
        self.handle.await.unwrap()
    }
}

#[tokio::test(start_paused = true)]
async fn empty_term_loads_popular_feed_on_start() {
    let catalog = Arc::new(FakeCatalog::new(4));
    let harness = Harness::start(catalog.clone(), Arc::new(MemoryTrendingStore::new()));

    sleep(Duration::from_millis(100)).await;
    let snapshot = harness.finish().await;

    assert_eq!(catalog.calls(), vec![CatalogRequest::Discover { page: 1 }]);
    assert_eq!(snapshot.search.term(), "");
    assert_eq!(snapshot.search.movies().len(), 3);
    assert_eq!(snapshot.search.status(), FetchStatus::Success);
    assert!(snapshot.trending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn keystrokes_inside_quiet_period_commit_once() {
    let catalog = Arc::new(FakeCatalog::new(1));
    let harness = Harness::start(catalog.clone(), Arc::new(MemoryTrendingStore::new()));

    for text in ["d", "du", "dun", "dune"] {
        harness.type_text(text).await;
        sleep(Duration::from_millis(200)).await;
    }

    // 200ms after the last edit nothing has been committed yet
    assert!(catalog.search_calls().is_empty());
    assert_eq!(harness.latest().input, "dune");

    sleep(Duration::from_millis(400)).await;
    let snapshot = harness.finish().await;

    assert_eq!(catalog.search_calls(), vec![("dune".to_string(), 1)]);
    assert_eq!(snapshot.search.term(), "dune");
    assert!(snapshot.search.movies().iter().all(|m| m.title.starts_with("dune")));
    assert!(!snapshot.search.has_more());
}

#[tokio::test(start_paused = true)]
async fn returning_to_committed_text_does_not_refetch() {
    let catalog = Arc::new(FakeCatalog::new(1));
    let harness = Harness::start(catalog.clone(), Arc::new(MemoryTrendingStore::new()));

    harness.type_text("x").await;
    sleep(Duration::from_millis(100)).await;
    harness.type_text("").await;
    sleep(Duration::from_secs(1)).await;

    harness.finish().await;
    assert_eq!(catalog.calls(), vec![CatalogRequest::Discover { page: 1 }]);
}

#[tokio::test(start_paused = true)]
async fn slow_response_for_superseded_term_is_dropped() {
    let catalog = Arc::new(FakeCatalog::new(1).slow("slow"));
    let harness = Harness::start(catalog.clone(), Arc::new(MemoryTrendingStore::new()));

    harness.type_text("slow").await;
    sleep(Duration::from_millis(600)).await;
    assert!(harness.latest().search.is_loading());

    harness.type_text("fast").await;
    sleep(Duration::from_secs(3)).await;
    let snapshot = harness.finish().await;

    assert_eq!(
        catalog.search_calls(),
        vec![("slow".to_string(), 1), ("fast".to_string(), 1)]
    );
    assert_eq!(snapshot.search.term(), "fast");
    assert_eq!(snapshot.search.movies().len(), 3);
    assert!(snapshot.search.movies().iter().all(|m| m.title.starts_with("fast")));
}

#[tokio::test(start_paused = true)]
async fn load_more_while_in_flight_is_ignored() {
    let catalog = Arc::new(FakeCatalog::new(3));
    let harness = Harness::start(catalog.clone(), Arc::new(MemoryTrendingStore::new()));
    sleep(Duration::from_millis(100)).await;

    harness.send(Input::LoadMore).await;
    harness.send(Input::LoadMore).await;
    harness.send(Input::LoadMore).await;
    sleep(Duration::from_millis(200)).await;

    harness.send(Input::LoadMore).await;
    sleep(Duration::from_millis(200)).await;

    // the last page is loaded, nothing more to ask for
    harness.send(Input::LoadMore).await;
    sleep(Duration::from_millis(200)).await;
    let snapshot = harness.finish().await;

    assert_eq!(
        catalog.calls(),
        vec![
            CatalogRequest::Discover { page: 1 },
            CatalogRequest::Discover { page: 2 },
            CatalogRequest::Discover { page: 3 },
        ]
    );
    assert_eq!(snapshot.search.movies().len(), 9);
    assert_eq!(snapshot.search.status(), FetchStatus::Exhausted);
}

#[tokio::test(start_paused = true)]
async fn repeated_searches_are_counted_per_term() {
    let catalog = Arc::new(FakeCatalog::new(1));
    let store = Arc::new(MemoryTrendingStore::new());
    let harness = Harness::start(catalog, store.clone());

    for term in ["dune", "heat", "dune"] {
        harness.type_text(term).await;
        sleep(Duration::from_millis(700)).await;
    }

    harness.send(Input::RefreshTrending).await;
    sleep(Duration::from_millis(10)).await;
    let snapshot = harness.finish().await;

    let records = store.records();
    assert_eq!(records.len(), 2);
    let dune = records.iter().find(|r| r.search_term == "dune").unwrap();
    assert_eq!(dune.count, 2);
    assert_eq!(dune.movie.title, "dune #1.1");

    let trending: Vec<_> = snapshot
        .trending
        .iter()
        .map(|r| (r.search_term.as_str(), r.count))
        .collect();
    assert_eq!(trending, vec![("dune", 2), ("heat", 1)]);
}

#[tokio::test(start_paused = true)]
async fn trending_loaded_at_start() {
    let store = Arc::new(MemoryTrendingStore::new());
    TrendingService::new(store.clone())
        .try_record("alien", &movie("alien", 1, 1))
        .await
        .unwrap();

    let harness = Harness::start(Arc::new(FakeCatalog::new(1)), store);
    sleep(Duration::from_millis(10)).await;

    let snapshot = harness.latest();
    assert_eq!(snapshot.trending.len(), 1);
    assert_eq!(snapshot.trending[0].search_term, "alien");
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn broken_store_does_not_affect_search() {
    let catalog = Arc::new(FakeCatalog::new(2));
    let harness = Harness::start(catalog, Arc::new(BrokenStore));

    harness.type_text("dune").await;
    sleep(Duration::from_millis(700)).await;
    let snapshot = harness.finish().await;

    assert_eq!(snapshot.search.term(), "dune");
    assert_eq!(snapshot.search.movies().len(), 3);
    assert!(snapshot.search.error().is_none());
    assert!(snapshot.trending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_shows_message_and_retry_recovers() {
    let catalog = Arc::new(FakeCatalog::new(1).failing_once("dune"));
    let harness = Harness::start(catalog.clone(), Arc::new(MemoryTrendingStore::new()));

    harness.type_text("dune").await;
    sleep(Duration::from_millis(700)).await;

    let failed = harness.latest();
    assert_eq!(failed.search.status(), FetchStatus::Error);
    assert_eq!(
        failed.search.error(),
        Some("Error fetching movies. Please try again later.")
    );
    assert!(failed.search.movies().is_empty());

    harness.send(Input::Retry).await;
    sleep(Duration::from_millis(100)).await;
    let snapshot = harness.finish().await;

    assert_eq!(
        catalog.search_calls(),
        vec![("dune".to_string(), 1), ("dune".to_string(), 1)]
    );
    assert!(snapshot.search.error().is_none());
    assert_eq!(snapshot.search.movies().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn empty_first_page_reports_no_results() {
    let store = Arc::new(MemoryTrendingStore::new());
    let harness = Harness::start(Arc::new(FakeCatalog::new(1)), store.clone());

    harness.type_text("nothing").await;
    sleep(Duration::from_millis(700)).await;
    let snapshot = harness.finish().await;

    assert_eq!(snapshot.search.status(), FetchStatus::Empty);
    assert_eq!(snapshot.search.error(), Some("No movies found."));
    assert!(!snapshot.search.has_more());
    assert!(store.records().is_empty());
}
