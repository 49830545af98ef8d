//! The search session: owns the debouncer, the fetch controller and the
//! trending list, and multiplexes user input, the debounce deadline, the
//! in-flight catalog fetch and analytics writes on one task.
//!
//! State is published as a [`Snapshot`] on a `watch` channel after every
//! event, so a renderer only ever sees the latest state.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info};

use super::debounce::Debouncer;
use super::pagination::{Effect, FetchEvent, FetchRequest, SearchState};
use crate::clients::{Catalog, CatalogError};
use crate::models::{MoviePage, SearchRecord};
use crate::services::{StoreError, TrendingService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The search box now holds this text.
    Edit(String),
    LoadMore,
    Retry,
    RefreshTrending,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub input: String,
    pub search: SearchState,
    pub trending: Vec<SearchRecord>,
}

type FetchDone = (FetchRequest, Result<MoviePage, CatalogError>);

enum Background {
    Recorded,
    Trending(Result<Vec<SearchRecord>, StoreError>),
}

pub struct SearchSession {
    catalog: Arc<dyn Catalog>,
    trending: TrendingService,
    trending_limit: usize,
    debouncer: Debouncer,
    state: SearchState,
    trending_list: Vec<SearchRecord>,
    snapshots: watch::Sender<Snapshot>,
}

impl SearchSession {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        trending: TrendingService,
        debounce: Duration,
        trending_limit: usize,
    ) -> (Self, watch::Receiver<Snapshot>) {
        let state = SearchState::new();
        let (snapshots, rx) = watch::channel(Snapshot {
            input: String::new(),
            search: state.clone(),
            trending: Vec::new(),
        });

        let session = Self {
            catalog,
            trending,
            trending_limit,
            debouncer: Debouncer::new(debounce),
            state,
            trending_list: Vec::new(),
            snapshots,
        };

        (session, rx)
    }

    /// Runs until the input channel closes, then waits for outstanding
    /// analytics writes and returns the final state. In-flight catalog
    /// fetches are abandoned.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<Input>) -> Snapshot {
        let mut fetches: FuturesUnordered<BoxFuture<'static, FetchDone>> = FuturesUnordered::new();
        let mut background: FuturesUnordered<BoxFuture<'static, Background>> =
            FuturesUnordered::new();

        background.push(self.load_trending());

        // the empty term is live from the start: popularity feed
        let effects = self.state.apply(FetchEvent::Commit(String::new()));
        self.dispatch(effects, &mut fetches, &mut background);
        self.publish();

        loop {
            let deadline = self.debouncer.deadline();

            tokio::select! {
                input = inputs.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    self.on_input(input, &mut fetches, &mut background);
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(term) = self.debouncer.poll(Instant::now()) {
                        info!(term = %term, "Search committed");
                        let effects = self.state.apply(FetchEvent::Commit(term));
                        self.dispatch(effects, &mut fetches, &mut background);
                    }
                }
                Some((request, outcome)) = fetches.next(), if !fetches.is_empty() => {
                    let effects = self.state.apply(FetchEvent::Completed { request, outcome });
                    self.dispatch(effects, &mut fetches, &mut background);
                }
                Some(done) = background.next(), if !background.is_empty() => {
                    self.on_background(done);
                }
            }

            self.publish();
        }

        while let Some(done) = background.next().await {
            self.on_background(done);
        }
        self.publish();

        self.snapshot()
    }

    fn on_input(
        &mut self,
        input: Input,
        fetches: &mut FuturesUnordered<BoxFuture<'static, FetchDone>>,
        background: &mut FuturesUnordered<BoxFuture<'static, Background>>,
    ) {
        match input {
            Input::Edit(text) => self.debouncer.edit(text, Instant::now()),
            Input::LoadMore => {
                let effects = self.state.apply(FetchEvent::LoadMore);
                self.dispatch(effects, fetches, background);
            }
            Input::Retry => {
                let effects = self.state.apply(FetchEvent::Retry);
                self.dispatch(effects, fetches, background);
            }
            Input::RefreshTrending => background.push(self.load_trending()),
        }
    }

    fn dispatch(
        &self,
        effects: Vec<Effect>,
        fetches: &mut FuturesUnordered<BoxFuture<'static, FetchDone>>,
        background: &mut FuturesUnordered<BoxFuture<'static, Background>>,
    ) {
        for effect in effects {
            match effect {
                Effect::Fetch(request) => {
                    debug!(
                        term = %request.term,
                        page = request.page,
                        generation = request.generation,
                        "Fetching movies"
                    );
                    let catalog = Arc::clone(&self.catalog);
                    fetches.push(
                        async move {
                            let catalog_request = request.catalog_request();
                            let outcome = catalog.fetch_page(&catalog_request).await;
                            (request, outcome)
                        }
                        .boxed(),
                    );
                }
                Effect::RecordSearch { term, movie } => {
                    let trending = self.trending.clone();
                    background.push(
                        async move {
                            trending.record(&term, &movie).await;
                            Background::Recorded
                        }
                        .boxed(),
                    );
                }
            }
        }
    }

    fn load_trending(&self) -> BoxFuture<'static, Background> {
        let trending = self.trending.clone();
        let limit = self.trending_limit;
        async move { Background::Trending(trending.top(limit).await) }.boxed()
    }

    fn on_background(&mut self, done: Background) {
        match done {
            Background::Recorded => {}
            Background::Trending(Ok(list)) => self.trending_list = list,
            Background::Trending(Err(e)) => {
                error!(error = %e, "Error loading trending movies");
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            input: self.debouncer.raw().to_string(),
            search: self.state.clone(),
            trending: self.trending_list.clone(),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
