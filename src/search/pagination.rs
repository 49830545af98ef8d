//! Catalog fetch controller.
//!
//! Pure state machine over the paginated result list of one committed
//! term. The session feeds it [`FetchEvent`]s and carries out the
//! [`Effect`]s it returns; no I/O happens here.
//!
//! Every fetch is tagged with the generation of the term that issued it.
//! A completion from an older generation is dropped, so only the most
//! recently committed term can ever reach the list. Within one generation
//! at most one fetch is in flight.

use tracing::{debug, warn};

use crate::clients::{CatalogError, CatalogRequest};
use crate::constants::messages;
use crate::models::{Movie, MoviePage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub term: String,
    pub page: u32,
}

impl FetchRequest {
    #[must_use]
    pub fn catalog_request(&self) -> CatalogRequest {
        CatalogRequest::for_term(&self.term, self.page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing committed yet
    Idle,
    Loading,
    /// Results held and more pages exist
    Success,
    /// First page came back empty
    Empty,
    /// Results held, no further pages
    Exhausted,
    Error,
}

#[derive(Debug)]
pub enum FetchEvent {
    Commit(String),
    LoadMore,
    Retry,
    Completed {
        request: FetchRequest,
        outcome: Result<MoviePage, CatalogError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchRequest),
    /// Count a search for `term`, with `movie` as its representative.
    RecordSearch { term: String, movie: Movie },
}

#[derive(Debug, Clone)]
pub struct SearchState {
    term: String,
    page: u32,
    has_more: bool,
    movies: Vec<Movie>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    status: FetchStatus,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            term: String::new(),
            page: 1,
            has_more: true,
            movies: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
            status: FetchStatus::Idle,
        }
    }
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: FetchEvent) -> Vec<Effect> {
        match event {
            FetchEvent::Commit(term) => {
                self.generation += 1;
                self.term = term;
                self.has_more = true;
                self.movies.clear();
                vec![Effect::Fetch(self.start_fetch(1))]
            }
            FetchEvent::LoadMore => {
                if !self.can_load_more() {
                    debug!(
                        loading = self.loading,
                        has_more = self.has_more,
                        "Ignoring load more"
                    );
                    return vec![];
                }
                // a failed page was never loaded, so it is still the next one
                let next = if self.status == FetchStatus::Error {
                    self.page
                } else {
                    self.page + 1
                };
                vec![Effect::Fetch(self.start_fetch(next))]
            }
            FetchEvent::Retry => {
                if self.loading || self.status != FetchStatus::Error {
                    return vec![];
                }
                vec![Effect::Fetch(self.start_fetch(self.page))]
            }
            FetchEvent::Completed { request, outcome } => self.complete(request, outcome),
        }
    }

    fn start_fetch(&mut self, page: u32) -> FetchRequest {
        self.page = page;
        self.loading = true;
        self.error = None;
        self.status = FetchStatus::Loading;

        FetchRequest {
            generation: self.generation,
            term: self.term.clone(),
            page,
        }
    }

    fn complete(
        &mut self,
        request: FetchRequest,
        outcome: Result<MoviePage, CatalogError>,
    ) -> Vec<Effect> {
        if request.generation != self.generation {
            debug!(
                term = %request.term,
                page = request.page,
                "Dropping response for superseded search"
            );
            return vec![];
        }

        self.loading = false;

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                warn!(term = %request.term, page = request.page, error = %e, "Error fetching movies");
                self.error = Some(messages::FETCH_FAILED.to_string());
                self.status = FetchStatus::Error;
                return vec![];
            }
        };

        let has_more = page.has_more();
        let results = page.results.unwrap_or_default();

        if results.is_empty() {
            self.has_more = false;
            if request.page == 1 {
                self.error = Some(messages::NO_RESULTS.to_string());
                self.status = FetchStatus::Empty;
            } else {
                self.status = FetchStatus::Exhausted;
            }
            return vec![];
        }

        // first result stands in for the term in the trending list
        let representative = (request.page == 1 && !request.term.is_empty())
            .then(|| results[0].clone());

        if request.page == 1 {
            self.movies = results;
        } else {
            self.movies.extend(results);
        }

        self.has_more = has_more;
        self.status = if has_more {
            FetchStatus::Success
        } else {
            FetchStatus::Exhausted
        };

        representative
            .map(|movie| Effect::RecordSearch {
                term: request.term,
                movie,
            })
            .into_iter()
            .collect()
    }

    /// Load-more is possible once a term is committed, while more pages
    /// exist and nothing is in flight.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading && self.status != FetchStatus::Idle
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }
}
