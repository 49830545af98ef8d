//! Search analytics: counts how often each committed term is searched and
//! exposes the most searched terms as the trending list.
//!
//! Recording is a side channel. A failing store is logged and otherwise
//! ignored so the search flow never sees analytics errors.

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::{Movie, MovieSnapshot, NewSearchRecord, SearchRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store API error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Search record not found: {0}")]
    NotFound(String),
}

/// Document store holding one record per search term.
#[async_trait::async_trait]
pub trait TrendingStore: Send + Sync {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError>;

    /// Records with the highest count first. Ordering among equal counts is
    /// whatever the store returns.
    async fn top_by_count(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError>;

    async fn create(&self, record: NewSearchRecord) -> Result<SearchRecord, StoreError>;

    async fn update_count(&self, id: &str, count: u64) -> Result<SearchRecord, StoreError>;
}

#[derive(Clone)]
pub struct TrendingService {
    store: Arc<dyn TrendingStore>,
}

impl TrendingService {
    #[must_use]
    pub fn new(store: Arc<dyn TrendingStore>) -> Self {
        Self { store }
    }

    /// Counts one search for `term`, using `top_movie` as the term's
    /// representative when the term is new. Errors are logged, not returned.
    pub async fn record(&self, term: &str, top_movie: &Movie) {
        match self.try_record(term, top_movie).await {
            Ok(record) => debug!(
                term = %record.search_term,
                count = record.count,
                "Recorded search"
            ),
            Err(e) => error!(term = %term, error = %e, "Failed to record search"),
        }
    }

    pub async fn try_record(
        &self,
        term: &str,
        top_movie: &Movie,
    ) -> Result<SearchRecord, StoreError> {
        if let Some(existing) = self.store.find_by_term(term).await? {
            return self
                .store
                .update_count(&existing.id, existing.count + 1)
                .await;
        }

        self.store
            .create(NewSearchRecord {
                search_term: term.to_string(),
                movie: MovieSnapshot::from(top_movie),
            })
            .await
    }

    pub async fn top(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        self.store.top_by_count(limit).await
    }
}
