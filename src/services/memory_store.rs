//! In-process trending store.
//!
//! Used when no hosted document store is configured. Records live only as
//! long as the process; nothing is written to disk.

use std::sync::Mutex;

use chrono::Utc;

use crate::models::{NewSearchRecord, SearchRecord};
use crate::services::trending::{StoreError, TrendingStore};

#[derive(Default)]
pub struct MemoryTrendingStore {
    records: Mutex<Vec<SearchRecord>>,
}

impl MemoryTrendingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<SearchRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SearchRecord>> {
        // every mutation is a single assignment, so a poisoned guard is still consistent
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl TrendingStore for MemoryTrendingStore {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        Ok(self
            .lock()
            .iter()
            .find(|r| r.search_term == term)
            .cloned())
    }

    async fn top_by_count(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let mut records = self.lock().clone();
        // stable sort: equal counts keep insertion order
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records.truncate(limit);
        Ok(records)
    }

    async fn create(&self, record: NewSearchRecord) -> Result<SearchRecord, StoreError> {
        let created = SearchRecord {
            id: uuid::Uuid::new_v4().simple().to_string(),
            search_term: record.search_term,
            count: 1,
            movie: record.movie,
            updated_at: Utc::now(),
        };

        self.lock().push(created.clone());
        Ok(created)
    }

    async fn update_count(&self, id: &str, count: u64) -> Result<SearchRecord, StoreError> {
        let mut records = self.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.count = count;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}
