use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Movie;

/// Denormalized copy of the movie that represented a search term when the
/// term was first recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSnapshot {
    pub movie_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
}

impl From<&Movie> for MovieSnapshot {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(),
        }
    }
}

/// A trending entry as held by the search-analytics store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: String,
    pub search_term: String,
    pub count: u64,
    pub movie: MovieSnapshot,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSearchRecord {
    pub search_term: String,
    pub movie: MovieSnapshot,
}
