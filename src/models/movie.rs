use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    #[serde(default)]
    pub overview: String,
}

impl Movie {
    /// Full-size poster URL on the catalog's image host.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", constants::catalog::POSTER_BASE, p))
    }

    /// Release year, taken from the `YYYY-MM-DD` release date.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| y.len() == 4)
    }
}

/// One page of a search or discover response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    pub results: Option<Vec<Movie>>,
}

impl MoviePage {
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Results, treating a missing list the same as an empty one.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        self.results.as_deref().unwrap_or_default()
    }
}
