//! Text rendering of the search screen.
//!
//! Rendering is a pure function of the session [`Snapshot`] apart from one
//! piece of cosmetic state: which result rows have been drawn before, so
//! that a row gets its entrance marker exactly once.

use crate::models::{Movie, SearchRecord};
use crate::search::Snapshot;
use crate::services::PosterProxy;

const ENTRANCE_MARKER: &str = "+";

pub struct View {
    posters: PosterProxy,
    generation: u64,
    drawn: usize,
}

impl View {
    #[must_use]
    pub const fn new(posters: PosterProxy) -> Self {
        Self {
            posters,
            generation: 0,
            drawn: 0,
        }
    }

    pub fn render(&mut self, snapshot: &Snapshot) -> String {
        let mut lines = vec![format!("Search: {}", snapshot.input), String::new()];

        if !snapshot.trending.is_empty() {
            lines.push("Trending Movies".to_string());
            lines.extend(
                snapshot
                    .trending
                    .iter()
                    .enumerate()
                    .map(|(i, record)| self.trending_line(i + 1, record)),
            );
            lines.push(String::new());
        }

        lines.push("All Movies".to_string());
        let search = &snapshot.search;

        if search.generation() != self.generation {
            self.generation = search.generation();
            self.drawn = 0;
        }

        if search.is_loading() {
            lines.push("  Loading...".to_string());
        } else if let Some(error) = search.error() {
            lines.push(format!("  {error}"));
        } else {
            for (i, movie) in search.movies().iter().enumerate() {
                let marker = if i >= self.drawn { ENTRANCE_MARKER } else { " " };
                lines.push(format!("{marker} {}", self.movie_line(movie)));
            }
            self.drawn = search.movies().len();
        }

        if search.has_more() && !search.is_loading() {
            lines.push(String::new());
            lines.push("[:more] Load More".to_string());
        }

        lines.join("\n")
    }

    fn trending_line(&self, rank: usize, record: &SearchRecord) -> String {
        format!(
            "  {rank}. {} ({}) {}",
            record.search_term,
            record.movie.title,
            self.posters.rewrite(record.movie.poster_url.as_deref())
        )
    }

    /// One result row: title, rating, language, year, then the poster URL.
    #[must_use]
    pub fn movie_line(&self, movie: &Movie) -> String {
        format!(
            "{} | {} | {} | {}\n    {}",
            movie.title,
            movie
                .vote_average
                .map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}")),
            movie.original_language.as_deref().unwrap_or("N/A"),
            movie.release_year().unwrap_or("N/A"),
            self.posters.for_movie(movie)
        )
    }
}
