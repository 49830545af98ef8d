//! Client for the TMDB v3 catalog API.
//!
//! Only the two listing endpoints the search screen needs are covered:
//! `search/movie` for a non-empty term and `discover/movie` (sorted by
//! popularity) for the empty term. Both are paginated.

use reqwest::{Client, StatusCode, header};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::CatalogConfig;
use crate::constants;
use crate::models::MoviePage;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog API error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Which listing to fetch for a committed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    Search { query: String, page: u32 },
    Discover { page: u32 },
}

impl CatalogRequest {
    /// An empty term falls back to the popularity feed.
    #[must_use]
    pub fn for_term(term: &str, page: u32) -> Self {
        if term.is_empty() {
            Self::Discover { page }
        } else {
            Self::Search {
                query: term.to_string(),
                page,
            }
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Search { page, .. } | Self::Discover { page } => *page,
        }
    }

    pub fn url(&self, base_url: &str) -> Result<Url, CatalogError> {
        let base = base_url.trim_end_matches('/');

        let url = match self {
            Self::Search { query, page } => {
                let mut url = Url::parse(&format!("{base}/search/movie"))?;
                url.query_pairs_mut()
                    .append_pair("query", query)
                    .append_pair("page", &page.to_string());
                url
            }
            Self::Discover { page } => {
                let mut url = Url::parse(&format!("{base}/discover/movie"))?;
                url.query_pairs_mut()
                    .append_pair("sort_by", constants::catalog::DISCOVER_SORT)
                    .append_pair("page", &page.to_string());
                url
            }
        };

        Ok(url)
    }
}

/// Source of movie listings for the search session.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<MoviePage, CatalogError>;
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl TmdbClient {
    #[must_use]
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        self.fetch_page(&CatalogRequest::for_term(query, page)).await
    }

    pub async fn discover(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.fetch_page(&CatalogRequest::Discover { page }).await
    }
}

#[async_trait::async_trait]
impl Catalog for TmdbClient {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<MoviePage, CatalogError> {
        let url = request.url(&self.base_url)?;
        debug!(url = %url, "Fetching catalog page");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        let body = response.text().await?;
        let page: MoviePage = serde_json::from_str(&body)?;

        debug!(
            page = page.page,
            total_pages = page.total_pages,
            results = page.movies().len(),
            "Catalog page received"
        );

        Ok(page)
    }
}
