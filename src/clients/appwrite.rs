//! Appwrite databases REST client backing the trending list.
//!
//! One document per search term in a single collection, with the
//! attributes `searchTerm`, `count`, `movie_id`, `title` and `poster_url`.

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::TrendingConfig;
use crate::models::{MovieSnapshot, NewSearchRecord, SearchRecord};
use crate::services::trending::{StoreError, TrendingStore};

const SEARCH_TERM: &str = "searchTerm";
const COUNT: &str = "count";

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    documents: Vec<SearchDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$updatedAt", default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    movie_id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    poster_url: Option<String>,
}

impl From<SearchDocument> for SearchRecord {
    fn from(doc: SearchDocument) -> Self {
        Self {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie: MovieSnapshot {
                movie_id: doc.movie_id,
                title: doc.title,
                poster_url: doc.poster_url,
            },
            updated_at: doc.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Serialize)]
struct SearchData<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: u64,
    movie_id: u64,
    title: &'a str,
    poster_url: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocument<'a> {
    document_id: String,
    data: SearchData<'a>,
}

#[derive(Serialize)]
struct CountUpdate {
    count: u64,
}

#[derive(Serialize)]
struct UpdateDocument {
    data: CountUpdate,
}

/// Appwrite query strings, serialized as the JSON objects the REST API
/// expects in `queries[]`.
mod query {
    use serde_json::json;

    pub fn equal(attribute: &str, value: &str) -> String {
        json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
    }

    pub fn order_desc(attribute: &str) -> String {
        json!({ "method": "orderDesc", "attribute": attribute }).to_string()
    }

    pub fn limit(n: usize) -> String {
        json!({ "method": "limit", "values": [n] }).to_string()
    }
}

#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    api_key: Option<String>,
}

impl AppwriteClient {
    #[must_use]
    pub fn new(client: Client, config: &TrendingConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn documents_url(&self) -> Result<Url, StoreError> {
        let url = Url::parse(&format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        ))?;
        Ok(url)
    }

    fn document_url(&self, id: &str) -> Result<Url, StoreError> {
        let mut url = self.documents_url()?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id);

        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, StoreError> {
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn list(&self, queries: &[String]) -> Result<DocumentList, StoreError> {
        let mut url = self.documents_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            for q in queries {
                pairs.append_pair("queries[]", q);
            }
        }

        let list: DocumentList = Self::send(self.request(Method::GET, url)).await?;
        debug!(
            total = list.total,
            returned = list.documents.len(),
            "Listed search documents"
        );
        Ok(list)
    }
}

#[async_trait::async_trait]
impl TrendingStore for AppwriteClient {
    async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        let list = self.list(&[query::equal(SEARCH_TERM, term)]).await?;
        Ok(list.documents.into_iter().next().map(SearchRecord::from))
    }

    async fn top_by_count(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let list = self
            .list(&[query::limit(limit), query::order_desc(COUNT)])
            .await?;
        Ok(list.documents.into_iter().map(SearchRecord::from).collect())
    }

    async fn create(&self, record: NewSearchRecord) -> Result<SearchRecord, StoreError> {
        let body = CreateDocument {
            document_id: uuid::Uuid::new_v4().simple().to_string(),
            data: SearchData {
                search_term: &record.search_term,
                count: 1,
                movie_id: record.movie.movie_id,
                title: &record.movie.title,
                poster_url: record.movie.poster_url.as_deref(),
            },
        };

        let url = self.documents_url()?;
        let doc: SearchDocument = Self::send(self.request(Method::POST, url).json(&body)).await?;
        Ok(doc.into())
    }

    async fn update_count(&self, id: &str, count: u64) -> Result<SearchRecord, StoreError> {
        let body = UpdateDocument {
            data: CountUpdate { count },
        };

        let url = self.document_url(id)?;
        let doc: SearchDocument = Self::send(self.request(Method::PATCH, url).json(&body)).await?;
        Ok(doc.into())
    }
}
