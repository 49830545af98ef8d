use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::clients::{AppwriteClient, Catalog, TmdbClient};
use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::services::{MemoryTrendingStore, PosterProxy, TrendingService, TrendingStore};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Catalog and store calls go through the same client so connections are
/// pooled.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Everything a search session or one-shot command needs, wired from config.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub catalog: Arc<dyn Catalog>,

    pub trending: TrendingService,

    pub posters: PosterProxy,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let http = build_shared_http_client(config.catalog.request_timeout_seconds)?;

        let catalog: Arc<dyn Catalog> = Arc::new(TmdbClient::new(http.clone(), &config.catalog));

        let store: Arc<dyn TrendingStore> = if config.trending.is_hosted() {
            info!(
                endpoint = %config.trending.endpoint,
                collection = %config.trending.collection_id,
                "Using hosted trending store"
            );
            Arc::new(AppwriteClient::new(http, &config.trending))
        } else {
            info!("No hosted trending store configured, keeping search counts in memory");
            Arc::new(MemoryTrendingStore::new())
        };

        Ok(Self {
            posters: PosterProxy::new(&config.posters),
            trending: TrendingService::new(store),
            catalog,
            config,
        })
    }
}
