use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub trending: TrendingConfig,

    pub search: SearchConfig,

    pub posters: PosterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    /// Bearer token for the catalog API. Usually supplied via `TMDB_API_KEY`
    /// rather than written to the config file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_token: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: constants::catalog::TMDB_API.to_string(),
            api_token: String::new(),
            request_timeout_seconds: constants::catalog::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub endpoint: String,

    pub project_id: String,

    pub database_id: String,

    pub collection_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Number of entries shown in the trending list (default: 5)
    pub limit: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::trending::APPWRITE_ENDPOINT.to_string(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            api_key: None,
            limit: constants::trending::DEFAULT_LIMIT,
        }
    }
}

impl TrendingConfig {
    /// The hosted store is used only when all three identifiers are set.
    #[must_use]
    pub fn is_hosted(&self) -> bool {
        !self.project_id.is_empty() && !self.database_id.is_empty() && !self.collection_id.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last edit before a search is committed
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: u64::try_from(constants::search::DEBOUNCE.as_millis()).unwrap_or(500),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    pub image_host: String,

    pub proxy_base: String,

    pub placeholder: String,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            image_host: constants::posters::IMAGE_HOST.to_string(),
            proxy_base: constants::posters::PROXY_BASE.to_string(),
            placeholder: constants::posters::PLACEHOLDER.to_string(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env` and process
    /// environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Environment values win over the config file. The catalog token is
    /// taken as-is; a missing token only shows up as an auth error from
    /// the catalog API.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TMDB_API_KEY") {
            self.catalog.api_token = token;
        }
        if let Some(base) = lookup("TMDB_BASE_URL") {
            self.catalog.base_url = base;
        }
        if let Some(endpoint) = lookup("APPWRITE_ENDPOINT") {
            self.trending.endpoint = endpoint;
        }
        if let Some(project) = lookup("APPWRITE_PROJECT_ID") {
            self.trending.project_id = project;
        }
        if let Some(database) = lookup("APPWRITE_DATABASE_ID") {
            self.trending.database_id = database;
        }
        if let Some(collection) = lookup("APPWRITE_COLLECTION_ID") {
            self.trending.collection_id = collection;
        }
        if let Some(key) = lookup("APPWRITE_API_KEY") {
            self.trending.api_key = Some(key).filter(|k| !k.is_empty());
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cinefind").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cinefind").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.catalog.base_url)
            .with_context(|| format!("Invalid catalog base URL: {}", self.catalog.base_url))?;

        if self.trending.is_hosted() {
            url::Url::parse(&self.trending.endpoint).with_context(|| {
                format!("Invalid trending store endpoint: {}", self.trending.endpoint)
            })?;
        }

        if self.trending.limit == 0 {
            anyhow::bail!("Trending limit must be > 0");
        }

        Ok(())
    }
}
