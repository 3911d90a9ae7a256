use serde::{Deserialize, Serialize};

/// Top-level configuration for topchart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TopchartConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Configuration for the HTTP fetch layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    /// Site root; chart and detail hrefs are joined against this.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identifying User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Contact address sent as the `From` header with every request.
    #[serde(default = "default_from")]
    pub from: String,
    /// Fixed throttle in milliseconds before every live fetch (cache misses only).
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            from: default_from(),
            fetch_delay_ms: default_fetch_delay_ms(),
        }
    }
}

/// Configuration for the persistent page cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Path to the JSON cache file (URL → raw response body).
    #[serde(default = "default_cache_path")]
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

/// Bounds for the interactive item-count prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrawlConfig {
    #[serde(default = "default_min_items")]
    pub min_items: usize,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            min_items: default_min_items(),
            max_items: default_max_items(),
        }
    }
}

/// Configuration for the relational catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite catalog database.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.imdb.com".to_string()
}
fn default_user_agent() -> String {
    "topchart/0.1 (top-rated chart research scraper)".to_string()
}
fn default_from() -> String {
    "topchart@example.com".to_string()
}
fn default_fetch_delay_ms() -> u64 {
    1000
}
fn default_cache_path() -> String {
    "data/cache.json".to_string()
}
fn default_min_items() -> usize {
    50
}
fn default_max_items() -> usize {
    250
}
fn default_db_path() -> String {
    "data/topchart.db".to_string()
}
