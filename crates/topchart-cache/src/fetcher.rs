use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, FROM};
use topchart_models::config::HttpConfig;

use crate::error::FetchError;
use crate::page_cache::PageCache;

/// Throttled, cache-backed page fetcher.
///
/// Every cache miss sleeps the configured delay, performs exactly one GET
/// with the fixed identifying header set, and writes the body through the
/// persistent cache before returning it. Hits never touch the network and
/// never sleep. Single-threaded by design; crawls run strictly in order.
pub struct PageFetcher {
    client: reqwest::blocking::Client,
    cache: PageCache,
    delay: Duration,
}

impl PageFetcher {
    pub fn new(cache: PageCache, http: &HttpConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            FROM,
            HeaderValue::from_str(&http.from)
                .map_err(|e| FetchError::Header(format!("From: {e}")))?,
        );
        let client = reqwest::blocking::Client::builder()
            .user_agent(http.user_agent.clone())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            cache,
            delay: Duration::from_millis(http.fetch_delay_ms),
        })
    }

    /// Return the cached body for `url`, fetching and caching it on a miss.
    ///
    /// Transport and non-success status errors surface as `FetchError`;
    /// they are not retried here.
    pub fn get_or_fetch(&mut self, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.cache.get(url) {
            tracing::debug!(url, "Using cache");
            return Ok(body.to_string());
        }

        tracing::info!(url, "Fetching");
        std::thread::sleep(self.delay);
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        self.cache.insert(url.to_string(), body.clone())?;
        Ok(body)
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> HttpConfig {
        HttpConfig {
            fetch_delay_ms: 0,
            ..HttpConfig::default()
        }
    }

    fn fetcher_in(dir: &tempfile::TempDir) -> PageFetcher {
        let cache = PageCache::empty(dir.path().join("cache.json"));
        PageFetcher::new(cache, &test_config()).unwrap()
    }

    #[test]
    fn second_call_uses_cache() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/title/tt0068646/")
            .with_body("<html>godfather</html>")
            .expect(1)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = fetcher_in(&dir);
        let url = format!("{}/title/tt0068646/", server.url());

        let first = fetcher.get_or_fetch(&url).unwrap();
        let second = fetcher.get_or_fetch(&url).unwrap();

        assert_eq!(first, "<html>godfather</html>");
        assert_eq!(first, second);
        // Exactly one network fetch for two calls.
        mock.assert();
    }

    #[test]
    fn identifying_headers_are_sent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/chart/top/")
            .match_header("user-agent", mockito::Matcher::Regex("topchart".to_string()))
            .match_header("from", "topchart@example.com")
            .with_body("ok")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = fetcher_in(&dir);
        let url = format!("{}/chart/top/", server.url());
        fetcher.get_or_fetch(&url).unwrap();
        mock.assert();
    }

    #[test]
    fn http_error_status_surfaces() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/missing")
            .with_status(500)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = fetcher_in(&dir);
        let url = format!("{}/missing", server.url());

        let err = fetcher.get_or_fetch(&url).unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        // A failed fetch must not poison the cache.
        assert!(!fetcher.cache().contains(&url));
    }

    #[test]
    fn miss_persists_to_disk() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/page").with_body("body").create();

        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("cache.json");
        let mut fetcher =
            PageFetcher::new(PageCache::empty(&cache_path), &test_config()).unwrap();
        let url = format!("{}/page", server.url());
        fetcher.get_or_fetch(&url).unwrap();

        // A later run loads the persisted entry and never refetches.
        let reloaded = PageCache::load(&cache_path);
        assert_eq!(reloaded.get(&url), Some("body"));
    }

    #[test]
    fn pre_seeded_cache_skips_network() {
        // No server at all: a hit must not need one.
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        cache
            .insert("http://127.0.0.1:1/offline".to_string(), "stored".to_string())
            .unwrap();

        let mut fetcher = PageFetcher::new(cache, &test_config()).unwrap();
        let body = fetcher.get_or_fetch("http://127.0.0.1:1/offline").unwrap();
        assert_eq!(body, "stored");
    }
}
