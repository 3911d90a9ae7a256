use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CacheError;

/// Persistent URL → raw response body cache.
///
/// The whole map lives in memory for the run and is written through to a
/// single JSON object on disk after every insert. There is no TTL and no
/// eviction: a hit returns the exact bytes stored at fetch time, which is
/// what makes repeated crawls idempotent and replay-safe.
pub struct PageCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PageCache {
    /// Load the cache from `path`.
    ///
    /// An absent or unparsable cache file is treated as an empty cache;
    /// load failures are logged, never propagated.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cache file unparsable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No cache file, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// An empty cache that persists to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a response body and persist the whole cache synchronously.
    ///
    /// Persistence is O(cache size) per insert; acceptable because the
    /// cache stays small and the network fetch dominates cost.
    pub fn insert(&mut self, url: String, body: String) -> Result<(), CacheError> {
        self.entries.insert(url, body);
        self.save()
    }

    /// Write the full cache to disk as one JSON object.
    pub fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::load(dir.path().join("nope.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();
        let cache = PageCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = PageCache::empty(&path);
        cache
            .insert("https://example.com/a".to_string(), "<html>a</html>".to_string())
            .unwrap();
        cache
            .insert("https://example.com/b".to_string(), "<html>b</html>".to_string())
            .unwrap();

        let reloaded = PageCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("https://example.com/a"), Some("<html>a</html>"));
        assert_eq!(reloaded.get("https://example.com/b"), Some("<html>b</html>"));
    }

    #[test]
    fn insert_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = PageCache::empty(&path);
        cache
            .insert("https://example.com".to_string(), "body".to_string())
            .unwrap();

        // A separate load sees the write without an explicit save().
        let other = PageCache::load(&path);
        assert_eq!(other.get("https://example.com"), Some("body"));
    }

    #[test]
    fn hit_returns_identical_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        let body = "<html>\u{00e9}\n\ttabs and unicode</html>";
        cache
            .insert("https://example.com".to_string(), body.to_string())
            .unwrap();
        assert_eq!(cache.get("https://example.com"), Some(body));
    }

    #[test]
    fn missing_parent_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/cache.json");
        let mut cache = PageCache::empty(&path);
        cache
            .insert("https://example.com".to_string(), "body".to_string())
            .unwrap();
        assert!(path.exists());
    }
}
