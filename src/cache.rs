//! Scan Result Cache
//!
//! Caches a [`ThemeIndex`] against a theme-identity key through the transient
//! store, with a 1-hour default expiry. Invalidated explicitly by a refresh
//! signal from the admin surface, implicitly by expiry.

use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;
use crate::scanner::ThemeIndex;
use crate::store::TransientStore;

const CACHE_KEY_PREFIX: &str = "theme_index:";

/// Default cache lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// TTL cache for theme scan results.
pub struct ScanCache<'a, S: TransientStore> {
    store: &'a mut S,
    ttl: Duration,
}

impl<'a, S: TransientStore> ScanCache<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(store: &'a mut S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Cached index for this theme, if present and unexpired.
    pub fn get(&self, theme_identity: &str) -> Option<ThemeIndex> {
        let value = self.store.get_transient(&cache_key(theme_identity))?;
        match serde_json::from_value(value) {
            Ok(index) => Some(index),
            Err(e) => {
                debug!(theme = theme_identity, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    pub fn put(&mut self, theme_identity: &str, index: &ThemeIndex) -> Result<()> {
        let value = serde_json::to_value(index)?;
        self.store
            .set_transient(&cache_key(theme_identity), value, self.ttl)
    }

    /// Drop the cache entry for this theme (the admin refresh signal).
    pub fn refresh(&mut self, theme_identity: &str) -> Result<bool> {
        self.store.delete_transient(&cache_key(theme_identity))
    }

    /// Cached index, or compute and cache one.
    pub fn get_or_insert_with<F>(&mut self, theme_identity: &str, scan: F) -> Result<ThemeIndex>
    where
        F: FnOnce() -> Result<ThemeIndex>,
    {
        if let Some(index) = self.get(theme_identity) {
            debug!(theme = theme_identity, "scan cache hit");
            return Ok(index);
        }

        let index = scan()?;
        self.put(theme_identity, &index)?;
        Ok(index)
    }
}

fn cache_key(theme_identity: &str) -> String {
    let digest = Sha256::digest(theme_identity.as_bytes());
    format!("{CACHE_KEY_PREFIX}{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample_index() -> ThemeIndex {
        serde_json::from_value(serde_json::json!({
            "templates": [
                {"file": "single.php", "path": "/theme/single.php", "name": "Single"}
            ],
            "partials": [
                {"file": "header.php", "path": "/theme/header.php", "name": "Header"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_put_then_get() {
        let mut store = MemoryStore::new();
        let mut cache = ScanCache::new(&mut store);

        assert!(cache.get("twentytwo").is_none());
        cache.put("twentytwo", &sample_index()).unwrap();
        assert_eq!(cache.get("twentytwo"), Some(sample_index()));
    }

    #[test]
    fn test_identity_keys_are_isolated() {
        let mut store = MemoryStore::new();
        let mut cache = ScanCache::new(&mut store);

        cache.put("theme-a", &sample_index()).unwrap();
        assert!(cache.get("theme-b").is_none());
    }

    #[test]
    fn test_refresh_drops_entry() {
        let mut store = MemoryStore::new();
        let mut cache = ScanCache::new(&mut store);

        cache.put("twentytwo", &sample_index()).unwrap();
        assert!(cache.refresh("twentytwo").unwrap());
        assert!(cache.get("twentytwo").is_none());
        assert!(!cache.refresh("twentytwo").unwrap());
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let mut store = MemoryStore::new();
        let mut cache = ScanCache::with_ttl(&mut store, Duration::from_secs(0));

        cache.put("twentytwo", &sample_index()).unwrap();
        assert!(cache.get("twentytwo").is_none());
    }

    #[test]
    fn test_get_or_insert_with_scans_once() {
        let mut store = MemoryStore::new();
        let mut cache = ScanCache::new(&mut store);

        let index = cache
            .get_or_insert_with("twentytwo", || Ok(sample_index()))
            .unwrap();
        assert_eq!(index, sample_index());

        // Second call must come from cache
        let again = cache
            .get_or_insert_with("twentytwo", || panic!("should not rescan"))
            .unwrap();
        assert_eq!(again, sample_index());
    }
}
