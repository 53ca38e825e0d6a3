//! Chart payload cache
//!
//! Keyed by (dashboard id, file path, file modification time): replacing
//! the file shifts the mtime and naturally invalidates the key. Entries
//! under stale keys linger until the cache is cleared; there is no
//! eviction policy beyond that.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ahash::AHashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::service::ChartView;

/// Cache key tying a built payload to one dashboard and one file version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartCacheKey {
    pub dashboard_id: Uuid,
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl ChartCacheKey {
    /// Key for the file's current on-disk version
    pub fn for_path(dashboard_id: Uuid, path: &Path) -> io::Result<Self> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(Self {
            dashboard_id,
            path: path.to_path_buf(),
            modified,
        })
    }
}

/// In-memory cache of built chart views
#[derive(Default)]
pub struct ChartCache {
    entries: RwLock<AHashMap<ChartCacheKey, ChartView>>,
}

impl ChartCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached view for `key`, if the same file version was built before
    pub fn get(&self, key: &ChartCacheKey) -> Option<ChartView> {
        self.entries.read().get(key).cloned()
    }

    /// Store a built view under `key`
    pub fn put(&self, key: ChartCacheKey, view: ChartView) {
        self.entries.write().insert(key, view);
    }

    /// Number of cached entries (stale versions included)
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ChartData;
    use std::time::Duration;

    fn key(dashboard_id: Uuid, modified: SystemTime) -> ChartCacheKey {
        ChartCacheKey {
            dashboard_id,
            path: PathBuf::from("/uploads/data.csv"),
            modified,
        }
    }

    fn view() -> ChartView {
        ChartView::Chart {
            chart: ChartData::unsupported("test"),
        }
    }

    #[test]
    fn test_hit_requires_same_file_version() {
        let cache = ChartCache::new();
        let id = Uuid::new_v4();
        let t0 = SystemTime::UNIX_EPOCH;

        cache.put(key(id, t0), view());
        assert!(cache.get(&key(id, t0)).is_some());

        // A newer mtime is a different key: miss, old entry lingers.
        let t1 = t0 + Duration::from_secs(60);
        assert!(cache.get(&key(id, t1)).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_per_dashboard() {
        let cache = ChartCache::new();
        let t0 = SystemTime::UNIX_EPOCH;

        cache.put(key(Uuid::new_v4(), t0), view());
        assert!(cache.get(&key(Uuid::new_v4(), t0)).is_none());
    }

    #[test]
    fn test_key_for_missing_file_fails() {
        let result = ChartCacheKey::for_path(Uuid::new_v4(), Path::new("/nonexistent.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_clear() {
        let cache = ChartCache::new();
        cache.put(key(Uuid::new_v4(), SystemTime::UNIX_EPOCH), view());
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
