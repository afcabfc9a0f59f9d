//! Bounded recency cache of decoded point clouds.
//!
//! Avoids re-decoding files that were loaded recently. Entries are keyed by
//! source path; once the recency ledger grows past the capacity the least
//! recently used path is evicted.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::PointCloud;

/// Default number of clouds kept alive.
pub const DEFAULT_CACHE_CAPACITY: usize = 5;

/// Path-keyed cache with oldest-evicted-first policy.
///
/// Clouds are stored behind `Arc` and handed out shared, so a cached cloud
/// is immutable for as long as it lives in the cache.
#[derive(Debug)]
pub struct RecencyCache {
    entries: HashMap<PathBuf, Arc<PointCloud>>,
    /// Access order, most recently used at the back.
    ledger: VecDeque<PathBuf>,
    capacity: usize,
}

impl RecencyCache {
    /// Create a cache holding at most `capacity` clouds (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity + 1),
            ledger: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Look up a cloud, marking it most recently used on a hit.
    pub fn get(&mut self, path: &Path) -> Option<Arc<PointCloud>> {
        let cloud = Arc::clone(self.entries.get(path)?);
        self.touch(path);
        Some(cloud)
    }

    /// Insert or overwrite a cloud, then evict down to capacity.
    pub fn put(&mut self, path: impl Into<PathBuf>, cloud: impl Into<Arc<PointCloud>>) {
        let path = path.into();
        if self.entries.contains_key(&path) {
            self.touch(&path);
        } else {
            self.ledger.push_back(path.clone());
        }
        self.entries.insert(path, cloud.into());

        while self.ledger.len() > self.capacity {
            if let Some(evicted) = self.ledger.pop_front() {
                tracing::debug!(path = %evicted.display(), "evicting cached cloud");
                self.entries.remove(&evicted);
            }
        }
    }

    /// Check for an entry without changing recency.
    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Drop one entry.
    pub fn remove(&mut self, path: &Path) -> Option<Arc<PointCloud>> {
        let cloud = self.entries.remove(path)?;
        self.ledger.retain(|p| p != path);
        Some(cloud)
    }

    /// Clear the entire cache.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ledger.clear();
    }

    /// Cached paths, least recently used first.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.ledger.iter().map(PathBuf::as_path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, path: &Path) {
        if let Some(pos) = self.ledger.iter().position(|p| p == path) {
            if let Some(p) = self.ledger.remove(pos) {
                self.ledger.push_back(p);
            }
        }
    }
}

impl Default for RecencyCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Vec3;

    fn cloud(n: usize) -> PointCloud {
        let mut c = PointCloud::new();
        for i in 0..n {
            c.push_white(Vec3::splat(i as f32));
        }
        c
    }

    #[test]
    fn test_cache_insert_get() {
        let mut cache = RecencyCache::default();
        cache.put("a.ply", cloud(3));

        let hit = cache.get(Path::new("a.ply")).expect("cached");
        assert_eq!(hit.len(), 3);
        assert!(cache.get(Path::new("b.ply")).is_none());
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let mut cache = RecencyCache::default();
        for i in 0..6 {
            cache.put(format!("{i}.xyz"), cloud(1));
        }
        assert_eq!(cache.len(), 5);
        assert!(!cache.contains(Path::new("0.xyz")));
        assert!(cache.contains(Path::new("1.xyz")));
        assert!(cache.contains(Path::new("5.xyz")));
    }

    #[test]
    fn test_cache_get_refreshes_recency() {
        let mut cache = RecencyCache::default();
        for i in 0..5 {
            cache.put(format!("{i}.xyz"), cloud(1));
        }
        // Touch the second-inserted path before the 6th insert
        assert!(cache.get(Path::new("1.xyz")).is_some());
        cache.put("5.xyz", cloud(1));

        assert!(!cache.contains(Path::new("0.xyz")));
        assert!(cache.contains(Path::new("1.xyz")));

        // Next eviction takes the oldest untouched entry
        cache.put("6.xyz", cloud(1));
        assert!(!cache.contains(Path::new("2.xyz")));
        assert!(cache.contains(Path::new("1.xyz")));
    }

    #[test]
    fn test_cache_overwrite_moves_to_tail() {
        let mut cache = RecencyCache::with_capacity(2);
        cache.put("a", cloud(1));
        cache.put("b", cloud(1));
        cache.put("a", cloud(4));
        cache.put("c", cloud(1));

        assert!(!cache.contains(Path::new("b")));
        assert_eq!(cache.get(Path::new("a")).map(|c| c.len()), Some(4));
        let order: Vec<_> = cache.paths().collect();
        assert_eq!(order, vec![Path::new("c"), Path::new("a")]);
    }

    #[test]
    fn test_cache_shared_entries() {
        let mut cache = RecencyCache::default();
        cache.put("a", cloud(2));
        let first = cache.get(Path::new("a")).unwrap();
        let second = cache.get(Path::new("a")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_remove_clear() {
        let mut cache = RecencyCache::with_capacity(0);
        assert_eq!(cache.capacity(), 1);
        cache.put("a", cloud(1));
        assert!(cache.remove(Path::new("a")).is_some());
        assert!(cache.is_empty());
        assert_eq!(cache.paths().count(), 0);

        cache.put("b", cloud(1));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(Path::new("b")).is_none());
    }
}
