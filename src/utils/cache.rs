// Time-to-live cache shared by the ranking and weather layers

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe map whose entries expire `ttl` after insertion
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a live value for `key`, None if missing or expired
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// dropping every expired one
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    /// Errors from `compute` are returned as-is and never cached.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drops every expired entry, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Number of stored entries, expired ones included until the next
    /// insert or purge
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), 7);
        assert_eq!(cache.get(&"k".to_string()), Some(7));
        assert_eq!(cache.get(&"other".to_string()), None);
    }

    #[test]
    fn test_zero_ttl_always_expired() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert(1u32, "value");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_evicts_expired_entries() {
        let cache = TtlCache::new(Duration::ZERO);
        for key in 0..100u32 {
            cache.insert(key, key);
        }
        assert_eq!(cache.len(), 1);

        let cache = TtlCache::new(Duration::from_secs(60));
        for key in 0..100u32 {
            cache.insert(key, key);
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60));
        let failed: Result<u32, &str> = cache.get_or_try_insert_with(1, || Err("boom"));
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let mut calls = 0;
        for _ in 0..3 {
            let value: Result<u32, &str> = cache.get_or_try_insert_with(1, || {
                calls += 1;
                Ok(42)
            });
            assert_eq!(value, Ok(42));
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, 1);
        cache.insert(2, 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
