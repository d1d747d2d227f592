//! Cache storage.
//!
//! A key-value store whose entries each carry their own sliding expiration:
//! every successful read pushes the deadline out by the entry's duration again.

use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

#[derive(Debug, Clone)]
struct Timed<V> {
    value: V,
    ttl: Duration,
}

struct SlidingExpiry;

impl<K, V> Expiry<K, Timed<V>> for SlidingExpiry {
    fn expire_after_create(&self, _key: &K, value: &Timed<V>, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_read(
        &self,
        _key: &K,
        value: &Timed<V>,
        _read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        value: &Timed<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Expiring key-value cache backed by `moka`.
///
/// Writers replace whole values, so a concurrent reader observes either the
/// previous or the new value, never a mix of both.
pub struct ExpiringStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Cache<K, Timed<V>>,
}

impl<K, V> ExpiringStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a store holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(SlidingExpiry)
            .build();
        Self { entries }
    }

    /// Return the live value for `key`, restarting its expiration window.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value)
    }

    /// Create or replace the value for `key` with a fresh expiration window of `ttl`.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(key, Timed { value, ttl });
    }

    pub fn remove(&self, key: &K) {
        self.entries.invalidate(key);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn set_get_remove_roundtrip() {
        let store = ExpiringStore::<String, u32>::new(16);

        assert!(store.get(&"a".to_string()).is_none());

        store.set("a".to_string(), 1, Duration::from_secs(60));
        assert_eq!(store.get(&"a".to_string()), Some(1));

        store.set("a".to_string(), 2, Duration::from_secs(60));
        assert_eq!(store.get(&"a".to_string()), Some(2));

        store.remove(&"a".to_string());
        assert!(store.get(&"a".to_string()).is_none());
    }

    #[test]
    fn entry_expires_when_idle() {
        let store = ExpiringStore::<u8, &'static str>::new(16);
        store.set(1, "short", Duration::from_millis(100));

        thread::sleep(Duration::from_millis(300));

        assert!(store.get(&1).is_none());
    }

    #[test]
    fn reads_slide_the_expiration_window() {
        let store = ExpiringStore::<u8, &'static str>::new(16);
        store.set(1, "sliding", Duration::from_millis(400));

        for _ in 0..4 {
            thread::sleep(Duration::from_millis(150));
            assert_eq!(store.get(&1), Some("sliding"));
        }
    }

    #[test]
    fn durations_are_per_entry() {
        let store = ExpiringStore::<u8, &'static str>::new(16);
        store.set(1, "short", Duration::from_millis(100));
        store.set(2, "long", Duration::from_secs(60));

        thread::sleep(Duration::from_millis(300));

        assert!(store.get(&1).is_none());
        assert_eq!(store.get(&2), Some("long"));
    }

    #[test]
    fn clear_drops_everything() {
        let store = ExpiringStore::<u8, u8>::new(16);
        store.set(1, 1, Duration::from_secs(60));
        store.set(2, 2, Duration::from_secs(60));

        store.clear();

        assert!(store.get(&1).is_none());
        assert!(store.get(&2).is_none());
    }

    #[test]
    fn concurrent_writers_leave_a_whole_value() {
        let store = Arc::new(ExpiringStore::<u8, Vec<u32>>::new(16));

        let handles: Vec<_> = (0..8u32)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.set(1, vec![n; 32], Duration::from_secs(60));
                        if let Some(value) = store.get(&1) {
                            assert_eq!(value.len(), 32);
                            assert!(value.iter().all(|item| *item == value[0]));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread should finish");
        }

        assert!(store.contains(&1));
    }
}
