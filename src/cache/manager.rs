//! Time-boxed cache on top of a key/value store
//!
//! Provides a `TimedCache` that stores serializable data as JSON under its key
//! and the write time under `<key>_ts`, treating stale or malformed entries as
//! cache misses rather than errors.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use crate::store::KeyValueStore;

/// How long a cache entry stays usable after it was written
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Suffix of the slot holding an entry's write timestamp
const TIMESTAMP_SUFFIX: &str = "_ts";

/// Reads and writes time-stamped entries in a [`KeyValueStore`]
///
/// An entry is two slots: `<key>` holds the JSON value and `<key>_ts` holds
/// the write time in milliseconds since the epoch. A read only returns the
/// value while `now - written_at < ttl`. Stale bytes are left in place until
/// the next write overwrites them.
#[derive(Clone)]
pub struct TimedCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl std::fmt::Debug for TimedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TimedCache {
    /// Creates a cache over `store` using wall-clock time and the default TTL
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ttl: CACHE_TTL,
        }
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the time-to-live
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn timestamp_key(key: &str) -> String {
        format!("{}{}", key, TIMESTAMP_SUFFIX)
    }

    /// Reads a fresh entry
    ///
    /// Returns `None` when the value or its timestamp is missing, when either
    /// cannot be parsed, or when the entry is at least `ttl` old. A stored JSON
    /// `null` is a present value and comes back as `Some` for `T = Value`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        let written_at: i64 = self
            .store
            .get(&Self::timestamp_key(key))?
            .trim()
            .parse()
            .ok()?;

        let age_ms = self.clock.now_ms().saturating_sub(written_at);
        if i128::from(age_ms) >= self.ttl.as_millis() as i128 {
            debug!(key, age_ms, "cache entry expired");
            return None;
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "ignoring malformed cache entry");
                None
            }
        }
    }

    /// Writes `data` under `key` stamped with the current time
    ///
    /// Failures are logged and otherwise ignored; a missing entry only costs a
    /// refetch.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        let json = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache entry");
                return;
            }
        };

        let now = self.clock.now_ms().to_string();
        let result = self
            .store
            .set(key, &json)
            .and_then(|()| self.store.set(&Self::timestamp_key(key), &now));

        if let Err(e) = result {
            warn!(key, error = %e, "failed to persist cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::store::{FileStore, MemoryStore};
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    const START_MS: i64 = 1_700_000_000_000;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn create_test_cache() -> (TimedCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(START_MS));
        let cache = TimedCache::new(store.clone()).with_clock(clock.clone());
        (cache, store, clock)
    }

    #[test]
    fn test_write_stores_value_and_timestamp_slots() {
        let (cache, store, _clock) = create_test_cache();

        cache.write("products", &json!([{"id": "1"}]));

        assert_eq!(store.get("products").as_deref(), Some(r#"[{"id":"1"}]"#));
        assert_eq!(store.get("products_ts"), Some(START_MS.to_string()));
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _store, _clock) = create_test_cache();
        let result: Option<TestData> = cache.read("nonexistent_key");
        assert!(result.is_none());
    }

    #[test]
    fn test_read_returns_fresh_entry() {
        let (cache, _store, clock) = create_test_cache();
        let data = TestData {
            name: "fresh".to_string(),
            value: 100,
        };

        cache.write("fresh_key", &data);
        clock.advance(Duration::from_secs(600));

        assert_eq!(cache.read::<TestData>("fresh_key"), Some(data));
    }

    #[test]
    fn test_entry_expires_exactly_at_ttl() {
        let (cache, _store, clock) = create_test_cache();
        cache.write("key", &json!({"id": "1"}));

        clock.advance(CACHE_TTL - Duration::from_millis(1));
        assert!(cache.read::<Value>("key").is_some(), "Just under TTL is usable");

        clock.advance(Duration::from_millis(1));
        assert!(cache.read::<Value>("key").is_none(), "At TTL the entry is stale");
    }

    #[test]
    fn test_stale_entry_is_replaced_by_next_write() {
        let (cache, _store, clock) = create_test_cache();
        cache.write("key", &json!(1));
        clock.advance(CACHE_TTL * 2);
        assert!(cache.read::<Value>("key").is_none());

        cache.write("key", &json!(2));
        assert_eq!(cache.read::<Value>("key"), Some(json!(2)));
    }

    #[test]
    fn test_missing_timestamp_reads_as_absent() {
        let (cache, store, _clock) = create_test_cache();
        store.set("orphan", "[1,2,3]").unwrap();
        assert!(cache.read::<Value>("orphan").is_none());
    }

    #[test]
    fn test_corrupt_timestamp_reads_as_absent() {
        let (cache, store, _clock) = create_test_cache();
        store.set("key", "[1]").unwrap();
        store.set("key_ts", "yesterday").unwrap();
        assert!(cache.read::<Value>("key").is_none());
    }

    #[test]
    fn test_corrupt_value_reads_as_absent() {
        let (cache, store, _clock) = create_test_cache();
        store.set("key", "{not json").unwrap();
        store.set("key_ts", &START_MS.to_string()).unwrap();
        assert!(cache.read::<Value>("key").is_none());
    }

    #[test]
    fn test_value_of_wrong_shape_reads_as_absent() {
        let (cache, _store, _clock) = create_test_cache();
        cache.write("key", &json!({"unexpected": true}));
        assert!(cache.read::<TestData>("key").is_none());
    }

    #[test]
    fn test_null_value_is_distinct_from_absent() {
        let (cache, _store, _clock) = create_test_cache();
        cache.write("key", &Value::Null);
        assert_eq!(cache.read::<Value>("key"), Some(Value::Null));
    }

    #[test]
    fn test_timestamp_ahead_of_clock_counts_as_fresh() {
        let (cache, store, _clock) = create_test_cache();
        store.set("key", "1").unwrap();
        store.set("key_ts", &(START_MS + 60_000).to_string()).unwrap();
        assert_eq!(cache.read::<Value>("key"), Some(json!(1)));
    }

    #[test]
    fn test_custom_ttl_is_honoured() {
        let (cache, _store, clock) = create_test_cache();
        let cache = cache.with_ttl(Duration::from_secs(5));
        cache.write("key", &json!("v"));

        clock.advance(Duration::from_secs(5));

        assert!(cache.read::<Value>("key").is_none());
    }

    #[test]
    fn test_overwrite_existing_entry() {
        let (cache, _store, _clock) = create_test_cache();
        cache.write("key", &json!("first"));
        cache.write("key", &json!("second"));
        assert_eq!(cache.read::<Value>("key"), Some(json!("second")));
    }

    #[test]
    fn test_entries_survive_reopening_a_file_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let clock = Arc::new(ManualClock::new(START_MS));
        let data = TestData {
            name: "persisted".to_string(),
            value: 7,
        };

        let first = TimedCache::new(Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())))
            .with_clock(clock.clone());
        first.write("persisted_key", &data);

        let second = TimedCache::new(Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())))
            .with_clock(clock);
        assert_eq!(second.read::<TestData>("persisted_key"), Some(data));
    }
}
