//! JSON Data Loading and Caching
//!
//! Each resource lives in its own file under the data directory
//! (`animals.json`, `zones.json`, ...) with the records in a named root array:
//!
//! ```json
//! { "animals": [ { "id": "lion-001", ... } ] }
//! ```
//!
//! Loaded lists are kept in a Moka cache keyed by (file, root property,
//! record type) with an absolute TTL plus an idle timeout. A small key
//! registry makes it possible to drop every entry that came from one file.

use moka::future::Cache;
use moka::notification::RemovalCause;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub const ANIMALS_FILE: &str = "animals.json";
pub const ZONES_FILE: &str = "zones.json";
pub const ROUTES_FILE: &str = "routes.json";
pub const QUIZZES_FILE: &str = "quizzes.json";

type CachedList = Arc<dyn Any + Send + Sync>;
type KeyRegistry = Arc<Mutex<HashSet<String>>>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Expiry policy for cached lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Absolute lifetime of an entry
    pub time_to_live: Duration,
    /// Entry is dropped early when not read for this long
    pub time_to_idle: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            time_to_live: Duration::from_secs(300), // 5 min
            time_to_idle: Duration::from_secs(120), // 2 min
        }
    }
}

#[derive(Debug, Default)]
struct LoaderStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    file_reads: AtomicU64,
}

/// Point-in-time copy of the loader counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderStatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub file_reads: u64,
    pub cached_entries: u64,
}

/// Read-through cache over the JSON data directory
pub struct JsonDataStore {
    data_dir: PathBuf,
    cache: Cache<String, CachedList>,
    cache_keys: KeyRegistry,
    stats: LoaderStats,
}

impl JsonDataStore {
    pub fn new(data_dir: impl Into<PathBuf>, settings: CacheSettings) -> Self {
        let cache_keys: KeyRegistry = Arc::default();

        // Expired entries leave the registry too; explicit removals and
        // replacements are handled by the callers
        let registry = cache_keys.clone();
        let cache: Cache<String, CachedList> = Cache::builder()
            .time_to_live(settings.time_to_live)
            .time_to_idle(settings.time_to_idle)
            .eviction_listener(move |key: Arc<String>, _value: CachedList, cause: RemovalCause| {
                if cause.was_evicted() {
                    tracing::debug!("Cache entry {} expired ({:?})", key, cause);
                    lock_registry(&registry).remove(key.as_str());
                }
            })
            .build();

        Self {
            data_dir: data_dir.into(),
            cache,
            cache_keys,
            stats: LoaderStats::default(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the `root_property` array of `file_name` as a list of `T`
    ///
    /// - missing file or missing root property: empty list (not cached)
    /// - unreadable file, invalid JSON, or records not matching `T`: error
    pub async fn load<T>(&self, file_name: &str, root_property: &str) -> Result<Arc<Vec<T>>, DataError>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.stats.requests.fetch_add(1, Ordering::Relaxed);
        let type_name = short_type_name::<T>();
        let cache_key = cache_key(file_name, root_property, type_name);

        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(list) = cached.downcast::<Vec<T>>() {
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Cache hit for {} ({})", file_name, type_name);
                return Ok(list);
            }
        }

        let path = self.data_dir.join(file_name);
        self.stats.file_reads.fetch_add(1, Ordering::Relaxed);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("JSON file not found: {}", path.display());
                return Ok(Arc::new(Vec::new()));
            }
            Err(e) => {
                tracing::error!("Failed to read JSON file {}: {}", path.display(), e);
                return Err(DataError::Io { path, source: e });
            }
        };

        let mut document: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse JSON file {}: {}", file_name, e);
            DataError::Parse { file: file_name.to_string(), source: e }
        })?;

        let Some(array) = document.get_mut(root_property).map(Value::take) else {
            tracing::warn!("Property '{}' not found in {}", root_property, file_name);
            return Ok(Arc::new(Vec::new()));
        };

        let records: Vec<T> = serde_json::from_value(array).map_err(|e| {
            tracing::error!("Failed to deserialize {} records from {}: {}", type_name, file_name, e);
            DataError::Parse { file: file_name.to_string(), source: e }
        })?;

        let records = Arc::new(records);
        self.cache.insert(cache_key.clone(), records.clone() as CachedList).await;
        self.registry().insert(cache_key);

        tracing::info!("Loaded {} {} records from {}", records.len(), type_name, file_name);
        Ok(records)
    }

    /// Drop every cached list that was read from `file_name`
    pub async fn clear_cache(&self, file_name: &str) -> usize {
        let prefix = format!("{}:", file_name);
        let removed: Vec<String> = {
            let mut keys = self.registry();
            let matching: Vec<String> = keys.iter().filter(|k| k.starts_with(&prefix)).cloned().collect();
            for key in &matching {
                keys.remove(key);
            }
            matching
        };

        for key in &removed {
            self.cache.invalidate(key).await;
        }

        tracing::info!("Cleared {} cache entries for {}", removed.len(), file_name);
        removed.len()
    }

    /// Drop every cached list
    pub fn clear_all_cache(&self) -> usize {
        let count = {
            let mut keys = self.registry();
            let count = keys.len();
            keys.clear();
            count
        };
        self.cache.invalidate_all();

        tracing::info!("Cleared all JSON data cache entries ({})", count);
        count
    }

    pub fn stats(&self) -> LoaderStatsSnapshot {
        LoaderStatsSnapshot {
            requests: self.stats.requests.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            file_reads: self.stats.file_reads.load(Ordering::Relaxed),
            cached_entries: self.registry().len() as u64,
        }
    }

    fn registry(&self) -> MutexGuard<'_, HashSet<String>> {
        lock_registry(&self.cache_keys)
    }
}

fn lock_registry(registry: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    // The set only holds strings, a poisoned lock leaves it consistent
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn cache_key(file_name: &str, root_property: &str, type_name: &str) -> String {
    format!("{}:{}:{}", file_name, root_property, type_name)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Animal, Zone};
    use std::fs;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
    }

    #[tokio::test]
    async fn test_load_reads_root_array() {
        let store = JsonDataStore::new(fixtures_dir(), CacheSettings::default());
        let animals = store.load::<Animal>(ANIMALS_FILE, "animals").await.unwrap();

        assert_eq!(animals.len(), 3);
        assert!(animals.iter().any(|a| a.id == "lion-001"));
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let store = JsonDataStore::new(fixtures_dir(), CacheSettings::default());
        let first = store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();
        let second = store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = store.stats();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.file_reads, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cached_entries, 1);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDataStore::new(dir.path(), CacheSettings::default());

        let animals = store.load::<Animal>(ANIMALS_FILE, "animals").await.unwrap();
        assert!(animals.is_empty());
        assert_eq!(store.stats().cached_entries, 0);
    }

    #[tokio::test]
    async fn test_missing_root_property_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ZONES_FILE), r#"{ "areas": [] }"#).unwrap();
        let store = JsonDataStore::new(dir.path(), CacheSettings::default());

        let zones = store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();
        assert!(zones.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ZONES_FILE), r#"{ "zones": [ { "id": "#).unwrap();
        let store = JsonDataStore::new(dir.path(), CacheSettings::default());

        let result = store.load::<Zone>(ZONES_FILE, "zones").await;
        assert!(matches!(result, Err(DataError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_records_of_wrong_shape_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ZONES_FILE), r#"{ "zones": [ { "id": "z1" } ] }"#).unwrap();
        let store = JsonDataStore::new(dir.path(), CacheSettings::default());

        let result = store.load::<Zone>(ZONES_FILE, "zones").await;
        assert!(matches!(result, Err(DataError::Parse { ref file, .. }) if file == ZONES_FILE));
    }

    #[tokio::test]
    async fn test_clear_cache_only_drops_matching_file() {
        let store = JsonDataStore::new(fixtures_dir(), CacheSettings::default());
        store.load::<Animal>(ANIMALS_FILE, "animals").await.unwrap();
        store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();

        let removed = store.clear_cache(ANIMALS_FILE).await;
        assert_eq!(removed, 1);
        assert_eq!(store.stats().cached_entries, 1);

        store.load::<Animal>(ANIMALS_FILE, "animals").await.unwrap();
        store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();
        let stats = store.stats();
        assert_eq!(stats.file_reads, 3, "animals re-read, zones served from cache");
    }

    #[tokio::test]
    async fn test_clear_all_cache_forces_reload() {
        let store = JsonDataStore::new(fixtures_dir(), CacheSettings::default());
        store.load::<Animal>(ANIMALS_FILE, "animals").await.unwrap();
        store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();

        assert_eq!(store.clear_all_cache(), 2);
        store.load::<Animal>(ANIMALS_FILE, "animals").await.unwrap();
        assert_eq!(store.stats().file_reads, 3);
    }

    #[tokio::test]
    async fn test_reload_picks_up_changed_file_after_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ZONES_FILE);
        fs::write(&path, r#"{ "zones": [] }"#).unwrap();
        let store = JsonDataStore::new(dir.path(), CacheSettings::default());
        assert!(store.load::<Zone>(ZONES_FILE, "zones").await.unwrap().is_empty());

        fs::write(
            &path,
            r##"{ "zones": [ { "id": "z1", "nameZh": "區", "nameEn": "Zone", "description": "",
                "position": { "x": 1, "y": 2 }, "svgPathId": "zone-z1", "color": "#fff" } ] }"##,
        )
        .unwrap();
        assert!(store.load::<Zone>(ZONES_FILE, "zones").await.unwrap().is_empty(), "still cached");

        store.clear_cache(ZONES_FILE).await;
        assert_eq!(store.load::<Zone>(ZONES_FILE, "zones").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_leave_the_registry() {
        let settings = CacheSettings {
            time_to_live: Duration::from_millis(50),
            time_to_idle: Duration::from_millis(50),
        };
        let store = JsonDataStore::new(fixtures_dir(), settings);
        store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();
        assert_eq!(store.stats().cached_entries, 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        store.cache.run_pending_tasks().await;

        assert_eq!(store.stats().cached_entries, 0);
        assert_eq!(store.clear_cache(ZONES_FILE).await, 0);

        store.load::<Zone>(ZONES_FILE, "zones").await.unwrap();
        assert_eq!(store.stats().file_reads, 2);
        assert_eq!(store.stats().cached_entries, 1);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let store = JsonDataStore::new(fixtures_dir(), CacheSettings::default());
        let json = serde_json::to_value(store.stats()).unwrap();

        assert_eq!(json["fileReads"], 0);
        assert_eq!(json["cacheHits"], 0);
        assert_eq!(json["cachedEntries"], 0);
        assert!(json.get("file_reads").is_none());
    }

    #[test]
    fn test_cache_key_is_prefixed_by_file() {
        assert_eq!(cache_key("animals.json", "animals", "Animal"), "animals.json:animals:Animal");
        assert_eq!(short_type_name::<Animal>(), "Animal");
    }
}
