//! Durable key-value storage for the three store documents.
//!
//! Customers, settings and goals are independent JSON documents under stable
//! keys. Each is loaded once at startup and rewritten in full whenever its
//! collection changes.

use crate::seed;
use crate::store::{Collection, StoreObserver, StoreState};
use adalloc_core::{AdallocError, AdallocResult, AppSettings};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const CUSTOMERS_KEY: &str = "adalloc-customers";
pub const SETTINGS_KEY: &str = "adalloc-settings";
pub const GOALS_KEY: &str = "adalloc-goals";

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AdallocResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> AdallocResult<()>;

    /// Set aside an unreadable document under `<key>.corrupt` so a later
    /// write to `key` cannot destroy it.
    fn quarantine(&self, key: &str, raw: &str) -> AdallocResult<()> {
        self.put(&format!("{key}.corrupt"), raw)
    }
}

// ─── File store ────────────────────────────────────────────────────────────

/// One `<key>.json` file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AdallocResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AdallocError::Storage(format!("read {}: {e}", path.display()))),
        }
    }

    fn put(&self, key: &str, value: &str) -> AdallocResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Temp file then rename; readers never see a partial document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key = key, path = %path.display(), bytes = value.len(), "Document written");
        Ok(())
    }

    fn quarantine(&self, key: &str, _raw: &str) -> AdallocResult<()> {
        let path = self.path_for(key);
        let target = path.with_extension("json.corrupt");
        fs::rename(&path, &target)?;
        warn!(key = key, path = %target.display(), "Corrupt document moved aside");
        Ok(())
    }
}

// ─── Memory store ──────────────────────────────────────────────────────────

/// In-memory store backed by DashMap. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AdallocResult<Option<String>> {
        Ok(self.entries.get(key).map(|r| r.value().clone()))
    }

    fn put(&self, key: &str, value: &str) -> AdallocResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── Loading ───────────────────────────────────────────────────────────────

fn load_document<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key = key, error = %e, "Failed to read document, using fallback");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(key = key, error = %e, "Corrupt document, using fallback");
            if let Err(e) = store.quarantine(key, &raw) {
                error!(key = key, error = %e, "Failed to preserve corrupt document");
            }
            None
        }
    }
}

/// Load all three documents. Missing or unreadable customers fall back to
/// the seed dataset, settings to defaults, goals to an empty list.
pub fn load_state(store: &dyn KeyValueStore) -> StoreState {
    let customers = load_document(store, CUSTOMERS_KEY).unwrap_or_else(|| {
        info!("No stored customers, loading seed dataset");
        seed::seed_customers()
    });
    let settings = load_document(store, SETTINGS_KEY).unwrap_or_else(AppSettings::default);
    let goals = load_document(store, GOALS_KEY).unwrap_or_default();

    StoreState {
        customers,
        settings,
        goals,
    }
}

/// Serialize one collection of `state` under its key.
pub fn save_collection(
    store: &dyn KeyValueStore,
    collection: Collection,
    state: &StoreState,
) -> AdallocResult<()> {
    let (key, json) = match collection {
        Collection::Customers => (CUSTOMERS_KEY, serde_json::to_string(&state.customers)?),
        Collection::Settings => (SETTINGS_KEY, serde_json::to_string(&state.settings)?),
        Collection::Goals => (GOALS_KEY, serde_json::to_string(&state.goals)?),
    };
    store.put(key, &json)
}

/// Writes the changed document after every store commit. Failures are
/// logged and never reach the mutation that triggered them.
pub struct PersistenceObserver {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceObserver {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl StoreObserver for PersistenceObserver {
    fn on_commit(&self, collection: Collection, state: &StoreState) {
        if let Err(e) = save_collection(self.store.as_ref(), collection, state) {
            metrics::counter!("store.persist_errors").increment(1);
            error!(collection = ?collection, error = %e, "Failed to persist collection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BudgetStore;

    #[test]
    fn test_empty_store_falls_back_to_seed() {
        let kv = MemoryStore::new();
        let state = load_state(&kv);
        assert!(!state.customers.is_empty());
        assert_eq!(state.settings, AppSettings::default());
        assert!(state.goals.is_empty());
    }

    #[test]
    fn test_corrupt_document_falls_back() {
        let kv = MemoryStore::new();
        kv.put(SETTINGS_KEY, "{not json").unwrap();
        kv.put(GOALS_KEY, "[]").unwrap();
        let state = load_state(&kv);
        assert_eq!(state.settings, AppSettings::default());
    }

    #[test]
    fn test_corrupt_customers_are_preserved() {
        let kv = MemoryStore::new();
        // non-finite figures serialize as null and no longer parse
        let raw = r#"[{"id": "cust-mine", "name": "Mine", "totalBudget": null}]"#;
        kv.put(CUSTOMERS_KEY, raw).unwrap();

        let state = load_state(&kv);
        assert!(state.customers.iter().all(|c| c.id != "cust-mine"));
        let ids: Vec<_> = state.customers.iter().map(|c| c.id.clone()).collect();
        let seed_ids: Vec<_> = seed::seed_customers().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, seed_ids);
        assert_eq!(kv.get("adalloc-customers.corrupt").unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn test_file_store_moves_corrupt_document_aside() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileStore::new(dir.path());
        kv.put(CUSTOMERS_KEY, "[{\"id\": ").unwrap();

        let state = load_state(&kv);
        assert!(!state.customers.is_empty());

        let kept = dir.path().join("adalloc-customers.json.corrupt");
        assert_eq!(fs::read_to_string(kept).unwrap(), "[{\"id\": ");
        assert!(kv.get(CUSTOMERS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_observer_persists_each_commit() {
        let kv: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let mut store = BudgetStore::new(load_state(kv.as_ref()));
        store.subscribe(Box::new(PersistenceObserver::new(kv.clone())));

        store.set_channel_spend("cust-acme", "camp-acme-q4", "google", 25_000.0).unwrap();

        let reloaded = load_state(kv.as_ref());
        assert_eq!(reloaded.customers, store.customers());
        let ch = reloaded.customers[0].campaigns[0].channel("google").unwrap();
        assert!((ch.spend - 25_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileStore::new(dir.path().join("data"));
        assert!(kv.get(CUSTOMERS_KEY).unwrap().is_none());

        let state = load_state(&kv);
        save_collection(&kv, Collection::Customers, &state).unwrap();
        save_collection(&kv, Collection::Goals, &state).unwrap();

        assert!(dir.path().join("data").join("adalloc-customers.json").exists());
        let reloaded = load_state(&kv);
        assert_eq!(reloaded.customers, state.customers);
    }
}
