use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::info;

use super::types::{HistoryEntry, NewHistoryEntry};
use crate::error::{CaneScanError, Result};

/// Maximum number of saved results; the oldest is evicted beyond this.
pub const HISTORY_CAPACITY: usize = 50;

/// Namespace every key of this application is stored under.
pub const APP_NAMESPACE: &str = "canescan";

const HISTORY_KEY: &str = "history";

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Capped history of classification results.
///
/// The list is stored as one JSON string under `(namespace, "history")` in a
/// SQLite key-value table, newest entry first. Writes take an immediate
/// transaction, so stores opened on the same file by different callers never
/// overwrite each other's entries. All operations are synchronous
/// (rusqlite is blocking). Callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub struct HistoryStore {
    conn: Connection,
    namespace: String,
    capacity: usize,
}

impl HistoryStore {
    /// Create or open the history database.
    /// Typically called with: app.path().app_data_dir()?.join("canescan.db")
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CaneScanError::History(format!("Failed to create data dir: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            );",
        )?;

        info!("Opened history database at {:?}", db_path);
        Ok(Self {
            conn,
            namespace: APP_NAMESPACE.to_string(),
            capacity: HISTORY_CAPACITY,
        })
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.read_entries(&self.conn)
    }

    fn read_entries(&self, conn: &Connection) -> Result<Vec<HistoryEntry>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_store WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, HISTORY_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| CaneScanError::History(format!("Stored history is corrupt: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.list()?.is_empty())
    }

    pub fn get(&self, id: i64) -> Result<Option<HistoryEntry>> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    /// Prepend a new entry, evicting the oldest ones beyond capacity.
    pub fn save(&self, new: NewHistoryEntry) -> Result<HistoryEntry> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut entries = self.read_entries(&tx)?;

        let now = Utc::now();
        let newest_id = entries.iter().map(|e| e.id).max().unwrap_or(i64::MIN);
        let id = now.timestamp_millis().max(newest_id.saturating_add(1));

        let entry = HistoryEntry {
            id,
            timestamp: now.to_rfc3339(),
            image: new.image,
            disease: new.disease,
            confidence: new.confidence,
            confidence_percent: format!("{:.2}", new.confidence * 100.0),
        };

        entries.insert(0, entry.clone());
        let evicted = entries.len().saturating_sub(self.capacity);
        entries.truncate(self.capacity);
        self.write(&tx, &entries)?;
        tx.commit()?;

        info!(
            "Saved history entry {} ({}, {}%), {} evicted",
            entry.id, entry.disease, entry.confidence_percent, evicted
        );
        Ok(entry)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<()> {
        self.write(&self.conn, &[])?;
        info!("Cleared history");
        Ok(())
    }

    fn write(&self, conn: &Connection, entries: &[HistoryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| CaneScanError::History(format!("Failed to serialize history: {}", e)))?;
        conn.execute(
            "INSERT INTO kv_store (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.namespace, HISTORY_KEY, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (HistoryStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(&dir.path().join("canescan.db")).unwrap();
        (store, dir)
    }

    fn entry(disease: &str, confidence: f32) -> NewHistoryEntry {
        NewHistoryEntry {
            disease: disease.to_string(),
            confidence,
            image: Some("data:image/jpeg;base64,AAAA".to_string()),
        }
    }

    #[test]
    fn test_empty_store() {
        let (store, _dir) = create_test_store();
        assert!(store.list().unwrap().is_empty());
        assert!(store.get(1).unwrap().is_none());
    }

    #[test]
    fn test_save_fills_derived_fields() {
        let (store, _dir) = create_test_store();
        let saved = store.save(entry("Rust", 0.87654)).unwrap();

        assert_eq!(saved.disease, "Rust");
        assert_eq!(saved.confidence_percent, "87.65");
        assert!(chrono::DateTime::parse_from_rfc3339(&saved.timestamp).is_ok());
        assert_eq!(store.get(saved.id).unwrap(), Some(saved));
    }

    #[test]
    fn test_newest_first_with_increasing_ids() {
        let (store, _dir) = create_test_store();
        let a = store.save(entry("Healthy", 0.9)).unwrap();
        let b = store.save(entry("Mosaic", 0.8)).unwrap();
        let c = store.save(entry("Yellow", 0.7)).unwrap();

        assert!(a.id < b.id && b.id < c.id);
        let ids: Vec<i64> = store.list().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (store, _dir) = create_test_store();
        let first = store.save(entry("Healthy", 0.5)).unwrap();
        for _ in 1..HISTORY_CAPACITY {
            store.save(entry("Rust", 0.5)).unwrap();
        }
        assert_eq!(store.len().unwrap(), HISTORY_CAPACITY);
        assert!(store.get(first.id).unwrap().is_some());

        let newest = store.save(entry("Redrot", 0.5)).unwrap();
        let entries = store.list().unwrap();
        assert_eq!(entries.len(), HISTORY_CAPACITY);
        assert_eq!(entries[0].id, newest.id);
        assert!(store.get(first.id).unwrap().is_none());
    }

    #[test]
    fn test_custom_capacity() {
        let (store, _dir) = create_test_store();
        let store = store.with_capacity(2);
        store.save(entry("Healthy", 0.1)).unwrap();
        store.save(entry("Mosaic", 0.2)).unwrap();
        store.save(entry("Redrot", 0.3)).unwrap();

        let diseases: Vec<String> = store.list().unwrap().into_iter().map(|e| e.disease).collect();
        assert_eq!(diseases, vec!["Redrot", "Mosaic"]);
    }

    #[test]
    fn test_save_then_clear_is_empty() {
        let (store, _dir) = create_test_store();
        store.save(entry("Rust", 0.6)).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("canescan.db");
        let saved = HistoryStore::new(&path).unwrap().save(entry("Mosaic", 0.75)).unwrap();

        let reopened = HistoryStore::new(&path).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![saved]);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("canescan.db");
        let a = HistoryStore::new(&path).unwrap();
        let b = HistoryStore::new(&path).unwrap().with_namespace("other");

        a.save(entry("Rust", 0.6)).unwrap();
        assert_eq!(a.len().unwrap(), 1);
        assert!(b.is_empty().unwrap());
    }

    #[test]
    fn test_stored_json_uses_camel_case_schema() {
        let (store, _dir) = create_test_store();
        store.save(entry("Rust", 0.6)).unwrap();
        let json: String = store
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE namespace = ?1 AND key = ?2",
                params![APP_NAMESPACE, HISTORY_KEY],
                |row| row.get(0),
            )
            .unwrap();
        assert!(json.contains("\"confidencePercent\":\"60.00\""));
        assert!(json.contains("\"disease\":\"Rust\""));
    }

    #[test]
    fn test_concurrent_saves_from_separate_connections_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("canescan.db");
        HistoryStore::new(&path).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .map(|i| {
                            HistoryStore::new(&path)
                                .and_then(|store| store.save(entry(&format!("T{t}-{i}"), 0.5)))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut saved = Vec::new();
        for handle in handles {
            for result in handle.join().unwrap() {
                saved.push(result.unwrap());
            }
        }

        let entries = HistoryStore::new(&path).unwrap().list().unwrap();
        assert_eq!(entries.len(), 40);
        let mut ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 40);
        for s in &saved {
            assert!(entries.contains(s), "lost entry {}", s.id);
        }
    }

    #[test]
    fn test_ids_stay_ordered_with_newest_first() {
        let (store, _dir) = create_test_store();
        for i in 0..20 {
            store.save(entry("Rust", i as f32 / 20.0)).unwrap();
        }
        let ids: Vec<i64> = store.list().unwrap().iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] > w[1]));
    }
}
