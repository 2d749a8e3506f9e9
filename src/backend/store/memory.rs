/**
 * In-Memory Document Store
 *
 * HashMap-backed store with the same contract as the filesystem backend.
 * Used by unit and integration tests, and by demos that should not touch
 * disk. The `set_unavailable` switch simulates a backend outage so callers
 * can exercise their `Unavailable` paths.
 */
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{validate_key, validate_prefix, DocumentStore, StoreError};

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Value>>,
    unavailable: AtomicBool,
    failing_writes: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage: while set, every operation fails with
    /// `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make writes under one key prefix fail while reads keep working
    ///
    /// Lets tests exercise best-effort secondary writes without taking the
    /// whole backend down.
    pub fn fail_writes_under(&self, prefix: &str) {
        self.failing_writes
            .lock()
            .unwrap()
            .insert(prefix.to_string());
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn check_available(&self, key: &str) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(key, "backend offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        validate_key(key)?;
        self.check_available(key)?;
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        validate_key(key)?;
        self.check_available(key)?;
        let refused = self
            .failing_writes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()));
        if refused {
            return Err(StoreError::unavailable(key, "write refused"));
        }
        self.documents
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn list_dir(&self, prefix: &str) -> Result<Vec<Value>, StoreError> {
        let prefix = validate_prefix(prefix)?;
        self.check_available(prefix)?;
        let under = format!("{}/", prefix);
        let documents = self.documents.read().await;
        let mut keys: Vec<&String> = documents
            .keys()
            .filter(|key| key.starts_with(&under))
            .collect();
        keys.sort();
        Ok(keys
            .into_iter()
            .map(|key| documents[key].clone())
            .collect())
    }
}
