/**
 * Filesystem Document Store
 *
 * One JSON file per key under a root directory. The key is the relative
 * path, so `shows/summer-fest/running_order.json` lives at exactly that path
 * under the root. A write stages the new bytes beside the final path and
 * renames them into place, so the file at a key is always one whole write;
 * there is still no locking between writers, and the last write wins.
 */
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use uuid::Uuid;

use super::{validate_key, validate_prefix, DocumentStore, StoreError};

/// Filesystem-backed document store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if missing
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::unavailable(root.to_string_lossy(), e))?;
        tracing::info!("[Store] Opened data directory at {}", root.display());
        Ok(Self { root })
    }

    /// The data directory this store reads and writes under
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Recover the key for a path inside the root, for error messages
    fn key_for(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    async fn read_file(&self, path: &Path, key: &str) -> Result<Value, StoreError> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| StoreError::unavailable(key, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(key, e))
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::unavailable(key, e)),
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(key, e))?;
        Ok(Some(value))
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::unavailable(key, e))?;
        }
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::corrupt(key, e))?;
        // Stage to a uniquely named sibling, then rename into place. Keeps
        // the rename on one filesystem and lands each write whole even when
        // two writers race the same key.
        let staged = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&staged, bytes)
            .await
            .map_err(|e| StoreError::unavailable(key, e))?;
        fs::rename(&staged, &path)
            .await
            .map_err(|e| StoreError::unavailable(key, e))?;
        tracing::debug!("[Store] Wrote {}", key);
        Ok(())
    }

    async fn list_dir(&self, prefix: &str) -> Result<Vec<Value>, StoreError> {
        let prefix = validate_prefix(prefix)?;
        let dir = self.root.join(prefix);

        // Walk iteratively; async recursion would need boxing.
        let mut pending = vec![dir];
        let mut files = Vec::new();
        while let Some(current) = pending.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::unavailable(prefix, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::unavailable(prefix, e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StoreError::unavailable(prefix, e))?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else {
                    let path = entry.path();
                    // Staged writes carry a `.tmp` suffix and are not
                    // documents yet.
                    if path.extension().map_or(true, |ext| ext != "tmp") {
                        files.push(path);
                    }
                }
            }
        }

        files.sort();
        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let key = self.key_for(&path);
            documents.push(self.read_file(&path, &key).await?);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    async fn store() -> (tempfile::TempDir, FsStore) {
        let dir = tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_read_absent_key_is_none() {
        let (_dir, store) = store().await;
        assert_eq!(store.read("shows/never-written.json").await.unwrap(), None);
        let value = store
            .read_or("shows/never-written.json", json!([]))
            .await
            .unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (_dir, store) = store().await;
        let order = json!([{"artist": "The Hollow Suns", "slot": 1}]);
        store
            .write("shows/summer-fest/running_order.json", &order)
            .await
            .unwrap();
        let back = store
            .read("shows/summer-fest/running_order.json")
            .await
            .unwrap();
        assert_eq!(back, Some(order));
    }

    #[tokio::test]
    async fn test_write_replaces_fully() {
        let (_dir, store) = store().await;
        store
            .write("shows/x/meta.json", &json!({"name": "X", "venue": "Hall A"}))
            .await
            .unwrap();
        store
            .write("shows/x/meta.json", &json!({"name": "X2"}))
            .await
            .unwrap();
        let back = store.read("shows/x/meta.json").await.unwrap().unwrap();
        // no merge: the venue field from the first write is gone
        assert_eq!(back, json!({"name": "X2"}));
    }

    #[tokio::test]
    async fn test_list_dir_in_key_order() {
        let (_dir, store) = store().await;
        store
            .write("shows/x/alerts/log/002.json", &json!({"seq": 2}))
            .await
            .unwrap();
        store
            .write("shows/x/alerts/log/001.json", &json!({"seq": 1}))
            .await
            .unwrap();
        store
            .write("shows/x/alerts/log/003.json", &json!({"seq": 3}))
            .await
            .unwrap();
        let listed = store.list_dir("shows/x/alerts/log/").await.unwrap();
        assert_eq!(listed, vec![json!({"seq": 1}), json!({"seq": 2}), json!({"seq": 3})]);
    }

    #[tokio::test]
    async fn test_list_dir_missing_prefix_is_empty() {
        let (_dir, store) = store().await;
        assert!(store.list_dir("shows/none/alerts").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_dir_recurses() {
        let (_dir, store) = store().await;
        store.write("shows/a/meta.json", &json!({"id": "a"})).await.unwrap();
        store.write("shows/b/meta.json", &json!({"id": "b"})).await.unwrap();
        let listed = store.list_dir("shows").await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_list_dir_skips_staged_files() {
        let (dir, store) = store().await;
        store
            .write("shows/x/alerts/log/001.json", &json!({"seq": 1}))
            .await
            .unwrap();
        // A half-written staged file left behind by a crash mid-write.
        tokio::fs::write(
            dir.path().join("shows/x/alerts/log/002.deadbeef.tmp"),
            b"{\"seq\":",
        )
        .await
        .unwrap();

        let listed = store.list_dir("shows/x/alerts/log/").await.unwrap();
        assert_eq!(listed, vec![json!({"seq": 1})]);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_distinct_error() {
        let (dir, store) = store().await;
        let path = dir.path().join("shows/x/meta.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        match store.read("shows/x/meta.json").await {
            Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, "shows/x/meta.json"),
            other => panic!("Expected Corrupt, got {:?}", other),
        }
        match store.list_dir("shows/x").await {
            Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, "shows/x/meta.json"),
            other => panic!("Expected Corrupt, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_dir, store) = store().await;
        for key in ["../outside.json", "/abs.json", "a/../../b.json", ""] {
            match store.read(key).await {
                Err(StoreError::InvalidKey { .. }) => {}
                other => panic!("Expected InvalidKey for {:?}, got {:?}", key, other),
            }
        }
        match store.write("../outside.json", &json!(1)).await {
            Err(StoreError::InvalidKey { .. }) => {}
            other => panic!("Expected InvalidKey, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_interleaved_read_modify_write_loses_one_update() {
        let (_dir, store) = store().await;
        let store = std::sync::Arc::new(store);
        store.write("shows/x/meta.json", &json!({"v": 0})).await.unwrap();

        // Force the interleave: both cycles read the original document
        // before either writes. One update must be lost, whole (last write
        // wins, never a merge). Which one wins depends on scheduling.
        let barrier = std::sync::Arc::new(tokio::sync::Barrier::new(2));
        let cycle = |field: &'static str| {
            let store = store.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                let mut doc = store.read("shows/x/meta.json").await.unwrap().unwrap();
                doc[field] = json!(true);
                barrier.wait().await;
                store.write("shows/x/meta.json", &doc).await.unwrap();
            })
        };
        let a = cycle("a");
        let b = cycle("b");
        a.await.unwrap();
        b.await.unwrap();

        let final_doc = store.read("shows/x/meta.json").await.unwrap().unwrap();
        let a_won = final_doc == json!({"v": 0, "a": true});
        let b_won = final_doc == json!({"v": 0, "b": true});
        assert!(a_won || b_won, "expected one whole update, got: {final_doc}");
    }

    #[tokio::test]
    async fn test_concurrent_writes_land_whole_documents() {
        let (_dir, store) = store().await;
        let store = std::sync::Arc::new(store);

        // A long order racing a short one. If a write could truncate the
        // file in place, the short payload would leave the long one's tail
        // behind and the key would stop parsing.
        let long_order = Value::Array(
            (0..2000)
                .map(|slot| json!({"artist": format!("act-{slot:04}"), "slot": slot}))
                .collect(),
        );
        let short_order = json!([{"artist": "solo-set", "slot": 1}]);

        for _ in 0..32 {
            let barrier = std::sync::Arc::new(tokio::sync::Barrier::new(2));
            let writer = |doc: Value| {
                let store = store.clone();
                let barrier = barrier.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    store
                        .write("shows/gala/running_order.json", &doc)
                        .await
                        .unwrap();
                })
            };
            let a = writer(long_order.clone());
            let b = writer(short_order.clone());
            a.await.unwrap();
            b.await.unwrap();

            let back = store
                .read("shows/gala/running_order.json")
                .await
                .unwrap()
                .unwrap();
            assert!(
                back == long_order || back == short_order,
                "read back a document neither writer wrote ({} bytes)",
                back.to_string().len()
            );
        }
    }
}
