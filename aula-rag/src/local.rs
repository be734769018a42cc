//! Vector store persisted as JSON files in a local directory.
//!
//! The directory holds two files:
//!
//! - `records.json`: every [`VectorRecord`] in insertion order
//! - `manifest.json`: the embedding model id and dimensions the records were built with
//!
//! Both are rewritten whole on every change, through a `.tmp` sibling that is
//! renamed over the target. The layout is private to this module.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::document::{MetadataFilter, SearchResult, VectorRecord};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank};

const BACKEND: &str = "Local";
const RECORDS_FILE: &str = "records.json";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Manifest {
    model_id: String,
    dimensions: usize,
}

/// A [`VectorStore`] that survives process restarts.
///
/// Records are held in memory and searched exhaustively; every insert or
/// clear is written through to disk before it returns.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::LocalVectorStore;
///
/// let store = LocalVectorStore::open("rag_store").await?;
/// ```
#[derive(Debug)]
pub struct LocalVectorStore {
    dir: PathBuf,
    records: RwLock<Vec<VectorRecord>>,
    manifest: RwLock<Option<Manifest>>,
}

impl LocalVectorStore {
    /// Open the store in `dir`, creating the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreUnavailable`] if the directory cannot be
    /// created or the existing files cannot be read or parsed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!(dir = %dir.display(), error = %e, "failed to create store directory");
            RagError::store(BACKEND, format!("cannot create {}: {e}", dir.display()))
        })?;

        let records: Vec<VectorRecord> = read_json(&dir.join(RECORDS_FILE)).await?.unwrap_or_default();
        let manifest: Option<Manifest> = read_json(&dir.join(MANIFEST_FILE)).await?;
        info!(dir = %dir.display(), count = records.len(), "opened local vector store");

        Ok(Self { dir, records: RwLock::new(records), manifest: RwLock::new(manifest) })
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(RagError::store(BACKEND, format!("cannot read {}: {e}", path.display())));
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| RagError::store(BACKEND, format!("corrupt {}: {e}", path.display())))
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value)
        .map_err(|e| RagError::store(BACKEND, format!("cannot serialize {}: {e}", path.display())))?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| RagError::store(BACKEND, format!("cannot write {}: {e}", tmp_path.display())))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| RagError::store(BACKEND, format!("cannot replace {}: {e}", path.display())))?;
    debug!(path = %path.display(), "wrote store file");
    Ok(())
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    fn backend(&self) -> &str {
        BACKEND
    }

    async fn prepare(&self, model_id: &str, dimensions: usize) -> Result<()> {
        let requested = Manifest { model_id: model_id.to_string(), dimensions };
        // Lock order: records, then manifest.
        let records = self.records.read().await;
        let mut manifest = self.manifest.write().await;
        match manifest.as_ref() {
            Some(existing) if *existing == requested => Ok(()),
            Some(existing) if !records.is_empty() => Err(RagError::Config(format!(
                "store at {} was built with {} ({} dims), not {} ({} dims); clear it or use the same embedder",
                self.dir.display(),
                existing.model_id,
                existing.dimensions,
                requested.model_id,
                requested.dimensions
            ))),
            _ => {
                write_json(&self.dir.join(MANIFEST_FILE), &requested).await?;
                debug!(model_id = %requested.model_id, dimensions, "bound store to embedder");
                *manifest = Some(requested);
                Ok(())
            }
        }
    }

    async fn insert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut stored = self.records.write().await;
        let previous_len = stored.len();
        stored.extend_from_slice(records);
        if let Err(e) = write_json(&self.dir.join(RECORDS_FILE), stored.as_slice()).await {
            stored.truncate(previous_len);
            error!(error = %e, "failed to persist records");
            return Err(e);
        }
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        let records = self.records.read().await;
        Ok(rank(records.iter(), embedding, top_k, filter))
    }

    async fn fingerprints(&self) -> Result<HashSet<String>> {
        let records = self.records.read().await;
        Ok(records.iter().map(|r| r.fingerprint.clone()).collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        let mut manifest = self.manifest.write().await;
        let removed = records.len();
        if removed > 0 {
            write_json(&self.dir.join(RECORDS_FILE), &[] as &[VectorRecord]).await?;
            records.clear();
        }
        match tokio::fs::remove_file(self.dir.join(MANIFEST_FILE)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(RagError::store(BACKEND, format!("cannot remove manifest: {e}")));
            }
        }
        *manifest = None;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn record(id: &str) -> VectorRecord {
        VectorRecord {
            id: id.into(),
            text: format!("text of {id}"),
            embedding: vec![1.0, 0.0],
            metadata: HashMap::from([("source".to_string(), "a.txt".to_string())]),
            document_id: "a.txt".into(),
            fingerprint: id.into(),
        }
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalVectorStore::open(dir.path()).await.unwrap();
            store.prepare("hashing-2", 2).await.unwrap();
            store.insert(&[record("a"), record("b")]).await.unwrap();
        }
        let store = LocalVectorStore::open(dir.path()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.fingerprints().await.unwrap().contains("b"));
        assert!(!dir.path().join("records.json.tmp").exists());
    }

    #[tokio::test]
    async fn manifest_mismatch_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        LocalVectorStore::open(dir.path()).await.unwrap().prepare("hashing-2", 2).await.unwrap();

        let store = LocalVectorStore::open(dir.path()).await.unwrap();
        store.prepare("hashing-2", 2).await.unwrap();
        store.insert(&[record("a")]).await.unwrap();
        let err = store.prepare("hashing-8", 8).await.unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }

    #[tokio::test]
    async fn empty_store_rebinds_to_new_embedder() {
        let dir = tempfile::tempdir().unwrap();
        LocalVectorStore::open(dir.path()).await.unwrap().prepare("hashing-2", 2).await.unwrap();

        let store = LocalVectorStore::open(dir.path()).await.unwrap();
        store.prepare("hashing-8", 8).await.unwrap();
        let manifest: Manifest = read_json(&dir.path().join(MANIFEST_FILE)).await.unwrap().unwrap();
        assert_eq!(manifest, Manifest { model_id: "hashing-8".into(), dimensions: 8 });
    }

    #[tokio::test]
    async fn clear_releases_embedder_binding() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(dir.path()).await.unwrap();
        store.prepare("hashing-2", 2).await.unwrap();
        store.insert(&[record("a")]).await.unwrap();
        store.clear().await.unwrap();
        assert!(!dir.path().join(MANIFEST_FILE).exists());

        let reopened = LocalVectorStore::open(dir.path()).await.unwrap();
        reopened.prepare("hashing-8", 8).await.unwrap();
    }

    #[tokio::test]
    async fn clear_persists_and_reports_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(dir.path()).await.unwrap();
        store.insert(&[record("a")]).await.unwrap();
        assert_eq!(store.clear().await.unwrap(), 1);
        assert_eq!(store.clear().await.unwrap(), 0);

        let reopened = LocalVectorStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_records_file_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RECORDS_FILE), b"not json").unwrap();
        let err = LocalVectorStore::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, RagError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn unusable_directory_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, b"x").unwrap();
        let err = LocalVectorStore::open(&file).await.unwrap_err();
        assert!(matches!(err, RagError::StoreUnavailable { .. }));
    }
}
