//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps records in a `Vec` behind a
//! `tokio::sync::RwLock`. Nothing survives the process; use
//! [`LocalVectorStore`](crate::LocalVectorStore) for persistence.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{MetadataFilter, SearchResult, VectorRecord};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank};

/// An in-memory vector store.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::InMemoryVectorStore;
///
/// let store = InMemoryVectorStore::new();
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Vec<VectorRecord>>,
    embedding: RwLock<Option<(String, usize)>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend(&self) -> &str {
        "InMemory"
    }

    async fn prepare(&self, model_id: &str, dimensions: usize) -> Result<()> {
        let records = self.records.read().await;
        let mut embedding = self.embedding.write().await;
        match embedding.as_ref() {
            Some((bound_model, bound_dims))
                if !records.is_empty() && (bound_model != model_id || *bound_dims != dimensions) =>
            {
                Err(RagError::Config(format!(
                    "store holds {bound_model} ({bound_dims} dims) embeddings, got {model_id} ({dimensions} dims)"
                )))
            }
            _ => {
                *embedding = Some((model_id.to_string(), dimensions));
                Ok(())
            }
        }
    }

    async fn insert(&self, records: &[VectorRecord]) -> Result<()> {
        self.records.write().await.extend_from_slice(records);
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
        let removed = records.len();
        records.clear();
        *self.embedding.write().await = None;
        Ok(removed)
    }
}
