//! The knowledge base: embed fragments into a vector store and query them.
//!
//! [`KnowledgeBase`] composes an [`EmbeddingProvider`], a [`VectorStore`],
//! a [`Chunker`] and a [`RagConfig`] into the operations the rest of the
//! toolkit uses: `add`, `query`, `stats` and `clear`.
//!
//! # Example
//!
//! ```rust,ignore
//! use aula_rag::{HashingEmbedder, KnowledgeBase, LocalVectorStore, RagConfig};
//!
//! let kb = KnowledgeBase::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbedder::default()))
//!     .vector_store(Arc::new(LocalVectorStore::open("rag_store").await?))
//!     .build()?;
//!
//! kb.ingest_files(&["apuntes.pdf"]).await?;
//! let results = kb.query("What is RAG?", 3, None).await?;
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, MetadataFilter, SearchResult, VectorRecord, fingerprint};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader::{ProcessReport, process_files};
use crate::vectorstore::VectorStore;

/// Whether the store holds any records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// No records.
    Empty,
    /// At least one record.
    Active,
}

/// Snapshot of the store size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored fragments.
    pub count: usize,
    /// `Empty` when `count == 0`.
    pub status: StoreStatus,
}

impl StoreStats {
    fn from_count(count: usize) -> Self {
        let status = if count == 0 { StoreStatus::Empty } else { StoreStatus::Active };
        Self { count, status }
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            StoreStatus::Empty => write!(f, "The knowledge base is empty"),
            StoreStatus::Active => write!(f, "The knowledge base holds {} fragments", self.count),
        }
    }
}

/// The outcome of [`KnowledgeBase::ingest_files`].
#[derive(Debug)]
pub struct IngestReport {
    /// The load and split step.
    pub processed: ProcessReport,
    /// Fragments actually stored (fewer than produced when deduplicating).
    pub added: usize,
}

/// Embedder, vector store and splitter bound to one configuration.
///
/// Construct one via [`KnowledgeBase::builder()`]. Every operation binds
/// the vector store to the embedder's model id and dimensions, so a
/// non-empty store built with another embedder is rejected. An empty or
/// cleared store takes the current embedder.
pub struct KnowledgeBase {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl KnowledgeBase {
    /// Create a new [`KnowledgeBaseBuilder`].
    pub fn builder() -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Return a reference to the splitter.
    pub fn chunker(&self) -> &Arc<dyn Chunker> {
        &self.chunker
    }

    async fn prepare(&self) -> Result<()> {
        let model_id = self.embedding_provider.model_id();
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.prepare(&model_id, dimensions).await.inspect_err(|e| {
            error!(backend = self.vector_store.backend(), model_id = %model_id, error = %e, "store rejected embedder");
        })
    }

    /// Embed and store fragments. Returns the number of records added.
    ///
    /// Every call stores new records, so adding the same fragment twice
    /// yields two records unless [`RagConfig::deduplicate`] is set, in
    /// which case fragments whose text and metadata are already stored
    /// (or repeated within `chunks`) are skipped and not counted.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelUnavailable`] if embedding fails and
    /// [`RagError::StoreUnavailable`] if the store cannot persist the records.
    pub async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        self.prepare().await?;

        let mut pending: Vec<(&Chunk, String)> =
            chunks.iter().map(|chunk| (chunk, fingerprint(&chunk.text, &chunk.metadata))).collect();
        if self.config.deduplicate {
            let mut seen = self.vector_store.fingerprints().await?;
            pending.retain(|(_, hash)| seen.insert(hash.clone()));
        }
        if pending.is_empty() {
            info!(added = 0, skipped = chunks.len(), "nothing to add");
            return Ok(0);
        }

        let texts: Vec<&str> = pending.iter().map(|(chunk, _)| chunk.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(fragments = texts.len(), error = %e, "embedding failed during add");
        })?;
        if embeddings.len() != pending.len() {
            return Err(RagError::ModelUnavailable {
                provider: self.embedding_provider.model_id(),
                message: format!("expected {} embeddings, got {}", pending.len(), embeddings.len()),
            });
        }

        let records: Vec<VectorRecord> = pending
            .into_iter()
            .zip(embeddings)
            .map(|((chunk, fingerprint), embedding)| VectorRecord {
                id: uuid::Uuid::new_v4().to_string(),
                text: chunk.text.clone(),
                embedding,
                metadata: chunk.metadata.clone(),
                document_id: chunk.document_id.clone(),
                fingerprint,
            })
            .collect();

        self.vector_store.insert(&records).await.inspect_err(|e| {
            error!(backend = self.vector_store.backend(), error = %e, "insert failed during add");
        })?;

        let added = records.len();
        info!(added, skipped = chunks.len() - added, "added fragments");
        Ok(added)
    }

    /// Split documents with the configured splitter and add the fragments.
    pub async fn add_documents(&self, documents: &[Document]) -> Result<usize> {
        let chunks = self.chunker.chunk_all(documents);
        self.add(&chunks).await
    }

    /// Load files, split them and add the fragments.
    ///
    /// Files that fail to load are reported in the returned
    /// [`IngestReport`] and do not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NoDocuments`] or [`RagError::NoChunks`] when
    /// nothing usable was loaded, and propagates [`add`](Self::add) errors.
    pub async fn ingest_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<IngestReport> {
        let processed = process_files(paths, self.chunker.as_ref())?;
        let added = self.add(&processed.chunks).await?;
        Ok(IngestReport { processed, added })
    }

    /// Return the `k` stored fragments most similar to `text`.
    ///
    /// Results are ordered by descending similarity, ties by insertion
    /// order. Returns fewer than `k` results when the store (or the subset
    /// matching `filter`) is smaller, and an empty `Vec` when it is empty.
    /// Results below [`RagConfig::similarity_threshold`] are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelUnavailable`] if the query cannot be embedded.
    pub async fn query(
        &self,
        text: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        self.prepare().await?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedding_provider.embed(text).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during query");
        })?;

        let mut results = self.vector_store.search(&embedding, k, filter).await.inspect_err(|e| {
            error!(backend = self.vector_store.backend(), error = %e, "vector store search failed");
        })?;

        if let Some(threshold) = self.config.similarity_threshold {
            results.retain(|r| r.score >= threshold);
        }

        info!(k, filtered = filter.is_some(), result_count = results.len(), "query completed");
        Ok(results)
    }

    /// [`query`](Self::query) with the configured [`RagConfig::top_k`].
    pub async fn search(&self, text: &str, filter: Option<&MetadataFilter>) -> Result<Vec<SearchResult>> {
        self.query(text, self.config.top_k, filter).await
    }

    /// Report how many fragments are stored.
    pub async fn stats(&self) -> Result<StoreStats> {
        let count = self.vector_store.count().await?;
        Ok(StoreStats::from_count(count))
    }

    /// Delete every stored fragment and return how many were removed.
    ///
    /// Irreversible. Also releases the store's embedder binding. Returns `0`
    /// when the store was already empty.
    pub async fn clear(&self) -> Result<usize> {
        let removed = self.vector_store.clear().await?;
        info!(removed, "cleared knowledge base");
        Ok(removed)
    }
}

/// Builder for constructing a [`KnowledgeBase`].
///
/// `embedding_provider` and `vector_store` are required. Without a
/// `chunker`, a [`RecursiveChunker`] is built from the configuration;
/// without a `config`, [`RagConfig::default()`] is used.
#[derive(Default)]
pub struct KnowledgeBaseBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl KnowledgeBaseBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Replace the default splitter.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`KnowledgeBase`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing or the
    /// configuration is inconsistent.
    pub fn build(self) -> Result<KnowledgeBase> {
        let config = self.config.unwrap_or_default();
        if config.chunk_overlap >= config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        });

        Ok(KnowledgeBase {
            config,
            embedding_provider,
            vector_store,
            chunker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::inmemory::InMemoryVectorStore;

    #[test]
    fn stats_display_depends_on_count() {
        assert_eq!(StoreStats::from_count(0).to_string(), "The knowledge base is empty");
        assert_eq!(StoreStats::from_count(0).status, StoreStatus::Empty);
        assert_eq!(StoreStats::from_count(7).to_string(), "The knowledge base holds 7 fragments");
    }

    #[test]
    fn builder_requires_store_and_embedder() {
        let err = KnowledgeBase::builder()
            .embedding_provider(Arc::new(HashingEmbedder::default()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, RagError::Config(ref m) if m.contains("vector_store")));

        let err = KnowledgeBase::builder()
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, RagError::Config(ref m) if m.contains("embedding_provider")));
    }

    #[test]
    fn builder_rejects_overlap_not_smaller_than_size() {
        let config = RagConfig { chunk_size: 10, chunk_overlap: 10, ..RagConfig::default() };
        let result = KnowledgeBase::builder()
            .config(config)
            .embedding_provider(Arc::new(HashingEmbedder::default()))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }
}
