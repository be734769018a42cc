//! Vector store trait for storing and searching fragment embeddings.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::document::{MetadataFilter, SearchResult, VectorRecord};
use crate::embedding::cosine_similarity;
use crate::error::Result;

/// A storage backend for [`VectorRecord`]s with similarity search.
///
/// Records are append-only: they are inserted once and only ever removed
/// all together by [`clear`](VectorStore::clear). Searches rank by cosine
/// similarity and break ties by insertion order.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.prepare("hashing-384", 384).await?;
/// store.insert(&records).await?;
/// let results = store.search(&query_embedding, 5, None).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Short backend name used in errors and logs.
    fn backend(&self) -> &str;

    /// Bind the store to an embedding configuration.
    ///
    /// Called before every insert or search. A store that still holds
    /// records built with a different configuration must fail with
    /// [`RagError::Config`](crate::RagError::Config); an empty store takes
    /// the new configuration.
    async fn prepare(&self, model_id: &str, dimensions: usize) -> Result<()>;

    /// Append records. Records must have embeddings set.
    async fn insert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Return the `top_k` records most similar to `embedding`, optionally
    /// restricted to records matching `filter`.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>>;

    /// Fingerprints of every stored record.
    async fn fingerprints(&self) -> Result<HashSet<String>>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize>;

    /// Delete every record, release the embedding binding and return how
    /// many records were removed.
    async fn clear(&self) -> Result<usize>;
}

/// Rank `records` against `embedding`: filter, score, stable-sort, truncate.
pub(crate) fn rank<'a>(
    records: impl Iterator<Item = &'a VectorRecord>,
    embedding: &[f32],
    top_k: usize,
    filter: Option<&MetadataFilter>,
) -> Vec<SearchResult> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<SearchResult> = records
        .filter(|record| filter.is_none_or(|f| f.matches(&record.metadata)))
        .map(|record| SearchResult {
            score: cosine_similarity(&record.embedding, embedding),
            record: record.clone(),
        })
        .collect();

    // `sort_by` is stable, so equal scores keep insertion order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}
