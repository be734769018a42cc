//! Embedding provider trait and the local hashing embedder.

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// Default dimensionality of [`HashingEmbedder`] vectors.
pub const DEFAULT_HASHING_DIMENSIONS: usize = 384;

/// A provider that generates vector embeddings from text input.
///
/// The same provider configuration must be used at ingestion and query
/// time; [`model_id`](EmbeddingProvider::model_id) and
/// [`dimensions`](EmbeddingProvider::dimensions) identify that configuration
/// so persisted stores can reject a mismatch.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::EmbeddingProvider;
///
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input. Override this method if the backend
    /// supports native batch embedding.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Identify the model configuration, e.g. `hashing-384` or `text-embedding-3-small`.
    fn model_id(&self) -> String;
}

/// A local, deterministic bag-of-words embedder.
///
/// Text is lowercased and split into alphanumeric tokens; each token is
/// hashed into one of `dimensions` buckets and the bucket counts are
/// L2-normalized. Texts sharing words therefore have a positive cosine
/// similarity. Needs no network and no model download.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dimensions`-long vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelUnavailable`] if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::ModelUnavailable {
                provider: "Hashing".into(),
                message: "dimensions must be greater than zero".into(),
            });
        }
        Ok(Self { dimensions })
    }

    fn bucket(&self, token: &str) -> usize {
        // FNV-1a, stable across platforms and releases.
        let hash = token.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
            (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
        (hash % self.dimensions as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimensions: DEFAULT_HASHING_DIMENSIONS }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            embedding[self.bucket(token)] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> String {
        format!("hashing-{}", self.dimensions)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_input_gives_identical_vector() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let a = embedder.embed("Grass is green").await.unwrap();
        let b = embedder.embed("grass  IS green!").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn shared_words_score_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("What color is the sky?").await.unwrap();
        let sky = embedder.embed("The sky is blue.").await.unwrap();
        let grass = embedder.embed("Grass is green.").await.unwrap();
        assert!(cosine_similarity(&query, &sky) > cosine_similarity(&query, &grass));
    }

    #[tokio::test]
    async fn empty_text_is_zero_vector() {
        let embedding = HashingEmbedder::new(8).unwrap().embed("  ").await.unwrap();
        assert!(embedding.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn zero_dimensions_is_unavailable() {
        assert!(matches!(HashingEmbedder::new(0), Err(RagError::ModelUnavailable { .. })));
    }

    #[test]
    fn model_id_names_dimensions() {
        assert_eq!(HashingEmbedder::default().model_id(), "hashing-384");
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }
}
