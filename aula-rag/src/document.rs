//! Data types for documents, fragments, stored records and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata key holding the path a document was loaded from.
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the 0-based page number of a PDF page.
pub const PAGE_KEY: &str = "page";

/// Metadata key holding a fragment's position within its document.
pub const CHUNK_INDEX_KEY: &str = "chunk_index";

/// Raw text loaded from one file (or one PDF page) plus its source metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier derived from the source path (and page, for PDFs).
    pub id: String,
    /// The decoded text.
    pub text: String,
    /// Key-value metadata, at least [`SOURCE_KEY`].
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document with the given id, text and metadata.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self { id: id.into(), text: text.into(), metadata }
    }

    /// The path this document was loaded from, if recorded.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    /// The PDF page this document came from, if any.
    pub fn page(&self) -> Option<usize> {
        self.metadata.get(PAGE_KEY).and_then(|p| p.parse().ok())
    }
}

/// A bounded-length slice of a [`Document`], the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// `{document_id}_{chunk_index}`.
    pub id: String,
    /// The fragment text.
    pub text: String,
    /// The parent document's metadata plus [`CHUNK_INDEX_KEY`].
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A fragment as persisted by a vector store. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Identifier unique within the store.
    pub id: String,
    /// The fragment text, returned verbatim by searches.
    pub text: String,
    /// The fragment embedding.
    pub embedding: Vec<f32>,
    /// Metadata copied from the fragment.
    pub metadata: HashMap<String, String>,
    /// The ID of the source [`Document`].
    pub document_id: String,
    /// SHA-256 over text and metadata, used for optional deduplication.
    pub fingerprint: String,
}

impl VectorRecord {
    /// The path the fragment was loaded from, if recorded.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    /// The PDF page the fragment came from, if any.
    pub fn page(&self) -> Option<&str> {
        self.metadata.get(PAGE_KEY).map(String::as_str)
    }
}

/// A retrieved [`VectorRecord`] paired with its cosine similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved record.
    pub record: VectorRecord,
    /// Cosine similarity (higher is closer).
    pub score: f32,
}

/// Exact-equality filter over record metadata. Every pair must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    conditions: Vec<(String, String)>,
}

impl MetadataFilter {
    /// A filter requiring `key == value`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::default().and(key, value)
    }

    /// A filter on the [`SOURCE_KEY`] field.
    pub fn source(value: impl Into<String>) -> Self {
        Self::new(SOURCE_KEY, value)
    }

    /// Add another `key == value` condition.
    pub fn and(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((key.into(), value.into()));
        self
    }

    /// Whether `metadata` satisfies every condition.
    pub fn matches(&self, metadata: &HashMap<String, String>) -> bool {
        self.conditions.iter().all(|(key, value)| metadata.get(key) == Some(value))
    }
}

/// Hash fragment text and metadata (sorted by key) into a hex digest.
pub fn fingerprint(text: &str, metadata: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = metadata.iter().collect();
    pairs.sort();

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    for (key, value) in pairs {
        hasher.update([0u8]);
        hasher.update(key.as_bytes());
        hasher.update([0u8]);
        hasher.update(value.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
