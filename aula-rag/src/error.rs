//! Error types for the `aula-rag` crate.

use std::path::PathBuf;

use aula_model::ModelError;
use thiserror::Error;

/// Errors that can occur while ingesting, storing or answering.
#[derive(Debug, Error)]
pub enum RagError {
    /// The file extension is neither `.txt` nor `.pdf`.
    #[error("Unsupported file format: {} (only .txt and .pdf are accepted)", .path.display())]
    UnsupportedFormat {
        /// The rejected file.
        path: PathBuf,
    },

    /// The file could not be read or decoded.
    #[error("Cannot read {}: {message}", .path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// The embedding backend is not usable.
    #[error("Embedding model unavailable ({provider}): {message}")]
    ModelUnavailable {
        /// The embedding provider that failed.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector store backend failed.
    #[error("Vector store unavailable ({backend}): {message}")]
    StoreUnavailable {
        /// The vector store backend that failed.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// None of the given files produced a document.
    #[error("No valid documents could be loaded")]
    NoDocuments,

    /// Every loaded document was empty.
    #[error("The documents are empty and produced no fragments")]
    NoChunks,

    /// An error from the chat completion backend.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl RagError {
    pub(crate) fn store(backend: &str, message: impl Into<String>) -> Self {
        Self::StoreUnavailable { backend: backend.to_string(), message: message.into() }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
