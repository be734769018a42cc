//! # aula-rag
//!
//! Retrieval-augmented generation for the aula toolkit: load `.txt` and
//! `.pdf` files, split them into overlapping fragments, embed the fragments
//! into a vector store and answer questions grounded on the closest ones.
//!
//! ## Overview
//!
//! - [`loader`] - files to [`Document`]s, one per text file or PDF page
//! - [`Chunker`] - [`RecursiveChunker`] and [`FixedSizeChunker`]
//! - [`EmbeddingProvider`] - [`HashingEmbedder`] (local) and, with the
//!   `openai` feature, `OpenAIEmbeddingProvider`
//! - [`VectorStore`] - [`InMemoryVectorStore`] and the persisted [`LocalVectorStore`]
//! - [`KnowledgeBase`] - `add`, `query`, `stats` and `clear` over one embedder and store
//! - [`RagChain`] - retrieve, fill a [`PromptTemplate`], ask a chat model
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aula_rag::{HashingEmbedder, KnowledgeBase, LocalVectorStore, RagChain, RagConfig};
//!
//! let kb = KnowledgeBase::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbedder::default()))
//!     .vector_store(Arc::new(LocalVectorStore::open("rag_store").await?))
//!     .build()?;
//! kb.ingest_files(&["apuntes.txt"]).await?;
//!
//! let chain = RagChain::new(Arc::new(kb), model);
//! println!("{}", chain.answer("What is RAG?", 5).await?);
//! ```

pub mod chain;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod knowledge;
pub mod loader;
pub mod local;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;
pub mod vectorstore;

pub use chain::{RagAnswer, RagChain};
pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, MetadataFilter, SearchResult, VectorRecord};
pub use embedding::{EmbeddingProvider, HashingEmbedder};
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use knowledge::{IngestReport, KnowledgeBase, KnowledgeBaseBuilder, StoreStats, StoreStatus};
pub use loader::{DocumentFormat, LoadReport, ProcessReport, load_file, load_files, process_files};
pub use local::LocalVectorStore;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use prompt::{DEFAULT_RAG_TEMPLATE, PromptTemplate};
pub use vectorstore::VectorStore;
