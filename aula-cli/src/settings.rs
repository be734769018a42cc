//! Settings read from the environment (and `.env`) once at startup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, bail};
use aula_model::gemini::{DEFAULT_GEMINI_MODEL, GeminiConfig};
use aula_model::openai::{DEFAULT_GROQ_MODEL, DEFAULT_OPENAI_MODEL, OpenAIConfig};
use aula_model::{ChatModel, GeminiModel, ModelError, OpenAICompatibleModel};
use aula_rag::{
    EmbeddingProvider, HashingEmbedder, KnowledgeBase, LocalVectorStore, OpenAIEmbeddingProvider,
    RagConfig,
};

/// Which chat completion API answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI chat completions.
    OpenAI,
    /// Google Gemini `generateContent`.
    Gemini,
    /// Groq's OpenAI-compatible endpoint.
    Groq,
}

impl LlmProvider {
    /// The model used when `RAG_LLM_MODEL` is not set.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => DEFAULT_OPENAI_MODEL,
            Self::Gemini => DEFAULT_GEMINI_MODEL,
            Self::Groq => DEFAULT_GROQ_MODEL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" | "google" => Ok(Self::Gemini),
            "groq" => Ok(Self::Groq),
            other => bail!("unknown LLM provider '{other}' (expected openai, gemini or groq)"),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Groq => "groq",
        })
    }
}

/// Which embedder turns fragments into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Local bag-of-words hashing, no network.
    Hashing,
    /// OpenAI `/v1/embeddings`.
    OpenAI,
}

impl FromStr for EmbedderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(Self::Hashing),
            "openai" => Ok(Self::OpenAI),
            other => bail!("unknown embedder '{other}' (expected hashing or openai)"),
        }
    }
}

/// Everything the binaries need, built once and passed down explicitly.
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// Directory of the persisted vector store (`RAG_STORE_DIR`).
    pub store_dir: PathBuf,
    /// Fragment length in characters (`RAG_CHUNK_SIZE`).
    pub chunk_size: usize,
    /// Fragment overlap in characters (`RAG_CHUNK_OVERLAP`).
    pub chunk_overlap: usize,
    /// Fragments retrieved per question (`RAG_TOP_K`).
    pub top_k: usize,
    /// Embedder backend (`RAG_EMBEDDER`).
    pub embedder: EmbedderKind,
    /// Embedding vector length (`RAG_EMBEDDING_DIMENSIONS`).
    pub embedding_dimensions: usize,
    /// Chat completion provider (`RAG_LLM_PROVIDER`).
    pub llm_provider: LlmProvider,
    /// Chat model name (`RAG_LLM_MODEL`).
    pub llm_model: String,
    /// Question/answer pairs kept by chat sessions (`RAG_MAX_HISTORY`).
    pub max_history: usize,
    /// Cap on generated tokens per reply (`RAG_MAX_TOKENS`); unset means the provider default.
    pub max_tokens: Option<u32>,
    /// `OPENAI_API_KEY`.
    pub openai_api_key: Option<String>,
    /// `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    pub gemini_api_key: Option<String>,
    /// `GROQ_API_KEY`.
    pub groq_api_key: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<set>");
        f.debug_struct("Settings")
            .field("store_dir", &self.store_dir)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("top_k", &self.top_k)
            .field("embedder", &self.embedder)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .field("llm_provider", &self.llm_provider)
            .field("llm_model", &self.llm_model)
            .field("max_history", &self.max_history)
            .field("max_tokens", &self.max_tokens)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("groq_api_key", &redact(&self.groq_api_key))
            .finish()
    }
}

fn parse_opt<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|raw| raw.trim().parse().map_err(|e| anyhow::anyhow!("invalid {key}='{raw}': {e}")))
        .transpose()
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, applying defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let llm_provider: LlmProvider = parse_or(&lookup, "RAG_LLM_PROVIDER", LlmProvider::Gemini)?;
        let llm_model =
            non_empty("RAG_LLM_MODEL").unwrap_or_else(|| llm_provider.default_model().to_string());

        Ok(Self {
            store_dir: non_empty("RAG_STORE_DIR").unwrap_or_else(|| "rag_store".into()).into(),
            chunk_size: parse_or(&lookup, "RAG_CHUNK_SIZE", 1500)?,
            chunk_overlap: parse_or(&lookup, "RAG_CHUNK_OVERLAP", 250)?,
            top_k: parse_or(&lookup, "RAG_TOP_K", 5)?,
            embedder: parse_or(&lookup, "RAG_EMBEDDER", EmbedderKind::Hashing)?,
            embedding_dimensions: parse_or(&lookup, "RAG_EMBEDDING_DIMENSIONS", 384)?,
            llm_provider,
            llm_model,
            max_history: parse_or(&lookup, "RAG_MAX_HISTORY", 10)?,
            max_tokens: parse_opt(&lookup, "RAG_MAX_TOKENS")?,
            openai_api_key: non_empty("OPENAI_API_KEY"),
            gemini_api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY")),
            groq_api_key: non_empty("GROQ_API_KEY"),
        })
    }

    /// The validated ingestion and retrieval configuration.
    pub fn rag_config(&self) -> anyhow::Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .build()
            .context("invalid RAG settings")
    }

    /// The configured embedder.
    pub fn embedding_provider(&self) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
        let provider: Arc<dyn EmbeddingProvider> = match self.embedder {
            EmbedderKind::Hashing => Arc::new(HashingEmbedder::new(self.embedding_dimensions)?),
            EmbedderKind::OpenAI => {
                let key = self.openai_api_key.clone().unwrap_or_default();
                Arc::new(OpenAIEmbeddingProvider::new(key)?.with_dimensions(self.embedding_dimensions))
            }
        };
        Ok(provider)
    }

    /// Open the persisted knowledge base in [`store_dir`](Self::store_dir).
    pub async fn knowledge_base(&self) -> anyhow::Result<KnowledgeBase> {
        let store = LocalVectorStore::open(&self.store_dir).await?;
        let kb = KnowledgeBase::builder()
            .config(self.rag_config()?)
            .embedding_provider(self.embedding_provider()?)
            .vector_store(Arc::new(store))
            .build()?;
        Ok(kb)
    }

    /// The configured chat model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ModelUnavailable`] when the provider's API key is missing.
    pub fn chat_model(&self) -> Result<Arc<dyn ChatModel>, ModelError> {
        let missing = |variable: &str| ModelError::ModelUnavailable {
            provider: self.llm_provider.to_string(),
            message: format!("{variable} is not set"),
        };
        let model: Arc<dyn ChatModel> = match self.llm_provider {
            LlmProvider::OpenAI => {
                let key = self.openai_api_key.clone().ok_or_else(|| missing("OPENAI_API_KEY"))?;
                let config = self.limit_openai(OpenAIConfig::new(key, &self.llm_model));
                Arc::new(OpenAICompatibleModel::new(config)?)
            }
            LlmProvider::Groq => {
                let key = self.groq_api_key.clone().ok_or_else(|| missing("GROQ_API_KEY"))?;
                let config = self.limit_openai(OpenAIConfig::groq(key, &self.llm_model));
                Arc::new(OpenAICompatibleModel::new(config)?)
            }
            LlmProvider::Gemini => {
                let key = self
                    .gemini_api_key
                    .clone()
                    .ok_or_else(|| missing("GEMINI_API_KEY or GOOGLE_API_KEY"))?;
                let config = self.limit_gemini(GeminiConfig::new(key, &self.llm_model));
                Arc::new(GeminiModel::new(config)?)
            }
        };
        Ok(model)
    }

    fn limit_openai(&self, config: OpenAIConfig) -> OpenAIConfig {
        match self.max_tokens {
            Some(max_tokens) => config.with_max_tokens(max_tokens),
            None => config,
        }
    }

    fn limit_gemini(&self, config: GeminiConfig) -> GeminiConfig {
        match self.max_tokens {
            Some(max_tokens) => config.with_max_output_tokens(max_tokens),
            None => config,
        }
    }
}
