//! # aula-model
//!
//! Chat completion backends and conversation handling for the aula RAG toolkit.
//!
//! ## Overview
//!
//! - [`ChatModel`] - the trait every backend implements
//! - [`OpenAICompatibleModel`] - OpenAI, Groq and other compatible APIs
//! - [`GeminiModel`] - Google Gemini
//! - [`MockChatModel`] - scripted model for tests
//! - [`ChatSession`] - pinned system prompt, sliding history window, rollback on failure
//! - [`summarize`] / [`extract_contact`] - one-shot prompt utilities
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aula_model::{ChatSession, GeminiModel, gemini::GeminiConfig};
//!
//! let model = GeminiModel::new(GeminiConfig::new(api_key, "gemini-2.5-flash"))?;
//! let mut session = ChatSession::new(Arc::new(model), "You are a friendly assistant.");
//! println!("{}", session.reply("Hello!").await);
//! ```

pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(any(feature = "openai", feature = "gemini"))]
mod http;
pub mod message;
pub mod mock;
pub mod model;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompts;
pub mod session;

pub use error::{ModelError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiModel;
pub use message::{ChatMessage, Role};
pub use mock::MockChatModel;
pub use model::ChatModel;
#[cfg(feature = "openai")]
pub use openai::OpenAICompatibleModel;
pub use prompts::{ContactInfo, extract_contact, summarize};
pub use session::{APOLOGY, ChatSession};
