//! OpenAI-compatible chat completion backend.
//!
//! Talks to `/chat/completions` with `reqwest`. The same client serves
//! OpenAI itself and any compatible endpoint (Groq, local servers) through
//! [`OpenAIConfig::compatible`].
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::http::status_error;
use crate::message::ChatMessage;
use crate::model::ChatModel;

/// The OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The Groq OpenAI-compatible API base URL.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default OpenAI chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Groq chat model.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    /// Label used in errors and logs (`OpenAI`, `Groq`, ...).
    pub provider: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier sent in the request body.
    pub model: String,
    /// API base URL without the trailing `/chat/completions`.
    pub base_url: String,
    /// Optional cap on generated tokens.
    pub max_tokens: Option<u32>,
}

impl OpenAIConfig {
    /// Settings for the OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: "OpenAI".into(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_BASE.into(),
            max_tokens: None,
        }
    }

    /// Settings for Groq's OpenAI-compatible API.
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::compatible("Groq", api_key, GROQ_API_BASE, model)
    }

    /// Settings for any OpenAI-compatible API.
    pub fn compatible(
        provider: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            max_tokens: None,
        }
    }

    /// Cap the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A [`ChatModel`] backed by an OpenAI-compatible chat completions API.
///
/// # Example
///
/// ```rust,ignore
/// use aula_model::openai::{OpenAICompatibleModel, OpenAIConfig};
///
/// let model = OpenAICompatibleModel::new(OpenAIConfig::new(api_key, "gpt-4o-mini"))?;
/// ```
pub struct OpenAICompatibleModel {
    client: reqwest::Client,
    config: OpenAIConfig,
}

impl OpenAICompatibleModel {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ModelUnavailable`] if the API key is empty.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::ModelUnavailable {
                provider: config.provider,
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self { client: reqwest::Client::new(), config })
    }

    /// Return the connection settings.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

// ── Chat completions request/response types ────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Pull the first choice's text out of a completion response.
pub(crate) fn first_choice_text(response: CompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl ChatModel for OpenAICompatibleModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let provider = self.config.provider.as_str();
        debug!(
            provider,
            model = %self.config.model,
            message_count = messages.len(),
            "sending chat completion"
        );

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider, error = %e, "request failed");
                ModelError::RemoteCall {
                    provider: provider.into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider, %status, "API error");
            return Err(status_error(provider, status, body));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            error!(provider, error = %e, "failed to parse response");
            ModelError::InvalidResponse {
                provider: provider.into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        first_choice_text(completion)
            .ok_or_else(|| ModelError::EmptyResponse { provider: provider.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_lowercase_roles_and_skips_missing_limit() {
        let messages = [ChatMessage::system("be kind"), ChatMessage::user("hi")];
        let body = CompletionRequest { model: "gpt-4o-mini", messages: &messages, max_tokens: None };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn extracts_first_choice() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}},{"message":{"content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).as_deref(), Some("Hello!"));
    }

    #[test]
    fn null_content_is_empty() {
        let response: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(first_choice_text(response).is_none());
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let result = OpenAICompatibleModel::new(OpenAIConfig::groq("  ", DEFAULT_GROQ_MODEL));
        assert!(matches!(result, Err(ModelError::ModelUnavailable { .. })));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let model = OpenAICompatibleModel::new(OpenAIConfig::compatible(
            "Local",
            "key",
            "http://localhost:8080/v1/",
            "tiny",
        ))
        .unwrap();
        assert_eq!(model.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
