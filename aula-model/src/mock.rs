//! Scripted chat model for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::message::{ChatMessage, Role};
use crate::model::ChatModel;

/// A [`ChatModel`] that replays scripted outcomes and records every request.
///
/// Scripted outcomes are consumed in order. Once the script is exhausted the
/// model echoes the last user message back, prefixed with `echo: `.
///
/// # Example
///
/// ```rust,ignore
/// use aula_model::{MockChatModel, ModelError};
///
/// let model = MockChatModel::new()
///     .with_reply("hello")
///     .with_failure(ModelError::RemoteCall { provider: "mock".into(), message: "down".into() });
/// ```
#[derive(Debug, Default)]
pub struct MockChatModel {
    script: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatModel {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, error: ModelError) -> Self {
        self.push(Err(error));
        self
    }

    /// Every message list received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push(&self, outcome: Result<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let scripted = self.script.lock().ok().and_then(|mut script| script.pop_front());
        match scripted {
            Some(outcome) => outcome,
            None => {
                let last_user = messages.iter().rev().find(|m| m.role == Role::User);
                last_user.map(|m| format!("echo: {}", m.content)).ok_or_else(|| {
                    ModelError::EmptyResponse { provider: "mock".into() }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_echoes() {
        let model = MockChatModel::new().with_reply("first");
        let messages = [ChatMessage::user("ping")];

        assert_eq!(model.complete(&messages).await.unwrap(), "first");
        assert_eq!(model.complete(&messages).await.unwrap(), "echo: ping");
        assert_eq!(model.requests().len(), 2);
    }

    #[tokio::test]
    async fn no_user_message_and_no_script_is_empty_response() {
        let model = MockChatModel::new();
        let err = model.complete(&[ChatMessage::system("rules")]).await.unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse { .. }));
    }
}
