//! A conversation with a pinned system prompt and an optional sliding window.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::{ModelError, Result};
use crate::message::ChatMessage;
use crate::model::ChatModel;

/// The reply shown to a user when a request fails and the caller asked
/// for a conversational answer instead of an error.
pub const APOLOGY: &str = "Sorry, I had a problem processing your request.";

/// A chat session that owns one conversation.
///
/// The first message is always the system prompt. When a history limit is
/// set, only the most recent `2 × max_history_pairs` messages are kept after
/// the system prompt. A failed request leaves the history exactly as it was,
/// so the user can simply try again.
///
/// # Example
///
/// ```rust,ignore
/// use aula_model::ChatSession;
///
/// let mut session = ChatSession::new(model, "You are a friendly assistant.")
///     .with_max_history(3);
/// let reply = session.talk("Hello!").await?;
/// ```
pub struct ChatSession {
    model: Arc<dyn ChatModel>,
    messages: Vec<ChatMessage>,
    max_history_pairs: Option<usize>,
}

impl ChatSession {
    /// Start a conversation pinned to `system_prompt`, with unbounded history.
    pub fn new(model: Arc<dyn ChatModel>, system_prompt: impl Into<String>) -> Self {
        Self { model, messages: vec![ChatMessage::system(system_prompt)], max_history_pairs: None }
    }

    /// Keep at most `pairs` user/assistant exchanges besides the system prompt.
    ///
    /// A limit of zero is raised to one so the current exchange is never dropped.
    pub fn with_max_history(mut self, pairs: usize) -> Self {
        self.max_history_pairs = Some(pairs.max(1));
        self
    }

    /// The history limit in pairs, if any.
    pub fn max_history_pairs(&self) -> Option<usize> {
        self.max_history_pairs
    }

    /// The full conversation, system prompt first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The pinned system prompt.
    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// Drop every message except the system prompt.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Send `user_text` and return the assistant reply.
    ///
    /// On success both messages are appended and the window is applied.
    /// On failure the history is unchanged and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns whatever [`ModelError`] the backend produced, or
    /// [`ModelError::EmptyResponse`] if the reply is blank.
    pub async fn talk(&mut self, user_text: impl Into<String>) -> Result<String> {
        let user = ChatMessage::user(user_text);

        let mut request = self.messages.clone();
        request.push(user.clone());
        apply_window(&mut request, self.max_history_pairs);
        debug!(model = self.model.name(), request_len = request.len(), "sending chat turn");

        let reply = match self.model.complete(&request).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                error!(model = self.model.name(), error = %e, "chat turn failed, history rolled back");
                return Err(e);
            }
        };
        if reply.is_empty() {
            return Err(ModelError::EmptyResponse { provider: self.model.name().to_string() });
        }

        self.messages.push(user);
        self.messages.push(ChatMessage::assistant(reply.clone()));
        apply_window(&mut self.messages, self.max_history_pairs);
        info!(history_len = self.messages.len(), "chat turn completed");

        Ok(reply)
    }

    /// Like [`talk`](Self::talk) but never fails: errors are logged and
    /// replaced by [`APOLOGY`].
    pub async fn reply(&mut self, user_text: impl Into<String>) -> String {
        match self.talk(user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "returning apology instead of model reply");
                APOLOGY.to_string()
            }
        }
    }
}

/// Keep the system prompt plus the most recent `2 × pairs` messages.
fn apply_window(messages: &mut Vec<ChatMessage>, max_history_pairs: Option<usize>) {
    let Some(pairs) = max_history_pairs else {
        return;
    };
    let keep = pairs * 2;
    if messages.len() > keep + 1 {
        let excess = messages.len() - keep - 1;
        messages.drain(1..=excess);
    }
}
