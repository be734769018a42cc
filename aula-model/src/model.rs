//! The chat completion trait implemented by every backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::ChatMessage;

/// A backend that turns a list of messages into the next assistant reply.
///
/// Implementations send the whole slice as one request and return the text
/// of the reply. They do not keep history of their own; that is the job of
/// [`ChatSession`](crate::ChatSession).
///
/// # Example
///
/// ```rust,ignore
/// use aula_model::{ChatMessage, ChatModel};
///
/// let reply = model
///     .complete(&[ChatMessage::system("Be brief."), ChatMessage::user("Hi")])
///     .await?;
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier, used in logs.
    fn name(&self) -> &str;

    /// Send `messages` and return the assistant text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}
