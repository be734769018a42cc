//! One-shot prompt utilities: summarizing text and extracting contact data.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ModelError, Result};
use crate::message::ChatMessage;
use crate::model::ChatModel;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant that summarizes texts in 3 key points.";

const EXTRACT_SYSTEM_PROMPT: &str = "Your task is to extract the name, email and company from a text. \
     Return the information only as a JSON object with the keys \"name\", \"email\" and \"company\".";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("code fence pattern is valid")
});

/// Contact details pulled out of free text. Missing fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Person's name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Company or organization.
    pub company: Option<String>,
}

/// Ask `model` for a three-point summary of `text`.
pub async fn summarize(model: &dyn ChatModel, text: &str) -> Result<String> {
    let messages = [
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(format!("Please summarize the following text: '{text}'")),
    ];
    let summary = model.complete(&messages).await?;
    info!(model = model.name(), input_len = text.len(), "summary generated");
    Ok(summary.trim().to_string())
}

/// Ask `model` to extract a [`ContactInfo`] from `text`.
///
/// # Errors
///
/// Returns [`ModelError::InvalidResponse`] if the reply is not the expected JSON.
pub async fn extract_contact(model: &dyn ChatModel, text: &str) -> Result<ContactInfo> {
    let messages = [
        ChatMessage::system(EXTRACT_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Extract the data from the following text: '{text}'. If a field is missing, use null."
        )),
    ];
    let reply = model.complete(&messages).await?;
    parse_contact(model.name(), &reply)
}

/// Parse a model reply into a [`ContactInfo`], accepting a Markdown code fence.
fn parse_contact(provider: &str, reply: &str) -> Result<ContactInfo> {
    let body = CODE_FENCE
        .captures(reply)
        .and_then(|c| c.get(1))
        .map_or(reply.trim(), |m| m.as_str());

    serde_json::from_str(body).map_err(|e| {
        warn!(provider, error = %e, "model did not return contact JSON");
        ModelError::InvalidResponse {
            provider: provider.to_string(),
            message: format!("expected contact JSON: {e}"),
        }
    })
}
