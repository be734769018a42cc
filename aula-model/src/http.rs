//! HTTP helpers shared by the `reqwest`-based backends.

use serde::Deserialize;

use crate::error::ModelError;

/// The `{"error": {"message": ...}}` envelope used by OpenAI, Groq and Gemini.
#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Map a non-success status and its body to a typed error.
///
/// 401 and 403 become [`ModelError::Auth`]; everything else is a
/// [`ModelError::RemoteCall`] carrying the status and the provider's message.
pub(crate) fn status_error(provider: &str, status: reqwest::StatusCode, body: String) -> ModelError {
    let detail =
        serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ModelError::Auth { provider: provider.into(), message: detail }
    } else {
        ModelError::RemoteCall {
            provider: provider.into(),
            message: format!("API returned {status}: {detail}"),
        }
    }
}
