//! Error types for the `aula-model` crate.

use thiserror::Error;

/// Errors that can occur while talking to a chat completion backend.
///
/// Every variant names the provider so callers can tell backends apart
/// without matching on message text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The backend could not be constructed (missing credential, bad configuration).
    #[error("Model unavailable ({provider}): {message}")]
    ModelUnavailable {
        /// The provider that could not be loaded.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The backend rejected the credential.
    #[error("Authentication failed ({provider}): {message}")]
    Auth {
        /// The provider that rejected the request.
        provider: String,
        /// The error detail returned by the provider.
        message: String,
    },

    /// The request failed in transport or the backend returned an error status.
    #[error("Remote call failed ({provider}): {message}")]
    RemoteCall {
        /// The provider that was called.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The backend answered without any text.
    #[error("Empty response from {provider}")]
    EmptyResponse {
        /// The provider that returned no text.
        provider: String,
    },

    /// The backend answered with text that could not be interpreted.
    #[error("Invalid response ({provider}): {message}")]
    InvalidResponse {
        /// The provider whose output was rejected.
        provider: String,
        /// Why the output was rejected.
        message: String,
    },
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
