//! Error types for the Gemini client.

use thiserror::Error;

/// Errors that can occur when calling the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    ///
    /// `details` is the provider's error payload: parsed JSON when the body
    /// was JSON, otherwise the raw body as a string.
    #[error("Gemini API error ({status})")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider error payload.
        details: serde_json::Value,
    },

    /// A success response whose body was not JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client could not be constructed from configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
