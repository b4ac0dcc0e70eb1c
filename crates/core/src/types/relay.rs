//! Wire types for the `POST /api/gemini` relay contract.
//!
//! Request: `{ "contents": [{ "parts": [{ "text": "..." }] }] }`
//! Success: `{ "text": "..." }`
//! Failure: `{ "error": "...", "details": { ... } }` with a non-2xx status.

use serde::{Deserialize, Serialize};

/// A prompt in the provider's `contents` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub contents: Vec<PromptContent>,
}

/// One turn of prompt content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContent {
    pub parts: Vec<PromptPart>,
}

/// A text part within a prompt turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPart {
    pub text: String,
}

impl PromptRequest {
    /// A single-turn, single-part text prompt.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![PromptContent {
                parts: vec![PromptPart { text: text.into() }],
            }],
        }
    }
}

/// Successful relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReply {
    pub text: String,
}

/// Error body returned by the relay with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
