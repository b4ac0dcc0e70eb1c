//! Request and response shapes for `generateContent`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body forwarded to the provider.
///
/// Only `contents` is read from the caller and it is passed through
/// untouched; shape errors are left for the provider to report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Value>,
}

/// Text of the first part of the first candidate, if there is one.
///
/// The provider response is read as loosely typed JSON: missing candidates,
/// missing parts and non-string text all yield `None`.
#[must_use]
pub fn first_candidate_text(response: &Value) -> Option<&str> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
}
