use serde_json::Value;
use thiserror::Error;

/// Errors from the auth and row store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The session token was rejected.
    #[error("session expired or invalid: {0}")]
    Unauthorized(String),

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl StoreError {
    /// Build an error from a non-success status and its body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = error_message(body);
        if status == 401 {
            Self::Unauthorized(message)
        } else {
            Self::Api { status, message }
        }
    }
}

/// Pick the human-readable message out of an error body.
///
/// REST errors use `message`, auth errors use `msg` or `error_description`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
