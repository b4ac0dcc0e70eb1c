//! Gemini API client.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::GeminiError;
use super::types::{GenerateContentRequest, first_candidate_text};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.inner.endpoint)
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::Config` if the API key contains characters that
    /// are not valid in a header, or `GeminiError::Http` if the HTTP client
    /// cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| GeminiError::Config(format!("invalid API key for header: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: config.generate_content_url(),
                model: config.model.clone(),
            }),
        })
    }

    /// Forward a prompt and return the first candidate's text.
    ///
    /// A successful provider reply with no candidate text yields an empty
    /// string rather than an error.
    ///
    /// # Errors
    ///
    /// - `GeminiError::Http` on transport failure
    /// - `GeminiError::Api` when the provider returns a non-success status
    /// - `GeminiError::Parse` when a success body is not JSON
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn generate_text(&self, request: &GenerateContentRequest) -> Result<String, GeminiError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            return Err(GeminiError::Api {
                status: status.as_u16(),
                details,
            });
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        let text = first_candidate_text(&payload).unwrap_or_default();
        if text.is_empty() {
            tracing::warn!("Gemini reply contained no candidate text");
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn config(key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: SecretString::from(key),
            model: "gemini-1.5-flash".to_string(),
            api_base: Url::parse("http://127.0.0.1:1/v1beta").expect("url"),
        }
    }

    #[test]
    fn test_new_rejects_header_unsafe_key() {
        let err = GeminiClient::new(&config("bad\nkey")).expect_err("newline is not a header value");
        assert!(matches!(err, GeminiError::Config(_)));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = GeminiClient::new(&config("AIzaSyB3x9Qm2LkP7vT0wR5nC8dE1fG4hJ6")).expect("client");
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("generateContent"));
        assert!(!debug_output.contains("AIzaSy"));
    }

    #[test]
    fn test_gemini_client_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<GeminiClient>();
    }
}
