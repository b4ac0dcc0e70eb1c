//! Item extraction bridge: sends prompts through the relay.
//!
//! The browser-side half of `POST /api/gemini`. The relay holds the provider
//! credential; this client only knows the relay's base URL.

use std::sync::Arc;

use async_trait::async_trait;
use chopchop_core::{DietaryFilter, PromptRequest, RelayErrorBody};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::prompt;

const RELAY_PATH: &str = "api/gemini";

/// Errors from a completion round-trip.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The relay could not be reached or its reply could not be read.
    #[error("relay unavailable: {0}")]
    Unavailable(String),

    /// The reply carried no usable text.
    #[error("no usable text in reply")]
    EmptyResponse,

    /// The relay answered with a non-success status.
    #[error("relay error ({status}): {error}")]
    Relay {
        status: u16,
        error: String,
        details: Option<Value>,
    },
}

/// Something that turns a prompt into model text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one prompt and return the model's raw text.
    async fn complete(&self, prompt: &PromptRequest) -> Result<String, BridgeError>;
}

/// [`CompletionBackend`] that posts to the ChopChop relay.
#[derive(Clone)]
pub struct RelayClient {
    inner: Arc<RelayClientInner>,
}

struct RelayClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl RelayClient {
    /// Create a client for the relay at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Unavailable` if the endpoint URL cannot be
    /// formed or the HTTP client cannot be built.
    pub fn new(base_url: &Url) -> Result<Self, BridgeError> {
        let endpoint = relay_endpoint(base_url)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(RelayClientInner { client, endpoint }),
        })
    }
}

fn relay_endpoint(base_url: &Url) -> Result<Url, BridgeError> {
    // Url::join drops the last path segment unless the base ends with '/'
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(RELAY_PATH)
        .map_err(|e| BridgeError::Unavailable(format!("invalid relay URL: {e}")))
}

#[async_trait]
impl CompletionBackend for RelayClient {
    #[instrument(skip(self, prompt), fields(endpoint = %self.inner.endpoint))]
    async fn complete(&self, prompt: &PromptRequest) -> Result<String, BridgeError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(prompt)
            .send()
            .await
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| BridgeError::Unavailable(format!("unreadable relay reply: {e}")))?;

        if !status.is_success() {
            let parsed = serde_json::from_value::<RelayErrorBody>(body.clone()).ok();
            let (error, details) = parsed.map_or_else(
                || (status.to_string(), Some(body)),
                |b| (b.error, b.details),
            );
            tracing::error!(status = status.as_u16(), %error, "Relay returned an error");
            return Err(BridgeError::Relay {
                status: status.as_u16(),
                error,
                details,
            });
        }

        reply_text(&body).map(str::to_string)
    }
}

/// Pull the model text out of a relay reply.
///
/// Prefers a non-empty `text` field, then falls back to a provider-shaped
/// `candidates[0].content.parts[0].text`.
///
/// # Errors
///
/// Returns `BridgeError::EmptyResponse` if neither is present and non-empty.
pub fn reply_text(body: &Value) -> Result<&str, BridgeError> {
    body.get("text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .or_else(|| {
            body.pointer("/candidates/0/content/parts/0/text")
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
        })
        .ok_or(BridgeError::EmptyResponse)
}

/// Ask the model for the grocery items on a receipt.
///
/// # Errors
///
/// Propagates the backend's [`BridgeError`].
pub async fn request_receipt_items(
    backend: &dyn CompletionBackend,
    ocr_text: &str,
) -> Result<String, BridgeError> {
    let request = PromptRequest::text(prompt::receipt_items(ocr_text));
    backend.complete(&request).await
}

/// Ask the model for recipes using the given ingredients and filters.
///
/// # Errors
///
/// Propagates the backend's [`BridgeError`].
pub async fn request_recipes<S: AsRef<str> + Sync>(
    backend: &dyn CompletionBackend,
    ingredients: &[S],
    filters: &[DietaryFilter],
) -> Result<String, BridgeError> {
    let request = PromptRequest::text(prompt::recipes(ingredients, filters));
    backend.complete(&request).await
}
