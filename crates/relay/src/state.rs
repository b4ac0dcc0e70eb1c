//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::gemini::{GeminiClient, GeminiError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RelayConfig,
    gemini: GeminiClient,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be constructed.
    pub fn new(config: RelayConfig) -> Result<Self, GeminiError> {
        let gemini = GeminiClient::new(&config.gemini)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, gemini }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }
}
