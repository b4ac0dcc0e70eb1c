//! Pipeline-level error taxonomy.
//!
//! Each stage has its own error type; [`PipelineError`] is what a scan or a
//! recipe request reports to the user-facing layer. Messages are written to
//! be shown verbatim.

use thiserror::Error;

use crate::bridge::BridgeError;
use crate::normalize::NormalizeError;
use crate::ocr::OcrError;
use crate::store::StoreError;

/// Failure of a scan or recipe run. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// OCR produced no usable text, or the engine could not run.
    #[error("OCR failed: {0}")]
    OcrFailure(#[from] OcrError),

    /// The relay could not be reached.
    #[error("Could not reach the item extraction service: {0}")]
    LlmUnavailable(String),

    /// The relay answered but carried no text.
    #[error("Gemini returned no usable text.")]
    LlmEmptyResponse,

    /// The relay answered with an error status.
    #[error("Extraction service error ({status}): {error}")]
    RelayFailure {
        status: u16,
        error: String,
        details: Option<serde_json::Value>,
    },

    /// The model's reply could not be parsed as an item list.
    #[error("Failed to parse Gemini response ({reason}):\n{text}")]
    MalformedExtraction { reason: String, text: String },

    /// No signed-in user; nothing was sent to the store.
    #[error("No user logged in.")]
    NoAuthenticatedUser,

    /// The store rejected a read or write.
    #[error("Could not save to your fridge: {0}")]
    PersistenceFailure(#[from] StoreError),
}

impl From<BridgeError> for PipelineError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Unavailable(message) => Self::LlmUnavailable(message),
            BridgeError::EmptyResponse => Self::LlmEmptyResponse,
            BridgeError::Relay {
                status,
                error,
                details,
            } => Self::RelayFailure {
                status,
                error,
                details,
            },
        }
    }
}

impl From<NormalizeError> for PipelineError {
    fn from(err: NormalizeError) -> Self {
        Self::MalformedExtraction {
            reason: err.reason,
            text: err.text,
        }
    }
}
