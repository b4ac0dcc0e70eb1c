//! Unified error handling for the relay.
//!
//! Every failure is reported as a JSON body of the shape
//! `{ "error": "...", "details"?: {...} }` so browser callers can always
//! parse the response.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chopchop_core::RelayErrorBody;
use thiserror::Error;

use crate::gemini::GeminiError;

/// Application-level error type for the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The provider reported a failure; its payload is passed back.
    #[error("Gemini API error")]
    Provider {
        /// Status the provider returned.
        status: u16,
        /// Provider error payload.
        details: serde_json::Value,
    },

    /// The request body was not parseable JSON.
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    /// Transport or processing failure while talking to the provider.
    #[error("Server error: {0}")]
    Upstream(GeminiError),
}

impl From<GeminiError> for RelayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Api { status, details } => Self::Provider { status, details },
            other => Self::Upstream(other),
        }
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Provider { status, details } => {
                tracing::error!(provider_status = status, details = %details, "Gemini API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayErrorBody {
                        error: "Gemini API error".to_string(),
                        details: Some(details),
                    },
                )
            }
            Self::BadRequest(message) => {
                tracing::warn!(%message, "Rejected relay request");
                (
                    StatusCode::BAD_REQUEST,
                    RelayErrorBody {
                        error: message,
                        details: None,
                    },
                )
            }
            Self::Upstream(err) => {
                let event_id = sentry::capture_error(&err);
                tracing::error!(
                    error = %err,
                    sentry_event_id = %event_id,
                    "Relay request failed"
                );
                // Don't expose transport details to callers
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RelayErrorBody {
                        error: "Server error".to_string(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::json;

    use super::*;

    async fn render(err: RelayError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[test]
    fn test_api_error_maps_to_provider() {
        let err = RelayError::from(GeminiError::Api {
            status: 403,
            details: json!({"error": {"status": "PERMISSION_DENIED"}}),
        });
        assert!(matches!(err, RelayError::Provider { status: 403, .. }));

        let err = RelayError::from(GeminiError::Parse("nope".to_string()));
        assert!(matches!(err, RelayError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_provider_error_embeds_details() {
        let details = json!({"error": {"code": 429, "message": "quota"}});
        let (status, body) = render(RelayError::Provider {
            status: 429,
            details: details.clone(),
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Gemini API error");
        assert_eq!(body["details"], details);
    }

    #[tokio::test]
    async fn test_upstream_error_is_generic() {
        let (status, body) = render(RelayError::Upstream(GeminiError::Parse(
            "secret internals".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Server error"}));
    }

    #[tokio::test]
    async fn test_bad_request_status() {
        let (status, body) = render(RelayError::BadRequest("bad json".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad json");
    }
}
