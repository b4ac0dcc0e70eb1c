//! `POST /api/gemini` - prompt relay.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chopchop_core::RelayReply;

use crate::error::RelayError;
use crate::gemini::GenerateContentRequest;
use crate::state::AppState;

/// Forward the caller's `contents` to Gemini and return the first
/// candidate's text.
///
/// Only JSON parseability is checked; a malformed `contents` value is
/// forwarded as-is and the provider's complaint is returned under
/// `details`.
///
/// # Errors
///
/// - 400 when the body is not JSON
/// - 500 with `details` when the provider reports a failure
/// - 500 `Server error` on transport or processing failures
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateContentRequest>, JsonRejection>,
) -> Result<Json<RelayReply>, RelayError> {
    let Json(request) = payload?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        let body = serde_json::to_string(&request).unwrap_or_default();
        tracing::debug!(%body, "Incoming relay request");
    }

    let text = state.gemini().generate_text(&request).await?;
    tracing::info!(chars = text.chars().count(), "Gemini response relayed");

    Ok(Json(RelayReply { text }))
}
