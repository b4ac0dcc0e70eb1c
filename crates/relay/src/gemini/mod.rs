//! Gemini `generateContent` integration.
//!
//! The relay forwards the caller's `contents` verbatim and attaches the API
//! key server-side via the `x-goog-api-key` header, so the key never appears
//! in a URL, a log line, or a browser.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{GenerateContentRequest, first_candidate_text};
