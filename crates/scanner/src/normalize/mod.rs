//! Normalization of untrusted model output.
//!
//! Model replies are free text that only usually follows the requested
//! shape. Everything here is pure: no I/O, no clock.

mod items;
mod recipes;

pub use items::{parse_items, strip_code_fences};
pub use recipes::split_recipes;

/// A model reply that could not be turned into an item list.
///
/// Carries the cleaned text so the user can see what the model said.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct NormalizeError {
    /// Why the text was rejected.
    pub reason: String,
    /// The text after fence stripping.
    pub text: String,
}

impl NormalizeError {
    pub(crate) fn new(reason: impl Into<String>, text: &str) -> Self {
        Self {
            reason: reason.into(),
            text: text.to_string(),
        }
    }
}
