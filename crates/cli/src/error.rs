//! CLI error type.

use chopchop_core::{EmailError, TransitionError};
use chopchop_scanner::PipelineError;
use chopchop_scanner::config::ConfigError;
use chopchop_scanner::fridge::FridgeError;
use chopchop_scanner::store::StoreError;
use thiserror::Error;

/// Errors surfaced by `chopchop` commands. Messages are printed as-is.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Not logged in. Run `chopchop login` first.")]
    NotLoggedIn,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Give an expiry with --expires YYYY-MM-DD or --days N.")]
    MissingExpiry,

    #[error("{0}")]
    Transition(#[from] TransitionError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Fridge(#[from] FridgeError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Could not start client: {0}")]
    Client(String),

    #[error("Session file error: {0}")]
    SessionFile(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
