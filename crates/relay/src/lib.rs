//! ChopChop relay library.
//!
//! A stateless endpoint that forwards prompts to Gemini so that browsers
//! never hold the provider credential. Exposed as a library so the router
//! can be exercised in tests without binding a port.
//!
//! # Security
//!
//! `POST /api/gemini` is unauthenticated: anyone who can reach the host can
//! spend the provider quota. Bind to loopback or put the relay behind an
//! authenticating proxy.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gemini;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;
