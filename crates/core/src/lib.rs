//! ChopChop Core - Shared domain types.
//!
//! This crate provides the types used across all ChopChop components:
//! - `relay` - The same-origin endpoint that forwards prompts to Gemini
//! - `scanner` - Receipt OCR, item extraction and fridge persistence
//! - `cli` - Terminal front end for scanning, fridge management and recipes
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Expiry arithmetic, freshness buckets and the page state machine
//! live here so they can be tested without a network.
//!
//! # Modules
//!
//! - [`types`] - Ids, emails, candidate items, inventory rows, dietary filters
//! - [`page`] - The `LoggedOut` / `AwaitingScanChoice` / `Dashboard` state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod page;
pub mod types;

pub use page::{AppPage, PageEvent, TransitionError};
pub use types::*;
