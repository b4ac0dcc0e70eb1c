//! ChopChop receipt scanner.
//!
//! Turns a photo of a grocery receipt into fridge rows:
//!
//! 1. [`ocr`] extracts raw text from the image.
//! 2. [`bridge`] asks the model, through the relay, for an item list.
//! 3. [`normalize`] parses the untrusted reply.
//! 4. [`inventory`] writes the rows with computed expiry dates.
//!
//! [`pipeline::ScanPipeline`] runs the four stages in order. The same
//! building blocks back [`recipes::RecipeGenerator`] and
//! [`fridge::FridgeService`].
//!
//! Identity is always an explicit [`store::Session`] argument.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bridge;
pub mod config;
pub mod error;
pub mod fridge;
pub mod inventory;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod prompt;
pub mod recipes;
pub mod store;

pub use config::ScannerConfig;
pub use error::PipelineError;
pub use pipeline::{ScanPipeline, ScanReport};
