//! Core types for ChopChop.
//!
//! This module provides type-safe wrappers for the fridge domain and the
//! relay wire contract shared by the relay server and its clients.

pub mod email;
pub mod filter;
pub mod freshness;
pub mod id;
pub mod inventory;
pub mod item;
pub mod relay;

pub use email::{Email, EmailError};
pub use filter::DietaryFilter;
pub use freshness::{Freshness, days_left, describe_days_left};
pub use id::*;
pub use inventory::{InventoryRecord, NewInventoryRow, expiry_from};
pub use item::{CandidateItem, PerishDays};
pub use relay::{PromptContent, PromptPart, PromptRequest, RelayErrorBody, RelayReply};
