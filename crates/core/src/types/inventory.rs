//! Fridge inventory rows.
//!
//! Column names match the store's `fridge` collection:
//! `id`, `user_id`, `item_name`, `added_on`, `expires_on`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ItemId, UserId};
use super::item::{CandidateItem, PerishDays};

/// Compute an expiry timestamp `perish_days` calendar days after `added_on`.
///
/// Days are fixed 24-hour spans in UTC; no business-day or DST adjustment.
#[must_use]
pub fn expiry_from(added_on: DateTime<Utc>, perish_days: PerishDays) -> DateTime<Utc> {
    added_on + TimeDelta::days(i64::from(perish_days.get()))
}

/// A row to insert into the fridge collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewInventoryRow {
    pub user_id: UserId,
    pub item_name: String,
    pub added_on: DateTime<Utc>,
    pub expires_on: DateTime<Utc>,
}

impl NewInventoryRow {
    /// Build a row from a scanned candidate, stamped at `now`.
    #[must_use]
    pub fn from_candidate(user_id: UserId, item: &CandidateItem, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            item_name: item.name.clone(),
            added_on: now,
            expires_on: expiry_from(now, item.perish_days),
        }
    }

    /// Build a manually entered row with an explicit expiry.
    #[must_use]
    pub fn manual(
        user_id: UserId,
        item_name: impl Into<String>,
        expires_on: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            item_name: item_name.into(),
            added_on: now,
            expires_on,
        }
    }
}

/// A persisted fridge row as read back from the store.
///
/// `expires_on` is optional because rows can be edited outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: ItemId,
    pub user_id: UserId,
    pub item_name: String,
    pub added_on: DateTime<Utc>,
    #[serde(default)]
    pub expires_on: Option<DateTime<Utc>>,
}

impl InventoryRecord {
    /// Case-insensitive substring match on the item name.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.item_name
            .to_lowercase()
            .contains(&needle.trim().to_lowercase())
    }
}
