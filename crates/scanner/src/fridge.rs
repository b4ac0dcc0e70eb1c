//! Fridge management: listing, manual edits and clean-up.

use std::sync::Arc;

use chopchop_core::{Freshness, InventoryRecord, ItemId, NewInventoryRow, days_left};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use crate::store::{InventoryStore, Session, StoreError};

/// Errors from fridge management.
#[derive(Debug, Error)]
pub enum FridgeError {
    #[error("No user logged in.")]
    NoAuthenticatedUser,

    #[error("Item name cannot be empty.")]
    EmptyName,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A fridge row with its freshness evaluated at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FridgeEntry {
    pub record: InventoryRecord,
    /// Whole days until expiry, rounded up. `None` without an expiry date.
    pub days_left: Option<i64>,
    pub freshness: Freshness,
}

impl FridgeEntry {
    #[must_use]
    pub fn evaluate(record: InventoryRecord, now: DateTime<Utc>) -> Self {
        Self {
            days_left: record.expires_on.map(|expires_on| days_left(expires_on, now)),
            freshness: Freshness::classify(record.expires_on, now),
            record,
        }
    }
}

/// Operations on the session user's fridge rows.
#[derive(Clone)]
pub struct FridgeService {
    store: Arc<dyn InventoryStore>,
}

impl std::fmt::Debug for FridgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FridgeService").finish_non_exhaustive()
    }
}

fn require(session: Option<&Session>) -> Result<&Session, FridgeError> {
    session.ok_or(FridgeError::NoAuthenticatedUser)
}

impl FridgeService {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// All rows, soonest expiry first.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` or the store's error.
    pub async fn list(&self, session: Option<&Session>, now: DateTime<Utc>) -> Result<Vec<FridgeEntry>, FridgeError> {
        let rows = self.store.list_rows(require(session)?).await?;
        Ok(rows.into_iter().map(|row| FridgeEntry::evaluate(row, now)).collect())
    }

    /// Rows whose name contains `needle`, ignoring case. A blank needle
    /// matches everything.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` or the store's error.
    pub async fn search(
        &self,
        session: Option<&Session>,
        needle: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<FridgeEntry>, FridgeError> {
        let mut entries = self.list(session, now).await?;
        entries.retain(|entry| entry.record.matches(needle));
        Ok(entries)
    }

    /// Add one item by hand with an explicit expiry.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for a blank name, `NoAuthenticatedUser`, or the
    /// store's error.
    #[instrument(skip(self, session))]
    pub async fn add(
        &self,
        session: Option<&Session>,
        name: &str,
        expires_on: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<NewInventoryRow, FridgeError> {
        let session = require(session)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(FridgeError::EmptyName);
        }

        let row = NewInventoryRow::manual(session.user_id(), name, expires_on, now);
        self.store.insert_rows(session, std::slice::from_ref(&row)).await?;
        Ok(row)
    }

    /// Delete one row.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` or the store's error.
    #[instrument(skip(self, session))]
    pub async fn delete(&self, session: Option<&Session>, id: ItemId) -> Result<(), FridgeError> {
        Ok(self.store.delete_row(require(session)?, id).await?)
    }

    /// Change a row's expiry.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` or the store's error.
    #[instrument(skip(self, session))]
    pub async fn update_expiry(
        &self,
        session: Option<&Session>,
        id: ItemId,
        expires_on: DateTime<Utc>,
    ) -> Result<(), FridgeError> {
        Ok(self.store.update_expiry(require(session)?, id, expires_on).await?)
    }

    /// Remove every row that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` or the store's error.
    #[instrument(skip(self, session))]
    pub async fn clear_expired(&self, session: Option<&Session>, now: DateTime<Utc>) -> Result<usize, FridgeError> {
        let removed = self.store.delete_expired(require(session)?, now).await?;
        tracing::info!(removed, "Cleared expired items");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::test_support::{MemoryStore, at, session};

    async fn seeded() -> (FridgeService, Session) {
        let service = FridgeService::new(Arc::new(MemoryStore::default()));
        let session = session();
        let now = at("2024-01-01T00:00:00Z");
        for (name, expires) in [
            ("🥛 Milk", "2024-01-08T00:00:00Z"),
            ("🥬 Spinach", "2024-01-02T12:00:00Z"),
            ("🍗 Chicken", "2023-12-30T00:00:00Z"),
        ] {
            service
                .add(Some(&session), name, at(expires), now)
                .await
                .expect("add");
        }
        (service, session)
    }

    #[tokio::test]
    async fn test_list_orders_and_classifies() {
        let (service, session) = seeded().await;
        let entries = service
            .list(Some(&session), at("2024-01-01T00:00:00Z"))
            .await
            .expect("list");

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.record.item_name.as_str(), e.days_left, e.freshness))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("🍗 Chicken", Some(-2), Freshness::Expired),
                ("🥬 Spinach", Some(2), Freshness::Urgent),
                ("🥛 Milk", Some(7), Freshness::Fresh),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (service, session) = seeded().await;
        let hits = service
            .search(Some(&session), "SPIN", at("2024-01-01T00:00:00Z"))
            .await
            .expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().map(|e| e.record.item_name.as_str()), Some("🥬 Spinach"));
    }

    #[tokio::test]
    async fn test_clear_expired_and_edit() {
        let (service, session) = seeded().await;
        let now = at("2024-01-03T00:00:00Z");

        let removed = service.clear_expired(Some(&session), now).await.expect("clear");
        assert_eq!(removed, 2);

        let remaining = service.list(Some(&session), now).await.expect("list");
        let milk = remaining.first().expect("milk left").record.id;
        service
            .update_expiry(Some(&session), milk, at("2024-01-04T00:00:00Z"))
            .await
            .expect("update");
        service.delete(Some(&session), milk).await.expect("delete");
        assert!(service.list(Some(&session), now).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_blank_and_missing_session() {
        let service = FridgeService::new(Arc::new(MemoryStore::default()));
        let now = at("2024-01-01T00:00:00Z");
        assert!(matches!(
            service.add(Some(&session()), "   ", now, now).await,
            Err(FridgeError::EmptyName)
        ));
        assert!(matches!(
            service.add(None, "Milk", now, now).await,
            Err(FridgeError::NoAuthenticatedUser)
        ));
    }
}
