//! Inventory Writer: turns normalized items into persisted fridge rows.

use std::sync::Arc;

use chopchop_core::{CandidateItem, NewInventoryRow};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::PipelineError;
use crate::store::{InventoryStore, Session};

/// Writes scanned items for the session's user in one batched insert.
#[derive(Clone)]
pub struct InventoryWriter {
    store: Arc<dyn InventoryStore>,
}

impl std::fmt::Debug for InventoryWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryWriter").finish_non_exhaustive()
    }
}

impl InventoryWriter {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Persist `items`, stamping each with `added_on = now` and
    /// `expires_on = now + perish days`.
    ///
    /// Returns the rows that were written. An empty item list writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` before any store call if `session` is
    /// `None`, or `PersistenceFailure` if the store rejects the insert.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn write(
        &self,
        session: Option<&Session>,
        items: &[CandidateItem],
        now: DateTime<Utc>,
    ) -> Result<Vec<NewInventoryRow>, PipelineError> {
        let Some(session) = session else {
            tracing::warn!("Inventory write attempted without a session");
            return Err(PipelineError::NoAuthenticatedUser);
        };

        let rows: Vec<NewInventoryRow> = items
            .iter()
            .map(|item| NewInventoryRow::from_candidate(session.user_id(), item, now))
            .collect();

        if rows.is_empty() {
            return Ok(rows);
        }

        self.store.insert_rows(session, &rows).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to insert fridge rows");
            PipelineError::PersistenceFailure(e)
        })?;

        tracing::info!(user_id = %session.user_id(), rows = rows.len(), "Saved items to fridge");
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chopchop_core::{InventoryRecord, ItemId, UserId};
    use secrecy::SecretString;

    use super::*;
    use crate::store::{AuthUser, StoreError};

    /// In-memory store that records calls.
    #[derive(Default)]
    pub struct MemoryStore {
        pub inserts: AtomicUsize,
        pub rows: Mutex<Vec<InventoryRecord>>,
        pub fail_insert: bool,
    }

    impl MemoryStore {
        pub fn insert_calls(&self) -> usize {
            self.inserts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InventoryStore for MemoryStore {
        async fn insert_rows(&self, _session: &Session, rows: &[NewInventoryRow]) -> Result<(), StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_insert {
                return Err(StoreError::Api {
                    status: 403,
                    message: "new row violates row-level security policy".to_string(),
                });
            }
            let mut stored = self.rows.lock().expect("lock");
            for row in rows {
                let id = ItemId::new(i64::try_from(stored.len()).expect("len") + 1);
                stored.push(InventoryRecord {
                    id,
                    user_id: row.user_id,
                    item_name: row.item_name.clone(),
                    added_on: row.added_on,
                    expires_on: Some(row.expires_on),
                });
            }
            Ok(())
        }

        async fn list_rows(&self, session: &Session) -> Result<Vec<InventoryRecord>, StoreError> {
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .filter(|row| row.user_id == session.user_id())
                .cloned()
                .collect();
            rows.sort_by_key(|row| row.expires_on);
            Ok(rows)
        }

        async fn delete_row(&self, _session: &Session, id: ItemId) -> Result<(), StoreError> {
            self.rows.lock().expect("lock").retain(|row| row.id != id);
            Ok(())
        }

        async fn update_expiry(
            &self,
            _session: &Session,
            id: ItemId,
            expires_on: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            for row in self.rows.lock().expect("lock").iter_mut() {
                if row.id == id {
                    row.expires_on = Some(expires_on);
                }
            }
            Ok(())
        }

        async fn delete_expired(&self, session: &Session, now: DateTime<Utc>) -> Result<usize, StoreError> {
            let mut rows = self.rows.lock().expect("lock");
            let before = rows.len();
            rows.retain(|row| {
                row.user_id != session.user_id() || row.expires_on.is_none_or(|expires_on| expires_on > now)
            });
            Ok(before - rows.len())
        }
    }

    pub fn session() -> Session {
        Session {
            access_token: SecretString::from("eyJ.test.token"),
            refresh_token: None,
            user: AuthUser {
                id: UserId::new(uuid::Uuid::from_u128(0x42)),
                email: Some("cook@example.com".to_string()),
            },
        }
    }

    pub fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).expect("timestamp").with_timezone(&Utc)
    }
}

#[cfg(test)]
mod tests {
    use chopchop_core::PerishDays;

    use super::test_support::{MemoryStore, at, session};
    use super::*;

    #[tokio::test]
    async fn test_no_session_never_touches_store() {
        let store = Arc::new(MemoryStore::default());
        let writer = InventoryWriter::new(store.clone());
        let items = vec![CandidateItem::new("🥛 Milk", PerishDays::clamped(7))];

        let err = writer
            .write(None, &items, at("2024-01-01T00:00:00Z"))
            .await
            .expect_err("no session");

        assert!(matches!(err, PipelineError::NoAuthenticatedUser));
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_rows_get_expiry_and_one_batch() {
        let store = Arc::new(MemoryStore::default());
        let writer = InventoryWriter::new(store.clone());
        let session = session();
        let items = vec![
            CandidateItem::new("🍞 Bread", PerishDays::clamped(5)),
            CandidateItem::new("🍚 Rice", PerishDays::clamped(365)),
        ];

        let rows = writer
            .write(Some(&session), &items, at("2024-01-01T00:00:00Z"))
            .await
            .expect("write");

        assert_eq!(store.insert_calls(), 1);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.user_id == session.user_id()));
        assert_eq!(rows.first().map(|r| r.expires_on), Some(at("2024-01-06T00:00:00Z")));
        assert_eq!(rows.get(1).map(|r| r.expires_on), Some(at("2024-12-31T00:00:00Z")));
    }

    #[tokio::test]
    async fn test_empty_list_skips_insert() {
        let store = Arc::new(MemoryStore::default());
        let writer = InventoryWriter::new(store.clone());

        let rows = writer
            .write(Some(&session()), &[], at("2024-01-01T00:00:00Z"))
            .await
            .expect("write");

        assert!(rows.is_empty());
        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_store_rejection_is_persistence_failure() {
        let store = Arc::new(MemoryStore {
            fail_insert: true,
            ..MemoryStore::default()
        });
        let writer = InventoryWriter::new(store);
        let items = vec![CandidateItem::new("🧀 Cheese", PerishDays::clamped(20))];

        let err = writer
            .write(Some(&session()), &items, at("2024-01-01T00:00:00Z"))
            .await
            .expect_err("rejected");

        assert!(matches!(err, PipelineError::PersistenceFailure(_)));
    }
}
