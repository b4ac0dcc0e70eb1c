//! Auth and row storage.
//!
//! Two seams: [`AuthProvider`] for sessions and [`InventoryStore`] for the
//! `fridge` collection. [`SupabaseClient`] implements both over REST.

mod error;
mod supabase;
mod types;

use async_trait::async_trait;
use chopchop_core::{Email, InventoryRecord, ItemId, NewInventoryRow};
use chrono::{DateTime, Utc};
use secrecy::SecretString;

pub use error::StoreError;
pub use supabase::SupabaseClient;
pub use types::{AuthUser, Session, SignUpOutcome};

/// Row access for the fridge collection, scoped to a session's user.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert all rows in one request.
    async fn insert_rows(&self, session: &Session, rows: &[NewInventoryRow]) -> Result<(), StoreError>;

    /// All rows owned by the session's user, soonest expiry first.
    async fn list_rows(&self, session: &Session) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Delete one row by id.
    async fn delete_row(&self, session: &Session, id: ItemId) -> Result<(), StoreError>;

    /// Replace a row's expiry timestamp.
    async fn update_expiry(
        &self,
        session: &Session,
        id: ItemId,
        expires_on: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Delete every row whose expiry is at or before `now`. Returns how many
    /// rows were removed.
    async fn delete_expired(&self, session: &Session, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Email/password authentication.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, StoreError>;

    /// Register a new account. Projects with email confirmation enabled do
    /// not return a session until the address is confirmed.
    async fn sign_up(&self, email: &Email, password: &SecretString) -> Result<SignUpOutcome, StoreError>;

    /// Revoke the session's tokens.
    async fn sign_out(&self, session: &Session) -> Result<(), StoreError>;

    /// Resolve the user behind a session, failing if the token is no longer valid.
    async fn current_user(&self, session: &Session) -> Result<AuthUser, StoreError>;

    /// Exchange the refresh token for a new session.
    async fn refresh(&self, session: &Session) -> Result<Session, StoreError>;
}
