//! Supabase REST client (PostgREST rows + GoTrue auth).

use std::sync::Arc;

use async_trait::async_trait;
use chopchop_core::{Email, InventoryRecord, ItemId, NewInventoryRow};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;
use url::Url;

use super::types::TokenResponse;
use super::{AuthProvider, AuthUser, InventoryStore, Session, SignUpOutcome, StoreError};
use crate::config::SupabaseConfig;

const FRIDGE_TABLE: &str = "fridge";
const FRIDGE_COLUMNS: &str = "id,user_id,item_name,added_on,expires_on";

/// Client for a Supabase project.
///
/// Cheap to clone; the HTTP client and anon key are shared.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns error if the anon key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(config.anon_key.expose_secret())
            .map_err(|e| StoreError::Parse(format!("Invalid anon key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                base_url: config.url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url.as_str().trim_end_matches('/'))
    }

    fn table_url(&self) -> String {
        self.endpoint(&format!("rest/v1/{FRIDGE_TABLE}"))
    }

    fn bearer(token: &SecretString) -> Result<HeaderValue, StoreError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| StoreError::Parse(format!("Invalid access token format: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Send a request and fail on non-success status.
    async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = StoreError::from_response(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Store request failed");
            return Err(err);
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, StoreError> {
        Self::send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn authed(
        builder: reqwest::RequestBuilder,
        session: &Session,
    ) -> Result<reqwest::RequestBuilder, StoreError> {
        Ok(builder.header(AUTHORIZATION, Self::bearer(&session.access_token)?))
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl InventoryStore for SupabaseClient {
    #[instrument(skip(self, session, rows), fields(user_id = %session.user_id(), rows = rows.len()))]
    async fn insert_rows(&self, session: &Session, rows: &[NewInventoryRow]) -> Result<(), StoreError> {
        let request = Self::authed(self.inner.client.post(self.table_url()), session)?
            .header("Prefer", "return=minimal")
            .json(rows);
        Self::send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn list_rows(&self, session: &Session) -> Result<Vec<InventoryRecord>, StoreError> {
        let user_filter = format!("eq.{}", session.user_id());
        let request = Self::authed(self.inner.client.get(self.table_url()), session)?.query(&[
            ("select", FRIDGE_COLUMNS),
            ("user_id", user_filter.as_str()),
            ("order", "expires_on.asc"),
        ]);
        Self::send_json(request).await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn delete_row(&self, session: &Session, id: ItemId) -> Result<(), StoreError> {
        let id_filter = format!("eq.{id}");
        let user_filter = format!("eq.{}", session.user_id());
        let request = Self::authed(self.inner.client.delete(self.table_url()), session)?
            .query(&[("id", id_filter.as_str()), ("user_id", user_filter.as_str())]);
        Self::send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn update_expiry(
        &self,
        session: &Session,
        id: ItemId,
        expires_on: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let id_filter = format!("eq.{id}");
        let user_filter = format!("eq.{}", session.user_id());
        let request = Self::authed(self.inner.client.patch(self.table_url()), session)?
            .query(&[("id", id_filter.as_str()), ("user_id", user_filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&json!({ "expires_on": timestamp(expires_on) }));
        Self::send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn delete_expired(&self, session: &Session, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let user_filter = format!("eq.{}", session.user_id());
        let expiry_filter = format!("lte.{}", timestamp(now));
        let request = Self::authed(self.inner.client.delete(self.table_url()), session)?
            .query(&[
                ("user_id", user_filter.as_str()),
                ("expires_on", expiry_filter.as_str()),
                ("select", "id"),
            ])
            .header("Prefer", "return=representation");
        let removed: Vec<serde_json::Value> = Self::send_json(request).await?;
        Ok(removed.len())
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    #[instrument(skip_all)]
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, StoreError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email.as_str(), "password": password.expose_secret() }));
        let token: TokenResponse = Self::send_json(request).await?;
        tracing::info!(user_id = %token.user.id, "Signed in");
        Ok(token.into())
    }

    #[instrument(skip_all)]
    async fn sign_up(&self, email: &Email, password: &SecretString) -> Result<SignUpOutcome, StoreError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/v1/signup"))
            .json(&json!({ "email": email.as_str(), "password": password.expose_secret() }));
        let body: serde_json::Value = Self::send_json(request).await?;

        // With email confirmation on, the reply is the bare user record
        if body.get("access_token").is_some() {
            let token: TokenResponse =
                serde_json::from_value(body).map_err(|e| StoreError::Parse(e.to_string()))?;
            return Ok(SignUpOutcome::SignedIn(token.into()));
        }

        Ok(SignUpOutcome::ConfirmationRequired {
            email: email.as_str().to_string(),
        })
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn sign_out(&self, session: &Session) -> Result<(), StoreError> {
        let request = Self::authed(self.inner.client.post(self.endpoint("auth/v1/logout")), session)?;
        Self::send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, session))]
    async fn current_user(&self, session: &Session) -> Result<AuthUser, StoreError> {
        let request = Self::authed(self.inner.client.get(self.endpoint("auth/v1/user")), session)?;
        Self::send_json(request).await
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    async fn refresh(&self, session: &Session) -> Result<Session, StoreError> {
        let refresh_token = session
            .refresh_token
            .as_ref()
            .ok_or_else(|| StoreError::Unauthorized("no refresh token".to_string()))?;

        let request = self
            .inner
            .client
            .post(self.endpoint("auth/v1/token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token.expose_secret() }));
        let token: TokenResponse = Self::send_json(request).await?;
        Ok(token.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: Url::parse(url).expect("url"),
            anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.anon.sig"),
        })
        .expect("client")
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        assert_eq!(
            client("https://abcd.supabase.co/").table_url(),
            "https://abcd.supabase.co/rest/v1/fridge"
        );
        assert_eq!(
            client("https://abcd.supabase.co").endpoint("auth/v1/user"),
            "https://abcd.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_timestamp_format() {
        let at = DateTime::parse_from_rfc3339("2024-01-06T09:30:00Z")
            .expect("ts")
            .with_timezone(&Utc);
        assert_eq!(timestamp(at), "2024-01-06T09:30:00.000Z");
    }

    #[test]
    fn test_debug_omits_key() {
        let debug_output = format!("{:?}", client("https://abcd.supabase.co"));
        assert!(!debug_output.contains("anon.sig"));
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_unauthorized() {
        let session = Session {
            access_token: SecretString::from("t"),
            refresh_token: None,
            user: AuthUser {
                id: chopchop_core::UserId::new(uuid::Uuid::nil()),
                email: None,
            },
        };
        let err = client("http://127.0.0.1:9")
            .refresh(&session)
            .await
            .expect_err("no refresh token");
        assert!(matches!(err, StoreError::Unauthorized(_)));
    }
}
