//! Integration tests for ChopChop.
//!
//! Every external collaborator is replaced by an in-process fake bound to
//! `127.0.0.1:0`, so the suite runs offline:
//!
//! - `relay_provider` - relay service against a fake Gemini provider
//! - `supabase_store` - store client against a fake Supabase project
//! - `scan_pipeline` - scan and recipe flows over relay + store fakes
//!
//! Run with: `cargo test -p chopchop-integration-tests`

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;

use axum::Router;
use chopchop_relay::config::{GeminiConfig, RelayConfig};
use secrecy::SecretString;
use tokio::net::TcpListener;
use url::Url;

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn spawn(router: Router) -> Url {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Url::parse(&format!("http://{addr}")).expect("server url")
}

/// Relay configuration pointing at a provider base URL.
#[must_use]
pub fn relay_config(provider_base: &Url) -> RelayConfig {
    RelayConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        gemini: GeminiConfig {
            api_key: SecretString::from("AIzaSyB3x9Qm2LkP7vT0wR5nC8dE1fG4hJ6"),
            model: "gemini-1.5-flash".to_string(),
            api_base: provider_base.join("v1beta").expect("provider base"),
        },
        allowed_origins: None,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// Start a relay in front of `provider` and return the relay's base URL.
pub async fn spawn_relay(provider: Router) -> Url {
    let provider_url = spawn(provider).await;
    let state = chopchop_relay::AppState::new(relay_config(&provider_url)).expect("relay state");
    spawn(chopchop_relay::app(state)).await
}
