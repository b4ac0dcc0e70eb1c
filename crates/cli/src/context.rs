//! Shared handles for commands.

use std::io::Write;
use std::sync::Arc;

use chopchop_core::{AppPage, PageEvent};
use chopchop_scanner::ScannerConfig;
use chopchop_scanner::bridge::RelayClient;
use chopchop_scanner::store::{AuthProvider, Session, StoreError, SupabaseClient};

use crate::error::CliError;
use crate::session::{SessionFile, StoredSession};

/// Clients and the session file, built once per invocation.
pub struct Context {
    pub config: ScannerConfig,
    pub supabase: Arc<SupabaseClient>,
    pub session_file: SessionFile,
}

impl Context {
    /// Load configuration and build clients.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or a client cannot be built.
    pub fn from_env() -> Result<Self, CliError> {
        let config = ScannerConfig::from_env()?;
        let supabase = Arc::new(SupabaseClient::new(&config.supabase)?);
        Ok(Self {
            config,
            supabase,
            session_file: SessionFile::from_env()?,
        })
    }

    /// Client for the relay service.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay URL is unusable.
    pub fn relay(&self) -> Result<Arc<RelayClient>, CliError> {
        RelayClient::new(&self.config.relay_url)
            .map(Arc::new)
            .map_err(|e| CliError::Client(e.to_string()))
    }

    /// Load the stored session and confirm it is still accepted, refreshing
    /// the tokens once if the access token has expired.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` when there is no usable session.
    pub async fn restore(&self) -> Result<StoredSession, CliError> {
        let mut stored = self.session_file.load()?.ok_or(CliError::NotLoggedIn)?;
        let session = stored.session();

        match self.supabase.current_user(&session).await {
            Ok(_) => {}
            Err(StoreError::Unauthorized(reason)) => {
                tracing::info!(%reason, "Access token rejected, refreshing");
                let refreshed = self.supabase.refresh(&session).await.map_err(|e| {
                    tracing::warn!(error = %e, "Session refresh failed");
                    CliError::NotLoggedIn
                })?;
                stored.replace_session(&refreshed);
                self.session_file.save(&stored)?;
            }
            Err(e) => return Err(e.into()),
        }

        let page = stored.restored_page();
        stored.set_page(page);
        Ok(stored)
    }

    /// Apply a page event to the stored session and save it.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid transition or a failed write.
    pub fn navigate(&self, stored: &mut StoredSession, event: PageEvent) -> Result<AppPage, CliError> {
        let page = stored.page().apply(event)?;
        stored.set_page(page);
        self.session_file.save(stored)?;
        tracing::debug!(?page, "Page changed");
        Ok(page)
    }

    /// Persist a freshly signed-in session.
    ///
    /// # Errors
    ///
    /// Returns an error for a failed write.
    pub fn remember(&self, session: &Session) -> Result<AppPage, CliError> {
        let page = AppPage::LoggedOut.apply(PageEvent::SignedIn)?;
        self.session_file.save(&StoredSession::new(session, page))?;
        Ok(page)
    }
}

/// Write a line of command output to stdout.
///
/// # Errors
///
/// Returns an error if stdout is closed.
pub fn say(line: impl std::fmt::Display) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    Ok(())
}

/// Describe what the user can do from a page.
#[must_use]
pub const fn page_hint(page: AppPage) -> &'static str {
    match page {
        AppPage::LoggedOut => "Run `chopchop login` to sign in.",
        AppPage::AwaitingScanChoice => {
            "Scan a receipt with `chopchop scan <image>`, or `chopchop skip` to go to your fridge."
        }
        AppPage::Dashboard => "See your fridge with `chopchop fridge list` or get ideas with `chopchop recipes`.",
    }
}
