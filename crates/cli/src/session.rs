//! Persisted login session.
//!
//! Stored as JSON next to the user's other config. The current page is kept
//! as the typed [`AppPage`] so a restored session resumes where it left off.

use std::path::{Path, PathBuf};

use chopchop_core::{AppPage, PageEvent};
use chopchop_scanner::store::{AuthUser, Session};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const SESSION_FILE_ENV: &str = "CHOPCHOP_SESSION_FILE";

/// On-disk session record.
#[derive(Serialize, Deserialize)]
pub struct StoredSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
    #[serde(default)]
    page: AppPage,
}

impl StoredSession {
    #[must_use]
    pub fn new(session: &Session, page: AppPage) -> Self {
        Self {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            user: session.user.clone(),
            page,
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            access_token: SecretString::from(self.access_token.clone()),
            refresh_token: self.refresh_token.clone().map(SecretString::from),
            user: self.user.clone(),
        }
    }

    /// The page to resume on.
    #[must_use]
    pub fn restored_page(&self) -> AppPage {
        AppPage::LoggedOut
            .apply(PageEvent::SessionRestored { saved: Some(self.page) })
            .unwrap_or(AppPage::Dashboard)
    }

    #[must_use]
    pub const fn page(&self) -> AppPage {
        self.page
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }

    pub const fn set_page(&mut self, page: AppPage) {
        self.page = page;
    }

    /// Swap in refreshed tokens, keeping the page.
    pub fn replace_session(&mut self, session: &Session) {
        *self = Self::new(session, self.page);
    }
}

/// Location of the session file.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `CHOPCHOP_SESSION_FILE`, or `chopchop/session.json` under the user's
    /// config directory.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Client` when no config directory can be determined.
    pub fn from_env() -> Result<Self, CliError> {
        if let Some(path) = std::env::var_os(SESSION_FILE_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(PathBuf::from(path)));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::Client(format!("no config directory; set {SESSION_FILE_ENV}")))?;
        Ok(Self::new(dir.join("chopchop").join("session.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StoredSession>, CliError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the session, readable only by the owner on Unix.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, stored: &StoredSession) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let file = options.open(&self.path)?;
        serde_json::to_writer_pretty(file, stored)?;
        Ok(())
    }

    /// Remove the stored session. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), CliError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
