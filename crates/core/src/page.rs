//! Application page state machine.
//!
//! ```text
//!                 SignedIn                    ScanFinished | SkipScan
//!   LoggedOut ─────────────▶ AwaitingScanChoice ─────────────────────▶ Dashboard
//!       ▲                          ▲                                     │
//!       │                          └──────────── AddReceipt ─────────────┘
//!       └──────────────── SignedOut (from any page) ─────────────────────
//! ```
//!
//! `SessionRestored` carries the page saved with the session and resumes
//! there, falling back to `Dashboard` when nothing usable was saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The page a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppPage {
    #[default]
    LoggedOut,
    AwaitingScanChoice,
    Dashboard,
}

/// Auth events and explicit navigation that move between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum PageEvent {
    /// Interactive sign-in succeeded.
    SignedIn,
    /// A stored session was found at start-up.
    SessionRestored { saved: Option<AppPage> },
    SignedOut,
    /// A receipt scan completed (successfully or not, the user moves on).
    ScanFinished,
    SkipScan,
    /// The user asked to scan another receipt from the dashboard.
    AddReceipt,
}

/// A transition that is not defined for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} while on {page:?}")]
pub struct TransitionError {
    pub page: AppPage,
    pub event: PageEvent,
}

impl AppPage {
    /// Apply an event, returning the next page.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the event is not valid on this page.
    pub fn apply(self, event: PageEvent) -> Result<Self, TransitionError> {
        use AppPage::{AwaitingScanChoice, Dashboard, LoggedOut};

        match (self, event) {
            (_, PageEvent::SignedOut) => Ok(LoggedOut),
            (LoggedOut, PageEvent::SignedIn) => Ok(AwaitingScanChoice),
            (LoggedOut, PageEvent::SessionRestored { saved }) => Ok(match saved {
                Some(page @ (AwaitingScanChoice | Dashboard)) => page,
                Some(LoggedOut) | None => Dashboard,
            }),
            (AwaitingScanChoice, PageEvent::ScanFinished | PageEvent::SkipScan) => Ok(Dashboard),
            (Dashboard, PageEvent::AddReceipt) => Ok(AwaitingScanChoice),
            (page, event) => Err(TransitionError { page, event }),
        }
    }

    /// Whether this page requires an authenticated session.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        !matches!(self, Self::LoggedOut)
    }
}
