use chopchop_core::UserId;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session.
///
/// Passed explicitly to every store call; nothing caches "the current user".
/// Implements `Debug` manually to redact tokens.
#[derive(Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub user: AuthUser,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user.id
    }
}

/// Result of registering an account.
#[derive(Debug)]
pub enum SignUpOutcome {
    /// The account is usable immediately.
    SignedIn(Session),
    /// A confirmation email was sent; sign in after confirming.
    ConfirmationRequired { email: String },
}

/// Token endpoint reply.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(token.access_token),
            refresh_token: token.refresh_token.map(SecretString::from),
            user: token.user,
        }
    }
}
