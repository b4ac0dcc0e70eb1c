//! Sign-in, sign-up, sign-out and status.

use chopchop_core::{AppPage, Email};
use chopchop_scanner::store::{AuthProvider, SignUpOutcome};
use secrecy::SecretString;

use crate::context::{Context, page_hint, say};
use crate::error::CliError;

pub async fn login(ctx: &Context, email: &str, password: SecretString) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let session = ctx.supabase.sign_in(&email, &password).await?;
    let page = ctx.remember(&session)?;

    say(format_args!("Signed in as {email}."))?;
    say(page_hint(page))
}

pub async fn signup(ctx: &Context, email: &str, password: SecretString) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    match ctx.supabase.sign_up(&email, &password).await? {
        SignUpOutcome::SignedIn(session) => {
            let page = ctx.remember(&session)?;
            say(format_args!("Account created. Signed in as {email}."))?;
            say(page_hint(page))
        }
        SignUpOutcome::ConfirmationRequired { email } => say(format_args!(
            "Check {email} for a confirmation link, then run `chopchop login`."
        )),
    }
}

pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    let Some(stored) = ctx.session_file.load()? else {
        return say("Already logged out.");
    };

    // Local sign-out still happens if the token was already revoked
    if let Err(e) = ctx.supabase.sign_out(&stored.session()).await {
        tracing::warn!(error = %e, "Remote sign-out failed");
    }
    ctx.session_file.clear()?;
    say("Logged out.")
}

pub async fn status(ctx: &Context) -> Result<(), CliError> {
    let stored = match ctx.restore().await {
        Ok(stored) => stored,
        Err(CliError::NotLoggedIn) => {
            return say(format_args!("Logged out. {}", page_hint(AppPage::LoggedOut)));
        }
        Err(e) => return Err(e),
    };

    say(format_args!(
        "Signed in as {}.",
        stored.email().unwrap_or("(no email on record)")
    ))?;
    say(page_hint(stored.page()))
}
