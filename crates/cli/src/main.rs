//! ChopChop CLI - scan receipts into your fridge and get recipe ideas.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from --password or CHOPCHOP_PASSWORD)
//! chopchop login -e cook@example.com
//!
//! # Scan a receipt photo, or skip straight to the fridge
//! chopchop scan receipt.jpg
//! chopchop skip
//!
//! # Manage the fridge
//! chopchop fridge list --search milk
//! chopchop fridge add "🧀 Cheddar" --days 21
//! chopchop fridge edit 42 --expires 2024-02-01
//! chopchop fridge clear-expired
//!
//! # Recipes from what is in the fridge
//! chopchop recipes --filter vegetarian --filter "high protein"
//! ```
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY` - auth and row store (required)
//! - `CHOPCHOP_RELAY_URL` - relay base URL (default: <http://localhost:5001>)
//! - `CHOPCHOP_TESSERACT`, `CHOPCHOP_OCR_LANG` - OCR engine settings
//! - `CHOPCHOP_SESSION_FILE` - where the login session is kept
//! - `RUST_LOG` - log filter (default: `warn`); logs go to stderr

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chopchop_core::DietaryFilter;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod error;
mod session;

use context::Context;
use error::CliError;

#[derive(Parser)]
#[command(name = "chopchop")]
#[command(author, version, about = "ChopChop: receipts in, recipes out")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "CHOPCHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "CHOPCHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in and what to do next
    Status,
    /// Scan a receipt image and add its items to the fridge
    Scan {
        /// Path to the receipt image
        image: PathBuf,
    },
    /// Skip scanning and go to the fridge
    Skip,
    /// Manage fridge items
    Fridge {
        #[command(subcommand)]
        action: FridgeAction,
    },
    /// Suggest recipes from fridge items, soonest-expiring first
    Recipes {
        /// Dietary filter (repeatable): vegetarian, high-protein,
        /// chicken-dishes, high-veggie, low-calorie
        #[arg(short, long = "filter")]
        filters: Vec<DietaryFilter>,
    },
}

#[derive(Subcommand)]
enum FridgeAction {
    /// List items, soonest expiry first
    List {
        /// Only show items whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add an item by hand
    #[command(group = clap::ArgGroup::new("expiry").required(true))]
    Add {
        name: String,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long, group = "expiry")]
        expires: Option<String>,

        /// Days from now until expiry
        #[arg(long, group = "expiry")]
        days: Option<u32>,
    },
    /// Delete an item by id
    Delete { id: i64 },
    /// Change an item's expiry date
    Edit {
        id: i64,

        /// New expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: String,
    },
    /// Delete every expired item
    ClearExpired,
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, SecretString::from(password)).await?;
        }
        Commands::Signup { email, password } => {
            commands::auth::signup(&ctx, &email, SecretString::from(password)).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Status => commands::auth::status(&ctx).await?,
        Commands::Scan { image } => commands::scan::scan(&ctx, &image).await?,
        Commands::Skip => commands::scan::skip(&ctx).await?,
        Commands::Fridge { action } => match action {
            FridgeAction::List { search } => commands::fridge::list(&ctx, search.as_deref()).await?,
            FridgeAction::Add {
                name,
                expires,
                days,
            } => commands::fridge::add(&ctx, &name, expires.as_deref(), days).await?,
            FridgeAction::Delete { id } => commands::fridge::delete(&ctx, id).await?,
            FridgeAction::Edit { id, expires } => commands::fridge::edit(&ctx, id, &expires).await?,
            FridgeAction::ClearExpired => commands::fridge::clear_expired(&ctx).await?,
        },
        Commands::Recipes { filters } => commands::recipes::recipes(&ctx, &filters).await?,
    }
    Ok(())
}
