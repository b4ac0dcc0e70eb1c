//! Scanner configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Project URL of the auth + row store
//! - `SUPABASE_ANON_KEY` - Public anon key (row access is still scoped by the user's token)
//!
//! ## Optional
//! - `CHOPCHOP_RELAY_URL` - Base URL of the relay (default: <http://localhost:5001>)
//! - `CHOPCHOP_TESSERACT` - Path to the `tesseract` binary (default: `tesseract`)
//! - `CHOPCHOP_OCR_LANG` - Tesseract language code (default: `eng`)

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

pub const DEFAULT_RELAY_URL: &str = "http://localhost:5001";
pub const DEFAULT_TESSERACT: &str = "tesseract";
pub const DEFAULT_OCR_LANG: &str = "eng";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "placeholder", "xxx", "insert", "put-your"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Scanner configuration.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Base URL of the relay service
    pub relay_url: Url,
    /// Auth + row store configuration
    pub supabase: SupabaseConfig,
    /// Local OCR configuration
    pub ocr: OcrConfig,
}

/// Supabase project configuration.
///
/// Implements `Debug` manually to redact the anon key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., <https://abcd.supabase.co>)
    pub url: Url,
    /// Anon API key
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

/// Tesseract OCR configuration.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path or name of the `tesseract` executable
    pub tesseract: PathBuf,
    /// Language code passed as `-l`
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract: PathBuf::from(DEFAULT_TESSERACT),
            language: DEFAULT_OCR_LANG.to_string(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a URL does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let relay_url = parse_url(
            "CHOPCHOP_RELAY_URL",
            &get_env_or_default("CHOPCHOP_RELAY_URL", DEFAULT_RELAY_URL),
        )?;
        let supabase_url = parse_url("SUPABASE_URL", &get_required_env("SUPABASE_URL")?)?;
        let anon_key = SecretString::from(get_required_env("SUPABASE_ANON_KEY")?);
        check_not_placeholder(&anon_key, "SUPABASE_ANON_KEY")?;

        Ok(Self {
            relay_url,
            supabase: SupabaseConfig {
                url: supabase_url,
                anon_key,
            },
            ocr: OcrConfig {
                tesseract: PathBuf::from(get_env_or_default("CHOPCHOP_TESSERACT", DEFAULT_TESSERACT)),
                language: get_env_or_default("CHOPCHOP_OCR_LANG", DEFAULT_OCR_LANG),
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn check_not_placeholder(secret: &SecretString, key: &str) -> Result<(), ConfigError> {
    let lower = secret.expose_secret().to_lowercase();
    match PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        Some(pattern) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        )),
        None => Ok(()),
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_requires_http() {
        assert!(parse_url("X", "https://abcd.supabase.co").is_ok());
        assert!(parse_url("X", "http://localhost:5001").is_ok());
        assert!(matches!(
            parse_url("X", "ftp://example.org"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_url("X", "not a url").is_err());
    }

    #[test]
    fn test_placeholder_anon_key_rejected() {
        let key = SecretString::from("your-anon-key");
        assert!(check_not_placeholder(&key, "SUPABASE_ANON_KEY").is_err());

        let key = SecretString::from("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30.sig");
        assert!(check_not_placeholder(&key, "SUPABASE_ANON_KEY").is_ok());
    }

    #[test]
    fn test_supabase_config_debug_redacts_key() {
        let config = SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").expect("url"),
            anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.secret-payload"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abcd.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret-payload"));
    }
}
