//! Environment-driven configuration
//!
//! Read once at process start. A missing connection string is fatal;
//! everything else has a default.

use tracing::{debug, info};

use crate::http::ResponseStyle;

/// Cloudflare Turnstile verification endpoint.
pub const DEFAULT_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Connections kept by the process-wide pool.
pub const DEFAULT_POOL_SIZE: u32 = 3;

const DATABASE_URL_VARS: [&str; 2] = ["SUPABASE_DB_URL", "DATABASE_URL"];
const CAPTCHA_SECRET_VAR: &str = "CLOUDFLARE_SECRET_KEY";
const VERIFY_URL_VAR: &str = "TURNSTILE_VERIFY_URL";
const RESPONSE_STYLE_VAR: &str = "LIKE_RESPONSE_STYLE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SUPABASE_DB_URL environment variable is not set")]
    MissingDatabaseUrl,

    #[error("invalid {var} value '{value}' (expected 'machine' or 'human')")]
    InvalidResponseStyle { var: &'static str, value: String },
}

/// Everything the like endpoint needs from its environment.
#[derive(Debug, Clone)]
pub struct LikeConfig {
    pub database_url: String,
    /// Shared Turnstile secret. Empty when unset, which the real service rejects.
    pub captcha_secret: String,
    pub verify_url: String,
    pub response_style: ResponseStyle,
    pub pool_size: u32,
}

impl LikeConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = DATABASE_URL_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let captcha_secret = lookup(CAPTCHA_SECRET_VAR).unwrap_or_default();
        if captcha_secret.is_empty() {
            debug!("{} not set, captcha verification will fail", CAPTCHA_SECRET_VAR);
        }

        let verify_url = lookup(VERIFY_URL_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string());

        let response_style = match lookup(RESPONSE_STYLE_VAR) {
            Some(value) if !value.is_empty() => value.parse::<ResponseStyle>().map_err(|_| {
                ConfigError::InvalidResponseStyle {
                    var: RESPONSE_STYLE_VAR,
                    value,
                }
            })?,
            _ => ResponseStyle::default(),
        };

        Ok(Self {
            database_url,
            captcha_secret,
            verify_url,
            response_style,
            pool_size: DEFAULT_POOL_SIZE,
        })
    }
}

/// Load a `.env` file from the current directory, if there is one.
///
/// Variables already present in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded configuration from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found, using environment only"),
        Err(e) => debug!("Failed to load .env: {}", e),
    }
}
