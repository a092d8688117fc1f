//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TRENDHORA_STORAGE_DIR` - Directory for file-backed storage (default: .trendhora)
//! - `TRENDHORA_WISHLIST_KEY` - Storage key of the wishlist (default: wishlist)
//! - `TRENDHORA_RECENTLY_VIEWED_KEY` - Storage key of recently viewed products
//!   (default: recentlyViewed)
//! - `TRENDHORA_RECENTLY_VIEWED_LIMIT` - Products kept in recently viewed (default: 5)
//! - `TRENDHORA_WHATSAPP_NUMBER` - Store number orders are sent to, digits only
//!   (default: 919876543210)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of error events sent (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;

use crate::recently_viewed;

const DEFAULT_STORAGE_DIR: &str = ".trendhora";
const DEFAULT_WISHLIST_KEY: &str = "wishlist";
const DEFAULT_RECENTLY_VIEWED_KEY: &str = "recentlyViewed";
const DEFAULT_WHATSAPP_NUMBER: &str = "919876543210";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Directory used by the file storage backend
    pub storage_dir: PathBuf,
    /// Storage key of the wishlist
    pub wishlist_key: String,
    /// Storage key of the recently viewed list
    pub recently_viewed_key: String,
    /// Maximum number of recently viewed products kept
    pub recently_viewed_limit: usize,
    /// WhatsApp number checkout messages are addressed to
    pub whatsapp_number: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
            recently_viewed_key: DEFAULT_RECENTLY_VIEWED_KEY.to_string(),
            recently_viewed_limit: recently_viewed::DEFAULT_LIMIT,
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let recently_viewed_limit = match get("TRENDHORA_RECENTLY_VIEWED_LIMIT") {
            Some(raw) => parse_limit(&raw)?,
            None => defaults.recently_viewed_limit,
        };

        let whatsapp_number = get("TRENDHORA_WHATSAPP_NUMBER").unwrap_or(defaults.whatsapp_number);
        validate_whatsapp_number(&whatsapp_number)?;

        let sentry_sample_rate = match get("SENTRY_SAMPLE_RATE") {
            Some(raw) => parse_sample_rate(&raw)?,
            None => defaults.sentry_sample_rate,
        };

        Ok(Self {
            storage_dir: get("TRENDHORA_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from),
            wishlist_key: get("TRENDHORA_WISHLIST_KEY").unwrap_or(defaults.wishlist_key),
            recently_viewed_key: get("TRENDHORA_RECENTLY_VIEWED_KEY")
                .unwrap_or(defaults.recently_viewed_key),
            recently_viewed_limit,
            whatsapp_number,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.into())
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    const KEY: &str = "TRENDHORA_RECENTLY_VIEWED_LIMIT";
    let limit = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid(KEY, e.to_string()))?;
    if limit == 0 {
        return Err(invalid(KEY, "must be at least 1"));
    }
    Ok(limit)
}

fn validate_whatsapp_number(number: &str) -> Result<(), ConfigError> {
    if number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid(
            "TRENDHORA_WHATSAPP_NUMBER",
            "must contain digits only (country code included, no '+')",
        ))
    }
}

fn parse_sample_rate(raw: &str) -> Result<f32, ConfigError> {
    const KEY: &str = "SENTRY_SAMPLE_RATE";
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| invalid(KEY, e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(invalid(KEY, "must be between 0.0 and 1.0"));
    }
    Ok(rate)
}
