//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::listing::ListingConfig;
use crate::listing::types::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// Longest accepted token lifetime: one year.
const MAX_TOKEN_MINUTES: i64 = 365 * 24 * 60;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Listing from a fixture works without it.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// API version segment used in page links (default: v1).
    pub api_version: String,

    /// Default page size (default: 5).
    pub per_page: u32,

    /// Largest page size a client may request (default: 100).
    pub max_per_page: u32,

    /// Report dropped query parameters in pagination metadata (default: false).
    pub listing_strict: bool,

    /// Secret used to sign account tokens.
    pub secret_key: Option<String>,

    /// Token lifetime in minutes (default: 30).
    pub jwt_expired_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|v| !v.is_empty());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let api_version = lookup("API_VERSION").unwrap_or_else(|| "v1".to_string());

        let per_page: u32 = lookup("PER_PAGE")
            .unwrap_or_else(|| DEFAULT_PER_PAGE.to_string())
            .parse()
            .context("PER_PAGE must be a valid u32")?;
        anyhow::ensure!(per_page >= 1, "PER_PAGE must be at least 1");

        let max_per_page: u32 = lookup("MAX_PER_PAGE")
            .unwrap_or_else(|| MAX_PER_PAGE.to_string())
            .parse()
            .context("MAX_PER_PAGE must be a valid u32")?;
        anyhow::ensure!(
            max_per_page >= per_page,
            "MAX_PER_PAGE must not be smaller than PER_PAGE"
        );

        let listing_strict = match lookup("LISTING_STRICT") {
            Some(v) => parse_flag(&v).context("LISTING_STRICT must be true or false")?,
            None => false,
        };

        let secret_key = lookup("SECRET_KEY").filter(|v| !v.is_empty());

        let jwt_expired_minutes: i64 = lookup("JWT_EXPIRED_MINUTES")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("JWT_EXPIRED_MINUTES must be a valid integer")?;
        anyhow::ensure!(
            (1..=MAX_TOKEN_MINUTES).contains(&jwt_expired_minutes),
            "JWT_EXPIRED_MINUTES must be between 1 and {MAX_TOKEN_MINUTES}"
        );

        Ok(Self {
            database_url,
            database_max_connections,
            api_version,
            per_page,
            max_per_page,
            listing_strict,
            secret_key,
            jwt_expired_minutes,
        })
    }

    /// Listing settings for the pipeline.
    pub fn listing_config(&self) -> ListingConfig {
        ListingConfig {
            default_per_page: self.per_page,
            max_per_page: self.max_per_page,
            strict: self.listing_strict,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized flag value '{other}'"),
    }
}
