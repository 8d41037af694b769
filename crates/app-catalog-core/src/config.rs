//! Catalog configuration
//!
//! Reads:
//! - `APP_CATALOG_BASE_URL` (default: `http://localhost:8080/api`)
//! - `APP_CATALOG_TOKEN` (optional bearer token)
//! - `APP_CATALOG_USE_MOCK` (`true`/`1`/`yes` for fixture mode, default: false)
//! - `APP_CATALOG_TIMEOUT_SECS` (default: 30)
//! - `APP_CATALOG_FIXTURES` (optional path to a fixture JSON file)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::Result;

/// Default catalog service base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog service base URL, paths are appended to it
    pub base_url: String,
    /// Bearer token attached to requests (optional)
    pub token: Option<String>,
    /// Serve listings from fixtures instead of the service
    pub use_mock: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Fixture file overriding the built-in set
    pub fixtures_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            use_mock: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fixtures_path: None,
        }
    }
}

impl CatalogConfig {
    /// Config for a specific service URL, other values default.
    pub fn new(base_url: &str) -> Self {
        CatalogConfig {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("APP_CATALOG_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        config.token = lookup("APP_CATALOG_TOKEN").filter(|v| !v.is_empty());
        config.use_mock = lookup("APP_CATALOG_USE_MOCK")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        if let Some(raw) = lookup("APP_CATALOG_TIMEOUT_SECS") {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!("APP_CATALOG_TIMEOUT_SECS is not a number: {raw}"))
            })?;
        }
        config.fixtures_path = lookup("APP_CATALOG_FIXTURES")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set mock mode
    pub fn with_mock(mut self, use_mock: bool) -> Self {
        self.use_mock = use_mock;
        self
    }

    /// Set request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set fixture file
    pub fn with_fixtures_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixtures_path = Some(path.into());
        self
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
