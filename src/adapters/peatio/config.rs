//! Peatio Configuration
//!
//! Connection settings for one Peatio session, loadable from YAML or from
//! the environment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Market used when none is configured
pub const DEFAULT_MARKET: &str = "btccny";

/// Public Peatio deployment
pub const DEFAULT_ENDPOINT: &str = "https://peatio.com";

/// Order book levels requested per side
pub const DEFAULT_DEPTH_LIMIT: u32 = 10;

/// Configuration for one Peatio session
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PeatioConfig {
    pub access_key: String,
    pub secret_key: String,
    /// Market identifier, base currency followed by quote (e.g. "btccny")
    pub market: String,
    /// API base URL without the `/api/v2` suffix
    pub endpoint: String,
    /// Conversion rate override for quote-currency prices
    pub rate: Option<Decimal>,
    pub depth_limit: u32,
}

impl PeatioConfig {
    /// Create configuration from environment variables
    ///
    /// Only `PEATIO_RATE` and `PEATIO_DEPTH_LIMIT` can fail, when set to
    /// something unparseable.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let rate = match std::env::var("PEATIO_RATE") {
            Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<Decimal>().map_err(|e| {
                AppError::Config(format!("PEATIO_RATE is not a decimal ({}): {}", raw, e))
            })?),
            _ => None,
        };

        let depth_limit = match std::env::var("PEATIO_DEPTH_LIMIT") {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| {
                AppError::Config(format!("PEATIO_DEPTH_LIMIT is not an integer ({}): {}", raw, e))
            })?,
            Err(_) => defaults.depth_limit,
        };

        let config = Self {
            access_key: std::env::var("PEATIO_ACCESS_KEY").unwrap_or_default(),
            secret_key: std::env::var("PEATIO_SECRET_KEY").unwrap_or_default(),
            market: std::env::var("PEATIO_MARKET").unwrap_or(defaults.market),
            endpoint: std::env::var("PEATIO_ENDPOINT").unwrap_or(defaults.endpoint),
            rate,
            depth_limit,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        if self.market.is_empty() || !self.market.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Config(format!(
                "market must be a non-empty alphanumeric identifier (got '{}')",
                self.market
            )));
        }

        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "endpoint must be an http(s) URL (got '{}')",
                self.endpoint
            )));
        }

        if self.access_key.is_empty() != self.secret_key.is_empty() {
            return Err(AppError::Config(
                "access_key and secret_key must be set together".to_string(),
            ));
        }

        if let Some(rate) = self.rate {
            if rate <= Decimal::ZERO {
                return Err(AppError::Config(format!("rate must be positive (got {})", rate)));
            }
        }

        if self.depth_limit == 0 {
            return Err(AppError::Config("depth_limit must be at least 1".to_string()));
        }

        Ok(())
    }

    /// True when credentials are present for private endpoints
    pub fn has_credentials(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty()
    }

    /// Endpoint with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

impl Default for PeatioConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            market: DEFAULT_MARKET.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            rate: None,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl std::fmt::Debug for PeatioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeatioConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("market", &self.market)
            .field("endpoint", &self.endpoint)
            .field("rate", &self.rate)
            .field("depth_limit", &self.depth_limit)
            .finish()
    }
}
