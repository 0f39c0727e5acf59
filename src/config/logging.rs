//! Logging setup
//!
//! # Environment Variables
//! - `LOG_FORMAT`: `json` (default) or `pretty`
//! - `RUST_LOG`: level filter (default: `info`)

use tracing_subscriber::EnvFilter;

/// Output formats accepted by `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` selects JSON
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match LogFormat::from_env() {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}
