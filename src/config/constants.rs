//! Application-wide constants and configuration defaults
//!
//! Values can be overridden via environment variables.

use std::time::Duration;

// =============================================================================
// HTTP Transport
// =============================================================================

/// Total request timeout (default: 10 seconds)
///
/// Environment variable: `HTTP_TIMEOUT_SECS`
pub fn http_timeout() -> Duration {
    let secs = std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    Duration::from_secs(secs)
}

/// TCP connect timeout (default: 1500ms)
///
/// Environment variable: `HTTP_CONNECT_TIMEOUT_MS`
pub fn http_connect_timeout() -> Duration {
    let ms = std::env::var("HTTP_CONNECT_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1500);
    Duration::from_millis(ms)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print all configuration values (for startup logs)
pub fn log_configuration() {
    tracing::info!("=== Transport Configuration ===");
    tracing::info!("  - HTTP timeout: {:?}", http_timeout());
    tracing::info!("  - HTTP connect timeout: {:?}", http_connect_timeout());
    tracing::info!("===============================");
}
