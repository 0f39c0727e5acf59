//! Exchange adapter error types
//!
//! Exchange-reported failures and transport failures are both wrapped in
//! `ExchangeError`. The first three variants are the classified taxonomy
//! produced from an `error` object embedded in a response body.

use thiserror::Error;

/// Exchange-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Bad or missing credentials, or insufficient permission
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Operation targets an order that is already cancelled
    #[error("Order already canceled: {0}")]
    Canceled(String),

    /// Any other exchange-reported error
    #[error("Exchange error {}: {message}", code.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()))]
    Api { code: Option<i64>, message: String },

    /// Order parameters rejected before sending
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Request never produced a response (DNS, TLS, timeout, reset)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status with a body that is not an exchange error object
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ExchangeError {
    /// True for the three variants produced by response classification
    pub fn is_exchange_reported(&self) -> bool {
        matches!(
            self,
            ExchangeError::Unauthorized(_) | ExchangeError::Canceled(_) | ExchangeError::Api { .. }
        )
    }
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
