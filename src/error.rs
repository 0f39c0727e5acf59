//! Application-wide error types using thiserror
//!
//! Configuration and I/O failures live here; exchange failures are wrapped
//! from `ExchangeError` so callers can use one `?` chain.

use thiserror::Error;
use crate::adapters::errors::ExchangeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
