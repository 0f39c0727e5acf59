//! Exchange agents
//!
//! This module provides the agent abstraction the trading framework talks
//! to, the shared market and order types, and the Peatio implementation.

pub mod errors;
pub mod peatio;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use errors::{ExchangeError, ExchangeResult};
pub use traits::{ExchangeAgent, Transport};
pub use types::{
    Account, Balance, Offer, Offers, Order, OrderRef, OrderRequest, OrderSpec, OrderStatus,
    SessionId, Side, Ticker,
};
pub use peatio::{PeatioConfig, PeatioSession};
