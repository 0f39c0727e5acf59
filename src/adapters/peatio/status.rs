//! Order state derivation
//!
//! Peatio v2 reports order state as a string enum: `wait`, `cancel`, `done`.

use crate::adapters::types::OrderStatus;

/// Raw state of an order resting on the book
pub const STATE_WAIT: &str = "wait";

/// Raw state of a cancelled order
pub const STATE_CANCEL: &str = "cancel";

/// Map a raw Peatio order state onto the canonical vocabulary
///
/// Anything that is neither waiting nor cancelled counts as closed,
/// including a missing state.
pub fn derive_status(state: Option<&str>) -> OrderStatus {
    match state {
        Some(STATE_WAIT) => OrderStatus::Open,
        Some(STATE_CANCEL) => OrderStatus::Cancelled,
        _ => OrderStatus::Closed,
    }
}
