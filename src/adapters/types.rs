//! Canonical data types for exchange agents
//!
//! These are the framework-facing records every agent produces. Each record
//! carries the untouched exchange payload in `original` and the id of the
//! session that built it in `agent`.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Session Identity
// =============================================================================

/// Global atomic counter for session ids
static GLOBAL_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Non-owning back-reference from a record to the session that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate the next process-unique session id
    pub fn next() -> Self {
        SessionId(GLOBAL_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

// =============================================================================
// Market Data
// =============================================================================

/// Best bid/ask snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Lowest ask price
    pub ask: Decimal,
    /// Highest bid price
    pub bid: Decimal,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub last: Option<Decimal>,
    /// 24h traded volume
    #[serde(default)]
    pub volume: Option<Decimal>,
    pub original: Value,
    pub agent: SessionId,
}

impl Ticker {
    /// Ask minus bid
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

/// A single order book level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: Decimal,
    pub amount: Decimal,
    /// Raw `[price, amount]` level
    pub original: Value,
    pub agent: SessionId,
}

/// Order book snapshot ordered by distance from the touch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offers {
    /// Ask levels sorted ascending by price (best ask first)
    pub asks: Vec<Offer>,
    /// Bid levels sorted descending by price (best bid first)
    pub bids: Vec<Offer>,
}

impl Offers {
    /// Get the best ask price (lowest ask)
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|o| o.price)
    }

    /// Get the best bid price (highest bid)
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|o| o.price)
    }

    /// Calculate mid price
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical order state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting on the book
    Open,
    /// Cancelled before full execution
    Cancelled,
    /// Executed or otherwise finished
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an order as last reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    #[serde(default)]
    pub side: Option<Side>,
    /// Limit price, absent for market orders
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    /// Total requested amount
    pub amount: Decimal,
    /// Amount not yet executed
    pub remaining: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: OrderStatus,
    pub order_type: String,
    pub original: Value,
    pub agent: SessionId,
}

impl Order {
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Amount executed so far
    pub fn executed(&self) -> Decimal {
        self.amount - self.remaining
    }
}

/// What to place: a limit order at a price, or a market order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSpec {
    Limit { amount: Decimal, price: Decimal },
    Market { amount: Decimal },
}

impl OrderSpec {
    pub fn limit(amount: Decimal, price: Decimal) -> Self {
        OrderSpec::Limit { amount, price }
    }

    pub fn market(amount: Decimal) -> Self {
        OrderSpec::Market { amount }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            OrderSpec::Limit { amount, .. } | OrderSpec::Market { amount } => *amount,
        }
    }

    pub fn price(&self) -> Option<Decimal> {
        match self {
            OrderSpec::Limit { price, .. } => Some(*price),
            OrderSpec::Market { .. } => None,
        }
    }

    /// Validate order parameters
    ///
    /// Returns an error message if invalid, None if valid
    pub fn validate(&self) -> Option<&'static str> {
        if self.amount() <= Decimal::ZERO {
            return Some("Amount must be positive");
        }
        if let Some(price) = self.price() {
            if price <= Decimal::ZERO {
                return Some("Limit price must be positive");
            }
        }
        None
    }
}

/// A side plus what to place, as submitted in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    pub side: Side,
    pub spec: OrderSpec,
}

impl OrderRequest {
    pub fn buy(spec: OrderSpec) -> Self {
        Self { side: Side::Buy, spec }
    }

    pub fn sell(spec: OrderSpec) -> Self {
        Self { side: Side::Sell, spec }
    }
}

/// Either an order snapshot or a bare exchange order id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRef(u64);

impl OrderRef {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderRef {
    fn from(id: u64) -> Self {
        OrderRef(id)
    }
}

impl From<&Order> for OrderRef {
    fn from(order: &Order) -> Self {
        OrderRef(order.order_id)
    }
}

// =============================================================================
// Account
// =============================================================================

/// Funds held in one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Upper-case currency code
    pub currency: String,
    /// Available amount
    pub amount: Decimal,
    /// Amount locked in open orders
    pub locked: Decimal,
    pub original: Value,
    pub agent: SessionId,
}

impl Balance {
    pub fn total(&self) -> Decimal {
        self.amount + self.locked
    }
}

/// All balances of the authenticated member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub balances: Vec<Balance>,
    /// Raw payload without the extracted balance list
    pub original: Value,
    pub agent: SessionId,
}

impl Account {
    /// Find a balance by currency code (case-insensitive)
    pub fn balance(&self, currency: &str) -> Option<&Balance> {
        self.balances
            .iter()
            .find(|b| b.currency.eq_ignore_ascii_case(currency))
    }
}
