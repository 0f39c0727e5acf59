//! Schema normalization for Peatio v2 responses
//!
//! Each endpoint has a field table listing the raw keys that take part in
//! the canonical record and what they are called there. Only listed keys
//! are carried over; the whole raw record is kept under `original` and the
//! producing session under `agent`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{Account, Balance, Offer, Offers, Order, SessionId, Ticker};

use super::status::derive_status;

/// Order type stamped on every order this connector builds
pub const EXCHANGE_LIMIT: &str = "exchange limit";

/// What happens to a listed raw key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Copy under the given canonical name
    Rename(&'static str),
    /// Exchange-only field, never copied
    Drop,
}

/// Ordered `(raw key, treatment)` table for one endpoint
pub type FieldMap = &'static [(&'static str, Field)];

/// `GET /api/v2/tickers/{market}` → `ticker` object
pub const TICKER_FIELDS: FieldMap = &[
    ("sell", Field::Rename("ask")),
    ("buy", Field::Rename("bid")),
    ("low", Field::Rename("low")),
    ("high", Field::Rename("high")),
    ("last", Field::Rename("last")),
    ("vol", Field::Rename("volume")),
];

/// Order objects from every order endpoint
pub const ORDER_FIELDS: FieldMap = &[
    ("id", Field::Rename("order_id")),
    ("side", Field::Rename("side")),
    ("price", Field::Rename("price")),
    ("avg_price", Field::Rename("avg_price")),
    ("volume", Field::Rename("amount")),
    ("remaining_volume", Field::Rename("remaining")),
    ("created_at", Field::Rename("timestamp")),
    ("executed_volume", Field::Drop),
    ("state", Field::Drop),
    ("market", Field::Drop),
    ("ord_type", Field::Drop),
    ("trades", Field::Drop),
    ("trades_count", Field::Drop),
];

/// Entries of `accounts` in `GET /api/v2/members/me`
pub const BALANCE_FIELDS: FieldMap = &[
    ("currency", Field::Rename("currency")),
    ("balance", Field::Rename("amount")),
    ("locked", Field::Rename("locked")),
];

/// Remap a raw record through a field table
///
/// The result holds the listed, present keys under their canonical names,
/// plus `original` and `agent`.
pub fn rekey(raw: &Map<String, Value>, fields: FieldMap, agent: SessionId) -> Map<String, Value> {
    let mut canonical = Map::with_capacity(fields.len() + 2);
    for (source, field) in fields {
        if let (Field::Rename(target), Some(value)) = (field, raw.get(*source)) {
            canonical.insert((*target).to_string(), value.clone());
        }
    }
    canonical.insert("original".to_string(), Value::Object(raw.clone()));
    canonical.insert("agent".to_string(), Value::from(agent.as_u64()));
    canonical
}

fn into_record<T: DeserializeOwned>(canonical: Map<String, Value>, what: &str) -> ExchangeResult<T> {
    serde_json::from_value(Value::Object(canonical))
        .map_err(|e| ExchangeError::InvalidResponse(format!("Malformed {}: {}", what, e)))
}

fn as_object<'a>(value: &'a Value, what: &str) -> ExchangeResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ExchangeError::InvalidResponse(format!("Expected {} object, got {}", what, value))
    })
}

fn as_array<'a>(value: &'a Value, what: &str) -> ExchangeResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        ExchangeError::InvalidResponse(format!("Expected {} array, got {}", what, value))
    })
}

/// Build a ticker from a full tickers response
pub fn build_ticker(response: &Value, agent: SessionId) -> ExchangeResult<Ticker> {
    let original = response
        .get("ticker")
        .ok_or_else(|| ExchangeError::InvalidResponse("Missing 'ticker' in response".into()))?;
    let raw = as_object(original, "ticker")?;
    into_record(rekey(raw, TICKER_FIELDS, agent), "ticker")
}

/// Parse a price or amount given as a JSON string or number
pub fn decimal_from(value: &Value) -> ExchangeResult<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(ExchangeError::InvalidResponse(format!(
                "Expected decimal, got {}",
                other
            )))
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| ExchangeError::InvalidResponse(format!("Invalid decimal '{}': {}", text, e)))
}

/// Build one offer from a positional `[price, amount]` level
fn build_offer(level: &Value, agent: SessionId) -> ExchangeResult<Offer> {
    let pair = as_array(level, "order book level")?;
    if pair.len() < 2 {
        return Err(ExchangeError::InvalidResponse(format!(
            "Order book level needs [price, amount], got {}",
            level
        )));
    }
    Ok(Offer {
        price: decimal_from(&pair[0])?,
        amount: decimal_from(&pair[1])?,
        original: level.clone(),
        agent,
    })
}

fn build_side(response: &Value, key: &str, agent: SessionId) -> ExchangeResult<Vec<Offer>> {
    let levels = response
        .get(key)
        .ok_or_else(|| ExchangeError::InvalidResponse(format!("Missing '{}' in depth", key)))?;
    as_array(levels, key)?
        .iter()
        .map(|level| build_offer(level, agent))
        .collect()
}

/// Build an order book from a depth response
///
/// Peatio sends both sides best-last for asks and best-first for bids.
/// Asks are reversed, then both sides are stable-sorted by distance from
/// the touch so the ordering holds whatever the raw convention.
pub fn build_offers(response: &Value, agent: SessionId) -> ExchangeResult<Offers> {
    let mut asks = build_side(response, "asks", agent)?;
    let mut bids = build_side(response, "bids", agent)?;

    asks.reverse();
    asks.sort_by(|a, b| a.price.cmp(&b.price));
    bids.sort_by(|a, b| b.price.cmp(&a.price));

    Ok(Offers { asks, bids })
}

/// Build an order from a raw order object
pub fn build_order(raw: &Value, agent: SessionId) -> ExchangeResult<Order> {
    let obj = as_object(raw, "order")?;
    let mut canonical = rekey(obj, ORDER_FIELDS, agent);
    let status = derive_status(obj.get("state").and_then(Value::as_str));
    canonical.insert("status".to_string(), Value::from(status.as_str()));
    canonical.insert("order_type".to_string(), Value::from(EXCHANGE_LIMIT));
    into_record(canonical, "order")
}

/// Build every order in an array response
pub fn build_orders(response: &Value, agent: SessionId) -> ExchangeResult<Vec<Order>> {
    as_array(response, "orders")?
        .iter()
        .map(|raw| build_order(raw, agent))
        .collect()
}

fn build_balance(raw: &Value, agent: SessionId) -> ExchangeResult<Balance> {
    let obj = as_object(raw, "balance")?;
    let mut canonical = rekey(obj, BALANCE_FIELDS, agent);
    if let Some(Value::String(code)) = canonical.get_mut("currency") {
        *code = code.to_uppercase();
    }
    into_record(canonical, "balance")
}

/// Build an account from a `members/me` response
///
/// One balance per `accounts` entry, in order; the rest of the payload
/// becomes the account's `original`.
pub fn build_account(response: &Value, agent: SessionId) -> ExchangeResult<Account> {
    let mut rest = as_object(response, "account")?.clone();
    let entries = rest
        .remove("accounts")
        .ok_or_else(|| ExchangeError::InvalidResponse("Missing 'accounts' in member".into()))?;

    let balances = as_array(&entries, "accounts")?
        .iter()
        .map(|raw| build_balance(raw, agent))
        .collect::<ExchangeResult<Vec<_>>>()?;

    Ok(Account {
        balances,
        original: Value::Object(rest),
        agent,
    })
}
