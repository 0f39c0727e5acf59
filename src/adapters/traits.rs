//! Exchange agent and transport trait definitions
//!
//! `ExchangeAgent` is the uniform interface the trading framework talks to.
//! `Transport` is the seam below it: an authenticated REST client that
//! returns parsed response bodies.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::types::{
    Account, Offer, Offers, Order, OrderRef, OrderRequest, OrderSpec, SessionId, Ticker,
};

/// Ordered request parameters; repeated keys are allowed
pub type Params = Vec<(String, String)>;

/// Authenticated REST transport
///
/// Implementations sign requests, send them and parse the body as JSON.
/// They must hand back exchange error bodies as ordinary values so the
/// agent can classify them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a signed GET request
    async fn get(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value>;

    /// Perform a signed POST request
    async fn post(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value>;
}

/// Common trait for all exchange agents
///
/// Market data methods may run concurrently with anything. Order and
/// account methods are serialized per session by the implementation.
#[async_trait]
pub trait ExchangeAgent: Send + Sync {
    /// Best bid/ask snapshot for the session's market
    async fn ticker(&self) -> ExchangeResult<Ticker>;

    /// Order book, asks ascending and bids descending
    async fn offers(&self) -> ExchangeResult<Offers>;

    /// Ask side of `offers()`
    async fn asks(&self) -> ExchangeResult<Vec<Offer>> {
        Ok(self.offers().await?.asks)
    }

    /// Bid side of `offers()`
    async fn bids(&self) -> ExchangeResult<Vec<Offer>> {
        Ok(self.offers().await?.bids)
    }

    /// Place a buy order
    async fn buy(&self, spec: OrderSpec) -> ExchangeResult<Order>;

    /// Place a sell order
    async fn sell(&self, spec: OrderSpec) -> ExchangeResult<Order>;

    /// Cancel an order
    ///
    /// # Returns
    /// The order as reported after cancellation; check `status` to confirm.
    async fn cancel(&self, order_id: u64) -> ExchangeResult<Order>;

    /// Cancel every open order in the session's market
    async fn cancel_all(&self) -> ExchangeResult<Vec<Order>>;

    /// Place several orders in one request
    ///
    /// # Returns
    /// One order per request, in submission order
    async fn batch_place(&self, requests: Vec<OrderRequest>) -> ExchangeResult<Vec<Order>>;

    /// Fetch a fresh snapshot of an order
    async fn sync(&self, order: OrderRef) -> ExchangeResult<Order>;

    /// List orders in the session's market
    async fn orders(&self) -> ExchangeResult<Vec<Order>>;

    /// Fetch all balances of the authenticated member
    async fn account(&self) -> ExchangeResult<Account>;

    /// Quote currency code of the session's market
    fn currency(&self) -> String;

    /// Conversion rate applied to quote-currency prices
    fn rate(&self) -> Decimal;

    /// Id stamped on every record this agent builds
    fn session_id(&self) -> SessionId;

    /// Market identifier this agent is bound to
    fn market(&self) -> &str;

    /// Get the exchange name identifier
    fn exchange_name(&self) -> &'static str;
}
