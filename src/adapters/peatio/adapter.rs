//! Peatio Session Implementation
//!
//! `PeatioSession` implements `ExchangeAgent` for one market on one Peatio
//! deployment. Order and account calls go through a per-session mutex so
//! placement and cancellation never interleave on the same credentials.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::{ExchangeAgent, Params, Transport};
use crate::adapters::types::{
    Account, Offers, Order, OrderRef, OrderRequest, OrderSpec, SessionId, Side, Ticker,
};
use crate::error::AppError;

use super::classify::check_response;
use super::client::PeatioClient;
use super::config::PeatioConfig;
use super::normalize::{build_account, build_offers, build_order, build_orders, build_ticker};

const TICKERS_PATH: &str = "/api/v2/tickers";
const DEPTH_PATH: &str = "/api/v2/depth";
const ORDERS_PATH: &str = "/api/v2/orders";
const ORDERS_MULTI_PATH: &str = "/api/v2/orders/multi";
const ORDERS_CLEAR_PATH: &str = "/api/v2/orders/clear";
const ORDER_PATH: &str = "/api/v2/order";
const ORDER_DELETE_PATH: &str = "/api/v2/order/delete";
const MEMBER_PATH: &str = "/api/v2/members/me";

/// Quote currencies recognised at the end of a market id, longest first
const KNOWN_QUOTES: [&str; 5] = ["usdt", "usd", "cny", "btc", "eth"];

/// Upper-cased quote currency of a market id (`btccny` → `CNY`)
pub fn quote_currency(market: &str) -> String {
    let market = market.to_ascii_lowercase();
    let quote = KNOWN_QUOTES
        .iter()
        .find(|q| market.len() > q.len() && market.ends_with(*q))
        .map(|q| q.to_string())
        .unwrap_or_else(|| {
            let skip = market.chars().count().saturating_sub(3);
            market.chars().skip(skip).collect()
        });
    quote.to_uppercase()
}

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn ord_type(spec: &OrderSpec) -> &'static str {
    match spec {
        OrderSpec::Limit { .. } => "limit",
        OrderSpec::Market { .. } => "market",
    }
}

fn validate_spec(spec: &OrderSpec) -> ExchangeResult<()> {
    match spec.validate() {
        Some(reason) => Err(ExchangeError::InvalidOrder(reason.to_string())),
        None => Ok(()),
    }
}

/// One authenticated connection to one Peatio market
pub struct PeatioSession<T: Transport = PeatioClient> {
    id: SessionId,
    config: PeatioConfig,
    client: T,
    /// Held across every order/account request
    lock: Mutex<()>,
}

impl PeatioSession<PeatioClient> {
    /// Create a session with the HTTP transport
    pub fn new(config: PeatioConfig) -> Result<Self, AppError> {
        config.validate()?;
        let client = PeatioClient::new(&config);
        Ok(Self::with_transport(config, client))
    }
}

impl<T: Transport> PeatioSession<T> {
    /// Create a session over any transport
    pub fn with_transport(config: PeatioConfig, client: T) -> Self {
        let id = SessionId::next();
        tracing::info!(
            phase = "init",
            exchange = "peatio",
            session = %id,
            market = %config.market,
            endpoint = %config.endpoint,
            "Session created"
        );
        Self {
            id,
            config,
            client,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &PeatioConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.client
    }

    async fn get(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value> {
        let response = self.client.get(path, params).await?;
        check_response(&response)?;
        Ok(response)
    }

    async fn post(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value> {
        let response = self.client.post(path, params).await?;
        check_response(&response)?;
        Ok(response)
    }

    fn order_params(&self, side: Side, spec: &OrderSpec) -> Params {
        let mut params = vec![
            param("market", &self.config.market),
            param("side", side),
            param("volume", spec.amount()),
        ];
        if let Some(price) = spec.price() {
            params.push(param("price", price));
        }
        params.push(param("ord_type", ord_type(spec)));
        params
    }

    async fn place(&self, side: Side, spec: OrderSpec) -> ExchangeResult<Order> {
        validate_spec(&spec)?;
        let params = self.order_params(side, &spec);

        let _guard = self.lock.lock().await;
        let response = self.post(ORDERS_PATH, &params).await?;
        let order = build_order(&response, self.id)?;

        tracing::info!(
            exchange = "peatio",
            market = %self.config.market,
            side = %side,
            amount = %spec.amount(),
            price = ?spec.price(),
            order_id = order.order_id,
            status = %order.status,
            "Order placed"
        );
        Ok(order)
    }
}

#[async_trait]
impl<T: Transport> ExchangeAgent for PeatioSession<T> {
    async fn ticker(&self) -> ExchangeResult<Ticker> {
        let path = format!("{}/{}", TICKERS_PATH, self.config.market);
        let response = self.get(&path, &[]).await?;
        build_ticker(&response, self.id)
    }

    async fn offers(&self) -> ExchangeResult<Offers> {
        let params = vec![
            param("market", &self.config.market),
            param("limit", self.config.depth_limit),
        ];
        let response = self.get(DEPTH_PATH, &params).await?;
        build_offers(&response, self.id)
    }

    async fn buy(&self, spec: OrderSpec) -> ExchangeResult<Order> {
        self.place(Side::Buy, spec).await
    }

    async fn sell(&self, spec: OrderSpec) -> ExchangeResult<Order> {
        self.place(Side::Sell, spec).await
    }

    async fn cancel(&self, order_id: u64) -> ExchangeResult<Order> {
        let params = vec![param("id", order_id)];

        let _guard = self.lock.lock().await;
        let response = self.post(ORDER_DELETE_PATH, &params).await?;
        let order = build_order(&response, self.id)?;

        tracing::info!(
            exchange = "peatio",
            order_id = order_id,
            status = %order.status,
            "Order cancel requested"
        );
        Ok(order)
    }

    async fn cancel_all(&self) -> ExchangeResult<Vec<Order>> {
        let params = vec![param("market", &self.config.market)];

        let _guard = self.lock.lock().await;
        let response = self.post(ORDERS_CLEAR_PATH, &params).await?;
        let orders = build_orders(&response, self.id)?;

        tracing::info!(
            exchange = "peatio",
            market = %self.config.market,
            count = orders.len(),
            "All orders cancel requested"
        );
        Ok(orders)
    }

    async fn batch_place(&self, requests: Vec<OrderRequest>) -> ExchangeResult<Vec<Order>> {
        if requests.is_empty() {
            return Err(ExchangeError::InvalidOrder("Batch contains no orders".to_string()));
        }

        let mut params = vec![param("market", &self.config.market)];
        for request in &requests {
            validate_spec(&request.spec)?;
            params.push(param("orders[][side]", request.side));
            params.push(param("orders[][volume]", request.spec.amount()));
            if let Some(price) = request.spec.price() {
                params.push(param("orders[][price]", price));
            }
            params.push(param("orders[][ord_type]", ord_type(&request.spec)));
        }

        let _guard = self.lock.lock().await;
        let response = self.post(ORDERS_MULTI_PATH, &params).await?;
        let orders = build_orders(&response, self.id)?;

        if orders.len() != requests.len() {
            return Err(ExchangeError::InvalidResponse(format!(
                "Submitted {} orders, exchange returned {}",
                requests.len(),
                orders.len()
            )));
        }

        tracing::info!(
            exchange = "peatio",
            market = %self.config.market,
            count = orders.len(),
            "Batch placed"
        );
        Ok(orders)
    }

    async fn sync(&self, order: OrderRef) -> ExchangeResult<Order> {
        let params = vec![param("id", order.id())];

        let _guard = self.lock.lock().await;
        let response = self.get(ORDER_PATH, &params).await?;
        build_order(&response, self.id)
    }

    async fn orders(&self) -> ExchangeResult<Vec<Order>> {
        let params = vec![param("market", &self.config.market)];

        let _guard = self.lock.lock().await;
        let response = self.get(ORDERS_PATH, &params).await?;
        build_orders(&response, self.id)
    }

    async fn account(&self) -> ExchangeResult<Account> {
        let _guard = self.lock.lock().await;
        let response = self.get(MEMBER_PATH, &[]).await?;
        build_account(&response, self.id)
    }

    fn currency(&self) -> String {
        quote_currency(&self.config.market)
    }

    fn rate(&self) -> Decimal {
        self.config.rate.unwrap_or(Decimal::ONE)
    }

    fn session_id(&self) -> SessionId {
        self.id
    }

    fn market(&self) -> &str {
        &self.config.market
    }

    fn exchange_name(&self) -> &'static str {
        "peatio"
    }
}
