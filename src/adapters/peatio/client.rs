//! Peatio REST transport
//!
//! Signs and sends requests with `reqwest`, and hands back the parsed body.
//! Error bodies are returned as values so the session can classify them.

use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::Transport;
use crate::config::constants::{http_connect_timeout, http_timeout};

use super::config::PeatioConfig;
use super::signing::{current_time_ms, signed_params};

/// Max idle connections per host in connection pool
const HTTP_POOL_MAX_IDLE: usize = 2;

/// Create the HTTP client shared by every request of one session
pub fn create_http_client(exchange_name: &str) -> reqwest::Client {
    let timeout = http_timeout();
    let connect_timeout = http_connect_timeout();
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    tracing::info!(
        phase = "init",
        exchange = %exchange_name,
        timeout_ms = timeout.as_millis() as u64,
        connect_timeout_ms = connect_timeout.as_millis() as u64,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

/// Signed REST client for one Peatio deployment
pub struct PeatioClient {
    http_client: reqwest::Client,
    base_url: String,
    access_key: String,
    secret_key: String,
}

impl PeatioClient {
    pub fn new(config: &PeatioConfig) -> Self {
        Self {
            http_client: create_http_client("peatio"),
            base_url: config.base_url().to_string(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        }
    }

    /// Sign params when credentials are configured; public calls go unsigned
    fn authenticate(
        &self,
        verb: &str,
        path: &str,
        params: &[(String, String)],
    ) -> ExchangeResult<Vec<(String, String)>> {
        if self.access_key.is_empty() {
            return Ok(params.to_vec());
        }
        signed_params(
            &self.access_key,
            &self.secret_key,
            verb,
            path,
            params,
            current_time_ms(),
        )
    }

    async fn read_body(path: &str, response: reqwest::Response) -> ExchangeResult<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        tracing::debug!(
            exchange = "peatio",
            path = %path,
            status = status.as_u16(),
            body = %text,
            "Response received"
        );

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ExchangeError::Http {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(ExchangeError::InvalidResponse(format!(
                "Invalid JSON from {}: {} - {}",
                path, e, text
            ))),
        }
    }
}

#[async_trait]
impl Transport for PeatioClient {
    async fn get(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value> {
        let signed = self.authenticate("GET", path, params)?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(exchange = "peatio", path = %path, "GET");

        let response = self
            .http_client
            .get(&url)
            .query(&signed)
            .send()
            .await
            .map_err(|e| ExchangeError::ConnectionFailed(format!("GET {} failed: {}", path, e)))?;

        Self::read_body(path, response).await
    }

    async fn post(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value> {
        let signed = self.authenticate("POST", path, params)?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(exchange = "peatio", path = %path, "POST");

        let response = self
            .http_client
            .post(&url)
            .form(&signed)
            .send()
            .await
            .map_err(|e| ExchangeError::ConnectionFailed(format!("POST {} failed: {}", path, e)))?;

        Self::read_body(path, response).await
    }
}
