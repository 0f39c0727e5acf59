//! Shared test utilities for agent testing
//!
//! Provides a scripted `MockTransport` that records every call and detects
//! overlapping in-flight requests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::Transport;

/// One request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub verb: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    /// First value for a parameter key
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for a (possibly repeated) parameter key
    pub fn params_named(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

type Scripted = Result<Value, String>;

/// Scripted transport for unit tests
///
/// Responses are queued per `"VERB path"`. The last queued response for a
/// route is reused once the queue is down to one entry.
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    overlap: AtomicBool,
    latency: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            overlap: AtomicBool::new(false),
            latency: Duration::ZERO,
        }
    }

    /// Simulated latency per call, so concurrent tests can observe overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a response body for a route
    pub fn respond(&self, verb: &str, path: &str, body: Value) {
        self.push(verb, path, Ok(body));
    }

    /// Queue a transport failure for a route
    pub fn fail(&self, verb: &str, path: &str, reason: &str) {
        self.push(verb, path, Err(reason.to_string()));
    }

    fn push(&self, verb: &str, path: &str, scripted: Scripted) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(format!("{} {}", verb, path))
            .or_default()
            .push_back(scripted);
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made to one route
    pub fn calls_to(&self, verb: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.verb == verb && c.path == path)
            .collect()
    }

    /// True if two calls were ever in flight at the same time
    pub fn overlap_detected(&self) -> bool {
        self.overlap.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous in-flight calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn dispatch(
        &self,
        verb: &'static str,
        path: &str,
        params: &[(String, String)],
    ) -> ExchangeResult<Value> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        if now > 1 {
            self.overlap.store(true, Ordering::SeqCst);
        }
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.calls.lock().unwrap().push(RecordedCall {
            verb,
            path: path.to_string(),
            params: params.to_vec(),
        });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = {
            let mut responses = self.responses.lock().unwrap();
            responses
                .get_mut(&format!("{} {}", verb, path))
                .and_then(|queue| {
                    if queue.len() > 1 {
                        queue.pop_front()
                    } else {
                        queue.front().cloned()
                    }
                })
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match scripted {
            Some(Ok(body)) => Ok(body),
            Some(Err(reason)) => Err(ExchangeError::ConnectionFailed(reason)),
            None => Err(ExchangeError::ConnectionFailed(format!(
                "no scripted response for {} {}",
                verb, path
            ))),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value> {
        self.dispatch("GET", path, params).await
    }

    async fn post(&self, path: &str, params: &[(String, String)]) -> ExchangeResult<Value> {
        self.dispatch("POST", path, params).await
    }
}
