//! Peatio exchange agent
//!
//! REST agent for the Peatio v2 API: signed requests, response
//! classification, and normalization into the shared agent types.

pub mod adapter;
pub mod classify;
pub mod client;
pub mod config;
pub mod normalize;
pub mod signing;
pub mod status;

pub use adapter::{quote_currency, PeatioSession};
pub use client::PeatioClient;
pub use config::PeatioConfig;
