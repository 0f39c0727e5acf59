//! Peatio exchange agent
//!
//! - Exchange agent trait and normalized market/order types
//! - Peatio v2 REST session with request signing
//! - YAML / environment configuration and logging setup

pub mod adapters;
pub mod config;
pub mod error;

pub use error::AppError;
