//! Configuration module
//!
//! This module provides:
//! - Configuration types (`AppConfig`)
//! - YAML loading functionality (`load_config`)
//! - Transport constants with environment variable overrides
//! - Logging setup

pub mod constants;
pub mod logging;
mod loader;
mod types;

pub use types::AppConfig;

pub use loader::{load_config, load_config_from_str};
