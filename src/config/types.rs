//! Configuration types for the agent
//!
//! The YAML file has one `peatio` section; missing fields fall back to
//! `PeatioConfig::default()`.

use serde::{Deserialize, Serialize};

use crate::adapters::peatio::PeatioConfig;
use crate::error::AppError;

/// Root configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub peatio: PeatioConfig,
}

impl AppConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), AppError> {
        self.peatio
            .validate()
            .map_err(|e| match e {
                AppError::Config(msg) => AppError::Config(format!("peatio: {}", msg)),
                other => other,
            })
    }
}
