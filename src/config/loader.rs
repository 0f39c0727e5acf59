//! Configuration loader for YAML files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AppError;

use super::types::AppConfig;

/// Load and validate configuration from a YAML file
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use peatio_agent::config::load_config;
///
/// let config = load_config(Path::new("config/peatio.yaml"))?;
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let config: AppConfig = serde_yaml::from_reader(reader).map_err(|e| {
        AppError::Config(format!("YAML parse error in '{}': {}", path.display(), e))
    })?;

    config.validate()?;

    tracing::info!(
        phase = "init",
        path = %path.display(),
        market = %config.peatio.market,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a YAML string (useful for testing)
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(yaml_content)
        .map_err(|e| AppError::Config(format!("YAML parse error: {}", e)))?;

    config.validate()?;

    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
