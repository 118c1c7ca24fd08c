//! webbridge configuration.
//!
//! TOML-based configuration for the window, the call bridge, and logging.
//! All sections use defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BridgeConfig, BridgeSection, LoggingConfig, WindowConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use webbridge_common::ConfigError;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path override.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    toml_loader::load_from_path(path)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &BridgeConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
