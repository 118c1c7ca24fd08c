//! Full configuration validation.
//!
//! Collects every problem into a single `ConfigError` so a user sees all
//! of them at once.

mod helpers;


use crate::schema::{BridgeConfig, LOG_LEVELS};
use helpers::validate_range;
use webbridge_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BridgeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "window.width", config.window.width, 100, 10_000);
    validate_range(&mut errors, "window.height", config.window.height, 100, 10_000);

    if config.window.url.trim().is_empty() {
        errors.push("window.url must not be empty".into());
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
