//! Logging configuration types.

use serde::{Deserialize, Serialize};

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Env-filter directive scoped to this workspace's crates.
    pub fn directive(&self) -> String {
        format!(
            "webbridge={0},webbridge_core={0},webbridge_config={0}",
            self.level
        )
    }
}
