//! Configuration schema types for webbridge.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod logging;
mod window;

pub use bridge::*;
pub use logging::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    pub window: WindowConfig,
    pub bridge: BridgeSection,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.window.url, "about:blank");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.bridge.call_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.bridge.navigation_timeout(), None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
[window]
url = "https://example.com"
"#,
        )
        .unwrap();
        assert_eq!(config.window.url, "https://example.com");
        assert_eq!(config.window.title, "webbridge");
        assert_eq!(config.bridge, BridgeSection::default());
    }

    #[test]
    fn zero_timeout_disables() {
        let section = BridgeSection {
            call_timeout_ms: 0,
            navigation_timeout_ms: 1500,
        };
        assert_eq!(section.call_timeout(), None);
        assert_eq!(section.navigation_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn logging_directive_covers_workspace_crates() {
        let logging = LoggingConfig {
            level: "debug".into(),
        };
        assert_eq!(logging.directive(), "webbridge=debug,webbridge_core=debug,webbridge_config=debug");
    }
}
