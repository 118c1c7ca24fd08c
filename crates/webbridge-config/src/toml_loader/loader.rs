//! Reading `BridgeConfig` from disk.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};
use webbridge_common::ConfigError;

use crate::schema::BridgeConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Read and parse the config at `path`.
///
/// A missing file is `FileNotFound` so callers can decide to create one.
/// A file that parses but fails validation is not fatal: the problems are
/// logged and the window opens with the built-in defaults instead.
pub fn load_from_path(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config = parse(&text, path)?;
    match validation::validate(&config) {
        Ok(()) => {
            info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config rejected, using defaults");
            Ok(BridgeConfig::default())
        }
    }
}

fn parse(text: &str, origin: &Path) -> Result<BridgeConfig, ConfigError> {
    toml::from_str(text).map_err(|e| {
        ConfigError::ParseError(format!("{} is not valid TOML: {e}", origin.display()))
    })
}

/// Load `<config dir>/webbridge/config.toml`, writing the commented
/// template there first if the file does not exist yet.
pub fn load_default() -> Result<BridgeConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(BridgeConfig::default())
        }
        other => other,
    }
}
