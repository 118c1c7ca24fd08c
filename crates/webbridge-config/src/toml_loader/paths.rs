//! Where the config file lives, and seeding it with the template.

use std::path::{Path, PathBuf};

use tracing::info;
use webbridge_common::ConfigError;

use super::template::default_config_toml;

const APP_DIR: &str = "webbridge";
const FILE_NAME: &str = "config.toml";

/// `config.toml` under the `webbridge` folder of the platform config dir.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`, creating parent folders.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create", parent, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("write", path, e))?;

    info!(path = %path.display(), "wrote default config");
    Ok(())
}

fn io_error(what: &str, target: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {what} {}: {e}", target.display()))
}
