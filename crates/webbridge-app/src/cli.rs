use std::path::PathBuf;

use clap::Parser;
use webbridge_config::BridgeConfig;

/// webbridge: a native window hosting a web page with a JS <-> Rust call bridge.
#[derive(Parser, Debug)]
#[command(name = "webbridge", version, about)]
pub struct Args {
    /// URL to open instead of the configured one.
    pub url: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Window title override.
    #[arg(long)]
    pub title: Option<String>,

    /// Start with the window hidden.
    #[arg(long)]
    pub hidden: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut BridgeConfig) {
        if let Some(url) = &self.url {
            config.window.url = url.clone();
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.hidden {
            config.window.hidden = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
