mod app_state;
mod browser;
mod cli;
mod functions;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use webbridge_config::{BridgeConfig, LoggingConfig};
use winit::event_loop::EventLoop;

use browser::UiCommand;

/// Load the config named on the command line, or the default one.
///
/// Logging is not up yet, so the failure is handed back for later.
fn load_config(args: &cli::Args) -> (BridgeConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => webbridge_config::load_config_from(path),
        None => webbridge_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (BridgeConfig::default(), Some(e.to_string())),
    }
}

/// Returns the directives that failed to parse.
fn init_logging(logging: &LoggingConfig) -> Vec<String> {
    let mut filter = EnvFilter::from_default_env();
    let mut rejected = Vec::new();
    for directive in logging.directive().split(',') {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(_) => rejected.push(directive.to_string()),
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    rejected
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config and apply overrides
    let (mut config, config_error) = load_config(&args);
    args.apply(&mut config);

    // Initialize logging
    let rejected = init_logging(&config.logging);

    tracing::info!("webbridge v{} starting...", env!("CARGO_PKG_VERSION"));
    if !rejected.is_empty() {
        tracing::warn!("Ignoring invalid log directives: {}", rejected.join(", "));
    }
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::info!("Opening {}", config.window.url);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("webbridge-worker")
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Create event loop and run
    let event_loop = match EventLoop::<UiCommand>::with_user_event().build() {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    let proxy = event_loop.create_proxy();
    let mut app = app_state::BridgeApp::new(config, functions::default_functions(), proxy, runtime);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
