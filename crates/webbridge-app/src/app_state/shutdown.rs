//! Graceful shutdown: signal closing, tear down the webview, stop the runtime.

use std::time::Duration;

use tracing::info;
use webbridge_core::LifecycleEvent;

use super::core::BridgeApp;

/// How long in-flight tasks get to finish once the window is gone.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

impl BridgeApp {
    /// Safe to call more than once.
    pub(super) fn shutdown(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.notify(LifecycleEvent::Closing);
        }

        // The webview must go before the window that hosts it.
        self.webview = None;
        self.native = None;

        // Marks every remaining window closed.
        self.manager.destroy_all();

        if let Some(runtime) = self.runtime.take() {
            info!("Stopping async runtime");
            runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
        }
    }
}
