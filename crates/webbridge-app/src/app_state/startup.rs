//! Background tasks started once the bridge is up.

use tracing::{info, warn};
use webbridge_core::Window;

use super::core::BridgeApp;

impl BridgeApp {
    /// Once the first page has loaded, read its title over the bridge.
    pub(super) fn spawn_startup_check(&self, bridge: &Window) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let bridge = bridge.clone();
        runtime.spawn(async move {
            bridge.ready().wait().await;
            bridge.navigated().wait().await;

            match bridge.evaluate("return document.title").await {
                Ok(title) => info!(
                    window_id = %bridge.id(),
                    url = ?bridge.url(),
                    %title,
                    host_functions = ?bridge.host_functions(),
                    "page ready"
                ),
                Err(e) => warn!(window_id = %bridge.id(), error = %e, "startup check failed"),
            }
        });
    }
}
