//! Window creation, webview setup and bridge registration.

use std::sync::Arc;

use tracing::{error, info};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as NativeWindow, WindowAttributes};
use wry::{PageLoadEvent, WebViewBuilder};

use webbridge_core::{Browser, LifecycleEvent, Window};

use super::core::BridgeApp;

impl BridgeApp {
    /// Create the native window, its bridge and the webview.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let window_config = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(window_config.title.clone())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
            .with_transparent(window_config.transparent)
            .with_visible(!window_config.hidden);

        let native = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {e}");
                return false;
            }
        };

        let Some(bridge) = self.open_bridge() else {
            error!("Async runtime is gone; cannot open bridge");
            return false;
        };

        let webview = match self.build_webview(&native, &bridge) {
            Ok(w) => w,
            Err(e) => {
                error!(window_id = %bridge.id(), "Failed to create webview: {e}");
                bridge.notify(LifecycleEvent::Closed);
                return false;
            }
        };
        info!(window_id = %bridge.id(), url = %self.config.window.url, "webview created");

        self.native = Some(native);
        self.webview = Some(webview);

        bridge.notify(LifecycleEvent::Ready);
        if !self.config.window.hidden {
            bridge.notify(LifecycleEvent::Shown);
        }
        self.spawn_startup_check(&bridge);
        self.bridge = Some(bridge);
        true
    }

    /// Register a bridge window. Its router task runs on our runtime.
    fn open_bridge(&mut self) -> Option<Window> {
        let options = self.window_options();
        let functions = self.functions.clone();
        let browser: Arc<dyn Browser> = self.browser.clone();

        let runtime = self.runtime.as_ref()?;
        let _guard = runtime.enter();
        Some(self.manager.open(options, functions, browser))
    }

    fn build_webview(
        &self,
        native: &NativeWindow,
        bridge: &Window,
    ) -> Result<wry::WebView, wry::Error> {
        let window_config = &self.config.window;
        let ipc = bridge.clone();
        let loads = bridge.clone();
        let popups = bridge.clone();

        WebViewBuilder::new()
            .with_url(window_config.url.as_str())
            .with_devtools(window_config.devtools)
            .with_transparent(window_config.transparent)
            .with_ipc_handler(move |request| ipc.handle_raw_message(request.body()))
            .with_on_page_load_handler(move |event, url| {
                if let PageLoadEvent::Finished = event {
                    loads.on_navigation_completed(url);
                }
            })
            // Popups are never opened; the page's request is reported instead.
            .with_new_window_req_handler(move |url| {
                popups.notify(LifecycleEvent::NewWindow {
                    name: String::new(),
                    url,
                });
                false
            })
            .build(native)
    }
}
