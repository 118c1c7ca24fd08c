//! BridgeApp struct definition and constructor.

use std::sync::Arc;

use tokio::runtime::Runtime;
use winit::event_loop::EventLoopProxy;
use winit::window::Window as NativeWindow;

use webbridge_config::BridgeConfig;
use webbridge_core::{FunctionRegistry, Window, WindowManager, WindowOptions};

use crate::browser::{UiCommand, WryBrowser};

/// Top-level application state.
pub struct BridgeApp {
    pub(super) config: BridgeConfig,
    pub(super) functions: FunctionRegistry,
    pub(super) browser: Arc<WryBrowser>,

    // Windowing
    pub(super) native: Option<Arc<NativeWindow>>,
    pub(super) webview: Option<wry::WebView>,

    // Bridge
    pub(super) manager: WindowManager,
    pub(super) bridge: Option<Window>,
    pub(super) runtime: Option<Runtime>,
}

impl BridgeApp {
    pub fn new(
        config: BridgeConfig,
        functions: FunctionRegistry,
        proxy: EventLoopProxy<UiCommand>,
        runtime: Runtime,
    ) -> Self {
        Self {
            config,
            functions,
            browser: Arc::new(WryBrowser::new(proxy)),
            native: None,
            webview: None,
            manager: WindowManager::new(),
            bridge: None,
            runtime: Some(runtime),
        }
    }

    /// Bridge options derived from the loaded config.
    pub(super) fn window_options(&self) -> WindowOptions {
        WindowOptions {
            url: self.config.window.url.clone(),
            call_timeout: self.config.bridge.call_timeout(),
            navigation_timeout: self.config.bridge.navigation_timeout(),
            ..Default::default()
        }
    }
}
