//! `ApplicationHandler` implementation for the winit event loop.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use webbridge_common::BrowserError;
use webbridge_core::{LifecycleEvent, ScriptCompletion};

use crate::browser::UiCommand;

use super::core::BridgeApp;

impl ApplicationHandler<UiCommand> for BridgeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.native.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            self.shutdown();
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, command: UiCommand) {
        self.run_command(command);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Occluded(occluded) => {
                if let Some(bridge) = &self.bridge {
                    bridge.notify(if occluded {
                        LifecycleEvent::Hidden
                    } else {
                        LifecycleEvent::Shown
                    });
                }
            }

            _ => {}
        }
    }
}

impl BridgeApp {
    /// Execute work posted by the bridge. Runs on the GUI thread.
    fn run_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::LoadUrl(url) => match &self.webview {
                Some(webview) => {
                    debug!(url = %url, "loading url");
                    if let Err(e) = webview.load_url(&url) {
                        warn!(url = %url, error = %e, "load_url failed");
                    }
                }
                None => warn!(url = %url, "load ignored: webview closed"),
            },

            UiCommand::Evaluate { script, completion } => {
                let Some(webview) = &self.webview else {
                    completion(Err(BrowserError::Unavailable("webview closed".into())));
                    return;
                };

                // wry wants an `Fn` callback; the completion runs at most once.
                let slot = Arc::new(Mutex::new(Some(completion)));
                let done = Arc::clone(&slot);
                let submitted = webview.evaluate_script_with_callback(&script, move |result| {
                    if let Some(completion) = take(&done) {
                        completion(Ok(result));
                    }
                });
                if let Err(e) = submitted {
                    if let Some(completion) = take(&slot) {
                        completion(Err(BrowserError::Script(e.to_string())));
                    }
                }
            }
        }
    }
}

fn take(slot: &Mutex<Option<ScriptCompletion>>) -> Option<ScriptCompletion> {
    slot.lock().ok()?.take()
}
