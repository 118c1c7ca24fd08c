//! `Browser` implementation that forwards work to the GUI thread.
//!
//! wry's `WebView` is not `Send`, so the bridge never touches it directly.
//! Each request becomes a [`UiCommand`] posted through the winit event
//! loop proxy and executed in `ApplicationHandler::user_event`.

use std::sync::Mutex;

use webbridge_common::BrowserError;
use webbridge_core::{Browser, ScriptCompletion};
use winit::event_loop::{EventLoopClosed, EventLoopProxy};

/// Work for the GUI thread.
pub enum UiCommand {
    LoadUrl(String),
    Evaluate {
        script: String,
        completion: ScriptCompletion,
    },
}

impl std::fmt::Debug for UiCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadUrl(url) => f.debug_tuple("LoadUrl").field(url).finish(),
            Self::Evaluate { script, .. } => f
                .debug_struct("Evaluate")
                .field("script_len", &script.len())
                .finish(),
        }
    }
}

pub struct WryBrowser {
    proxy: Mutex<EventLoopProxy<UiCommand>>,
}

impl WryBrowser {
    pub fn new(proxy: EventLoopProxy<UiCommand>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }

    fn post(&self, command: UiCommand) -> Result<(), EventLoopClosed<UiCommand>> {
        match self.proxy.lock() {
            Ok(proxy) => proxy.send_event(command),
            Err(poisoned) => poisoned.into_inner().send_event(command),
        }
    }
}

impl Browser for WryBrowser {
    fn load_url(&self, url: &str) -> Result<(), BrowserError> {
        self.post(UiCommand::LoadUrl(url.to_string()))
            .map_err(|_| BrowserError::Dispatch("event loop closed".into()))
    }

    fn execute_script(&self, script: &str, on_complete: ScriptCompletion) {
        let command = UiCommand::Evaluate {
            script: script.to_string(),
            completion: on_complete,
        };
        if let Err(EventLoopClosed(UiCommand::Evaluate { completion, .. })) = self.post(command) {
            completion(Err(BrowserError::Dispatch("event loop closed".into())));
        }
    }
}
