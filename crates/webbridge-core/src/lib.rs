//! Bridge between host code and the page running inside a browser control.
//!
//! Provides:
//! - Script evaluation with results delivered back over the page channel
//! - Host functions the page calls through `webview.api.<name>(...)`
//! - Lifecycle signals (shown, ready, navigated, closing, closed)
//! - A registry of open windows
//!
//! The browser control itself sits behind the [`Browser`] trait; the GUI
//! thread feeds page messages and load notifications into a [`Window`].

pub mod browser;
pub mod events;
pub mod functions;
pub mod ipc;
pub mod manager;
pub mod pending;
pub mod signal;
pub mod window;

#[cfg(test)]
mod testing;

pub use browser::{Browser, ScriptCompletion};
pub use events::{LifecycleEvent, WindowEvent, WindowState};
pub use functions::{FunctionRegistry, HostFunction, HostResult};
pub use ipc::{InboundMessage, PAGE_RUNTIME};
pub use manager::WindowManager;
pub use pending::PendingCalls;
pub use signal::Signal;
pub use window::{Signals, Window, WindowOptions};
