//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the native window, the webview and the tokio runtime
//! the bridge runs on.

mod core;
mod event_handler;
mod init;
mod shutdown;
mod startup;

pub use core::BridgeApp;
