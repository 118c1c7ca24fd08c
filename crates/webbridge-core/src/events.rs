//! Window events.

use serde::{Deserialize, Serialize};
use webbridge_common::{ProtocolError, WindowId};

/// Lifecycle changes reported by the GUI/browser collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LifecycleEvent {
    /// The native window became visible.
    Shown,
    /// The native window was hidden.
    Hidden,
    /// The browser control finished initializing.
    Ready,
    /// A page load completed and the page runtime is installed. Carries the URL.
    Navigated(String),
    /// The page asked to open a new window; the request was suppressed.
    NewWindow { name: String, url: String },
    /// Close was requested.
    Closing,
    /// The native window is gone.
    Closed,
}

/// Events published on a window's event bus.
#[derive(Debug, Clone)]
pub enum WindowEvent {
    Lifecycle {
        window_id: WindowId,
        event: LifecycleEvent,
    },
    /// A message from the page broke the protocol. Logged, never fatal.
    ProtocolViolation {
        window_id: WindowId,
        error: ProtocolError,
    },
}

/// Snapshot of which lifecycle signals are currently set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowState {
    pub shown: bool,
    pub ready: bool,
    pub navigated: bool,
    pub closing: bool,
    pub closed: bool,
    /// Last known URL, readable before the first navigation completes.
    pub url: Option<String>,
}

impl WindowState {
    /// Open windows have not started closing.
    pub fn is_open(&self) -> bool {
        !self.closing && !self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_event_serializes_tagged() {
        let json = serde_json::to_value(LifecycleEvent::Navigated("https://a.example".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Navigated", "data": "https://a.example"}));

        let json = serde_json::to_value(LifecycleEvent::Closed).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Closed"}));
    }

    #[test]
    fn state_is_open_until_closing() {
        let mut state = WindowState::default();
        assert!(state.is_open());
        state.closing = true;
        assert!(!state.is_open());
    }
}
