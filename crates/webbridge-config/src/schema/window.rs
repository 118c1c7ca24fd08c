//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Initial window and webview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// URL loaded when the webview is created.
    pub url: String,
    /// Inner width in logical pixels (valid range: 100-10000).
    pub width: u32,
    /// Inner height in logical pixels (valid range: 100-10000).
    pub height: u32,
    pub transparent: bool,
    /// Enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Start hidden; `shown` is not signalled until the window becomes visible.
    pub hidden: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "webbridge".to_string(),
            url: "about:blank".to_string(),
            width: 1024,
            height: 768,
            transparent: false,
            devtools: cfg!(debug_assertions),
            hidden: false,
        }
    }
}
