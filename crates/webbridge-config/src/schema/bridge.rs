//! Call bridge configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeouts applied to host-initiated operations. Zero disables a timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeSection {
    pub call_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            call_timeout_ms: 30_000,
            navigation_timeout_ms: 0,
        }
    }
}

impl BridgeSection {
    pub fn call_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.call_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.navigation_timeout_ms)
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
