use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the native browser control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    #[error("browser unavailable: {0}")]
    Unavailable(String),

    #[error("dispatch to ui thread failed: {0}")]
    Dispatch(String),

    #[error("script submission failed: {0}")]
    Script(String),
}

/// Violations of the page <-> host message protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("no pending call with id {0}")]
    UnknownCall(String),

    #[error("no host function named '{0}'")]
    UnknownFunction(String),

    #[error("unknown message type {0}")]
    UnknownMessageType(i64),

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("call id {0} is already pending")]
    DuplicateCall(String),
}

/// An exception that crossed the JavaScript boundary, in either direction.
///
/// Serialized as `{"name": ..., "message": ..., "stack": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptError {
    #[serde(default = "default_error_name")]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stack: String,
}

fn default_error_name() -> String {
    "Error".to_string()
}

impl ScriptError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: String::new(),
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }

    /// Build from a Rust error, using its source chain as the stack.
    pub fn from_error(name: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut stack = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            name: name.into(),
            message: err.to_string(),
            stack,
        }
    }

    /// Interpret an arbitrary JSON value thrown by page code.
    ///
    /// Objects contribute their `name`/`message`/`stack` fields; anything
    /// else becomes the message of a plain `Error`.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => serde_json::from_value(value.clone())
                .unwrap_or_else(|_| Self::new("Error", value.to_string())),
            serde_json::Value::String(message) => Self::new("Error", message),
            serde_json::Value::Null => Self::new("Error", ""),
            other => Self::new("Error", other.to_string()),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl std::error::Error for ScriptError {}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("call cancelled")]
    Cancelled,

    #[error("window closed")]
    Closed,
}
