pub mod errors;
pub mod id;

pub use errors::{BridgeError, BrowserError, ConfigError, ProtocolError, ScriptError};
pub use id::{new_call_id, CallId, WindowId};

pub type Result<T> = std::result::Result<T, BridgeError>;
