//! Wire protocol between the page runtime and the host.
//!
//! Messages flow in both directions:
//! - **Page -> host**: the runtime posts `[type, data]` arrays. Type `0`
//!   invokes a host function, type `1` carries the result of a script the
//!   host submitted.
//! - **Host -> page**: the host submits scripts. Evaluations are wrapped in
//!   `webview._callJs(id, async () => { ... })`; replies to host function
//!   invocations call `webview._resultOk(id, json, isError)`.

use serde_json::Value;
use webbridge_common::{BridgeError, CallId, ProtocolError, ScriptError};

/// Discriminator for "invoke a host function".
pub const INVOKE: i64 = 0;
/// Discriminator for "result of a host-submitted script".
pub const CALL_RESULT: i64 = 1;

/// A message posted by the page runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Invoke {
        call_id: CallId,
        function: String,
        args: Vec<Value>,
    },
    CallResult {
        call_id: CallId,
        /// JSON text produced by `JSON.stringify`, or `None` for `undefined`.
        result: Option<Value>,
        is_exception: bool,
    },
}

impl InboundMessage {
    /// Classify `data` by its leading discriminator.
    pub fn parse(message_type: i64, data: Value) -> Result<Self, ProtocolError> {
        match message_type {
            INVOKE => {
                let (call_id, function, args): (CallId, String, Vec<Value>) =
                    serde_json::from_value(data)
                        .map_err(|e| ProtocolError::Malformed(format!("invoke: {e}")))?;
                Ok(Self::Invoke {
                    call_id,
                    function,
                    args,
                })
            }
            CALL_RESULT => {
                let (call_id, result, is_exception): (CallId, Value, bool) =
                    serde_json::from_value(data)
                        .map_err(|e| ProtocolError::Malformed(format!("call result: {e}")))?;
                Ok(Self::CallResult {
                    call_id,
                    result: (!result.is_null()).then_some(result),
                    is_exception,
                })
            }
            other => Err(ProtocolError::UnknownMessageType(other)),
        }
    }

    /// Parse a raw `[type, data]` JSON body as posted by the page.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let (message_type, data): (i64, Value) = serde_json::from_str(raw)
            .map_err(|e| ProtocolError::Malformed(format!("envelope: {e}")))?;
        Self::parse(message_type, data)
    }

    pub fn call_id(&self) -> &CallId {
        match self {
            Self::Invoke { call_id, .. } | Self::CallResult { call_id, .. } => call_id,
        }
    }
}

/// Turn a call-result payload into the caller's outcome.
///
/// String payloads are JSON text and are decoded; other values were posted
/// pre-decoded and pass through.
pub fn decode_result(result: Option<Value>, is_exception: bool) -> Result<Value, BridgeError> {
    let value = match result {
        None => Value::Null,
        Some(Value::String(text)) => serde_json::from_str(&text)
            .map_err(|e| ProtocolError::Malformed(format!("result is not JSON: {e}")))?,
        Some(other) => other,
    };

    if is_exception {
        Err(ScriptError::from_value(value).into())
    } else {
        Ok(value)
    }
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Wrap `script` so the page reports its completion under `call_id`.
pub fn wrap_evaluation(call_id: &CallId, script: &str) -> String {
    format!(
        "webview._callJs({}, async () => {{ {} }})",
        js_string(call_id.as_str()),
        script
    )
}

/// Script body that calls page function `function` with JSON-encoded `args`.
pub fn call_script(function: &str, args: &[Value]) -> String {
    let args_json = serde_json::to_string(args).unwrap_or_else(|_| "[]".to_string());
    format!("return {function}(...JSON.parse({}))", js_string(&args_json))
}

/// Script that settles the page-side promise for a host function call.
pub fn result_reply_script(call_id: &CallId, outcome: &Result<Value, ScriptError>) -> String {
    let (payload, is_exception) = match outcome {
        Ok(value) => (serde_json::to_string(value), false),
        Err(error) => (serde_json::to_string(error), true),
    };
    let payload = payload.unwrap_or_else(|_| "null".to_string());
    format!(
        "webview._resultOk({}, {}, {})",
        js_string(call_id.as_str()),
        js_string(&payload),
        is_exception
    )
}

/// Runtime installed into every page after navigation completes.
///
/// Defines `window.webview`:
/// - `api.<name>(...args)` calls host function `name` and returns a promise
/// - `_callJs` / `_resultOk` are the host's entry points
/// - `_fetchJs(url)` loads an external script
pub const PAGE_RUNTIME: &str = r#"
(function() {
    if (window.webview && window.webview.__bridge) {
        return;
    }

    function post(message) {
        if (window.chrome && window.chrome.webview) {
            window.chrome.webview.postMessage(message);
        } else if (window.ipc) {
            window.ipc.postMessage(JSON.stringify(message));
        }
    }

    function describeError(error) {
        if (error instanceof Error) {
            return { name: error.name, message: error.message, stack: error.stack || "" };
        }
        return { name: "Error", message: String(error), stack: "" };
    }

    var pending = {};
    var counter = 0;

    function nextId() {
        if (window.crypto && window.crypto.randomUUID) {
            return window.crypto.randomUUID().replace(/-/g, "");
        }
        counter += 1;
        return Date.now().toString(16) + counter.toString(16) + Math.random().toString(16).slice(2);
    }

    window.webview = {
        __bridge: true,

        api: new Proxy({}, {
            get: function(target, name) {
                // Keep `await webview.api` from treating the proxy as a thenable.
                if (name === "then") {
                    return undefined;
                }
                return function() {
                    var args = Array.prototype.slice.call(arguments);
                    return new Promise(function(resolve, reject) {
                        var callId = nextId();
                        pending[callId] = { resolve: resolve, reject: reject };
                        post([0, [callId, String(name), args]]);
                    });
                };
            }
        }),

        _callJs: function(callId, func) {
            Promise.resolve().then(func).then(
                function(result) {
                    var json = result === undefined ? null : JSON.stringify(result);
                    post([1, [callId, json === undefined ? null : json, false]]);
                },
                function(error) {
                    post([1, [callId, JSON.stringify(describeError(error)), true]]);
                }
            );
        },

        _resultOk: function(callId, result, isError) {
            var entry = pending[callId];
            if (!entry) {
                return;
            }
            delete pending[callId];
            var value = result === null || result === undefined ? null : JSON.parse(result);
            if (isError) {
                var error = new Error(value.message);
                error.name = value.name;
                error.stack = value.stack;
                entry.reject(error);
            } else {
                entry.resolve(value);
            }
        },

        _fetchJs: function(url) {
            return new Promise(function(resolve, reject) {
                var script = document.createElement("script");
                script.onload = function() { resolve(null); };
                script.onerror = function() { reject(new Error("failed to load " + url)); };
                script.src = url;
                document.body.appendChild(script);
            });
        }
    };

    window.dispatchEvent(new CustomEvent("webviewready"));
})();
"#;
