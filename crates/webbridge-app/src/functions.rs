//! Host functions exposed to every page as `webview.api.<name>(...)`.

use serde_json::{json, Value};
use tracing::info;
use webbridge_common::ScriptError;
use webbridge_core::{FunctionRegistry, HostFunction};

pub fn default_functions() -> FunctionRegistry {
    FunctionRegistry::new()
        .with(HostFunction::sync("ping", |_| Ok(json!("pong"))))
        .with(HostFunction::sync("add", add))
        .with(HostFunction::sync("echo", |args| Ok(Value::Array(args))))
        .with(HostFunction::sync("app_info", |_| {
            Ok(json!({
                "name": "webbridge",
                "version": env!("CARGO_PKG_VERSION"),
            }))
        }))
        .with(HostFunction::sync("log", log))
        .with(HostFunction::new("sleep", sleep))
}

fn add(args: Vec<Value>) -> Result<Value, ScriptError> {
    let mut sum = 0.0;
    for (i, arg) in args.iter().enumerate() {
        let n = arg.as_f64().ok_or_else(|| {
            ScriptError::new("TypeError", format!("argument {i} is not a number: {arg}"))
        })?;
        sum += n;
    }
    Ok(json!(sum))
}

fn log(args: Vec<Value>) -> Result<Value, ScriptError> {
    let message = args
        .iter()
        .map(|a| match a {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    info!(target: "webbridge::page", "{message}");
    Ok(Value::Null)
}

/// Resolve after `args[0]` milliseconds.
async fn sleep(args: Vec<Value>) -> Result<Value, ScriptError> {
    let ms = args
        .first()
        .and_then(Value::as_u64)
        .ok_or_else(|| ScriptError::new("TypeError", "sleep expects a duration in milliseconds"))?;
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    Ok(json!(ms))
}
