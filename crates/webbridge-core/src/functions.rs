//! Host functions callable from the page as `webview.api.<name>(...)`.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use webbridge_common::ScriptError;

/// What a host function produces: a JSON value, or an error the page sees
/// as a rejected promise.
pub type HostResult = Result<Value, ScriptError>;

type Handler = dyn Fn(Vec<Value>) -> BoxFuture<'static, HostResult> + Send + Sync;

/// A named host-side callable with a JSON-in, JSON-out contract.
#[derive(Clone)]
pub struct HostFunction {
    name: String,
    handler: Arc<Handler>,
}

impl std::fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFunction").field("name", &self.name).finish()
    }
}

impl HostFunction {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HostResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(move |args| f(args).boxed()),
        }
    }

    /// Wrap a synchronous function. It runs on the router's runtime when invoked.
    pub fn sync<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> HostResult + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(name, move |args| {
            let f = Arc::clone(&f);
            async move { f(args) }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the function. A panic is reported as a `Panic` error instead of
    /// unwinding into the caller.
    pub async fn invoke(&self, args: Vec<Value>) -> HostResult {
        // The handler can panic while building its future, not only while polling it.
        let future = match std::panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(args))) {
            Ok(future) => future,
            Err(panic) => return Err(ScriptError::new("Panic", panic_message(panic.as_ref()))),
        };
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(ScriptError::new("Panic", panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "host function panicked".to_string()
    }
}

/// Host functions keyed by name. Registering a name twice keeps the last one.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, HostFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `function`, returning the one it replaced.
    pub fn register(&mut self, function: HostFunction) -> Option<HostFunction> {
        self.functions.insert(function.name.clone(), function)
    }

    /// Builder form of [`FunctionRegistry::register`].
    pub fn with(mut self, function: HostFunction) -> Self {
        self.register(function);
        self
    }

    pub fn get(&self, name: &str) -> Option<&HostFunction> {
        self.functions.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<HostFunction> for FunctionRegistry {
    fn from_iter<I: IntoIterator<Item = HostFunction>>(iter: I) -> Self {
        let mut registry = Self::new();
        for function in iter {
            registry.register(function);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add() -> HostFunction {
        HostFunction::sync("add", |args| {
            let sum: i64 = args.iter().filter_map(Value::as_i64).sum();
            Ok(json!(sum))
        })
    }

    #[tokio::test]
    async fn sync_function_runs() {
        assert_eq!(add().invoke(vec![json!(1), json!(2)]).await.unwrap(), json!(3));
    }

    #[tokio::test]
    async fn async_function_runs() {
        let f = HostFunction::new("later", |args: Vec<Value>| async move {
            tokio::task::yield_now().await;
            Ok(json!(args.len()))
        });
        assert_eq!(f.invoke(vec![json!(null), json!(null)]).await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn error_is_returned_unchanged() {
        let f = HostFunction::sync("fail", |_| {
            Err(ScriptError::new("ValueError", "nope").with_stack("fail()"))
        });
        let err = f.invoke(vec![]).await.unwrap_err();
        assert_eq!(err, ScriptError::new("ValueError", "nope").with_stack("fail()"));
    }

    #[tokio::test]
    async fn panic_becomes_script_error() {
        let f = HostFunction::sync("boom", |_| panic!("kaboom"));
        let err = f.invoke(vec![]).await.unwrap_err();
        assert_eq!(err.name, "Panic");
        assert_eq!(err.message, "kaboom");
    }

    #[tokio::test]
    async fn panic_before_future_is_built_becomes_script_error() {
        let f = HostFunction::new("first", |args: Vec<Value>| {
            let first = args[0].clone();
            async move { Ok(first) }
        });
        let err = f.invoke(vec![]).await.unwrap_err();
        assert_eq!(err.name, "Panic");
        assert!(err.message.contains("index out of bounds"));
    }

    #[test]
    fn registry_last_registration_wins() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.register(add()).is_none());
        let replaced = registry.register(HostFunction::sync("add", |_| Ok(json!(0))));
        assert_eq!(replaced.map(|f| f.name().to_string()), Some("add".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_names_sorted() {
        let registry: FunctionRegistry = vec![
            HostFunction::sync("zeta", |_| Ok(Value::Null)),
            add(),
            HostFunction::sync("mid", |_| Ok(Value::Null)),
        ]
        .into_iter()
        .collect();
        assert_eq!(registry.names(), vec!["add", "mid", "zeta"]);
        assert!(registry.get("mid").is_some());
        assert!(registry.get("missing").is_none());
    }
}
