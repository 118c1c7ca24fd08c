//! The host-side face of one browser window.
//!
//! A [`Window`] is a cheap, cloneable handle. Async callers use it to
//! evaluate scripts, call page functions and navigate; the GUI thread uses
//! it to deliver page messages and lifecycle events. Pending calls and host
//! functions live in a router task that only this window's commands reach.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use webbridge_common::{new_call_id, BridgeError, CallId, Result, WindowId};

use crate::browser::Browser;
use crate::events::{LifecycleEvent, WindowEvent, WindowState};
use crate::functions::FunctionRegistry;
use crate::ipc::{self, InboundMessage, PAGE_RUNTIME};
use crate::signal::Signal;

mod router;

use router::{Command, Router};

/// Settings for a new window.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// URL the control starts on; readable through [`Window::url`] right away.
    pub url: String,
    /// Upper bound on a single evaluation. `None` waits forever.
    pub call_timeout: Option<Duration>,
    /// Upper bound on [`Window::fetch_url`]. `None` waits forever.
    pub navigation_timeout: Option<Duration>,
    /// Capacity of the window event bus.
    pub event_capacity: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            call_timeout: Some(Duration::from_secs(30)),
            navigation_timeout: None,
            event_capacity: 64,
        }
    }
}

impl WindowOptions {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Lifecycle signals of one window.
#[derive(Debug)]
pub struct Signals {
    pub shown: Signal,
    pub ready: Signal,
    /// Payload is the current URL.
    pub navigated: Signal,
    /// Payload is `{"name": ..., "url": ...}` of the last suppressed popup.
    pub new_window: Signal,
    pub closing: Signal,
    pub closed: Signal,
}

impl Signals {
    fn new(initial_url: &str) -> Self {
        Self {
            shown: Signal::new("shown"),
            ready: Signal::new("ready"),
            navigated: Signal::with_payload("navigated", Value::String(initial_url.to_string())),
            new_window: Signal::new("new_window"),
            closing: Signal::new("closing"),
            closed: Signal::new("closed"),
        }
    }
}

struct Inner {
    id: WindowId,
    options: WindowOptions,
    signals: Signals,
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<WindowEvent>,
    browser: Arc<dyn Browser>,
    host_functions: Vec<String>,
    /// Held for the whole of a `fetch_url` so navigations never interleave.
    navigation: Mutex<()>,
}

#[derive(Clone)]
pub struct Window {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.inner.id)
            .field("url", &self.url())
            .finish()
    }
}

impl Window {
    /// Create a window and start its router task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        id: WindowId,
        options: WindowOptions,
        functions: FunctionRegistry,
        browser: Arc<dyn Browser>,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let host_functions = functions.names();

        let router = Router::new(id, functions, Arc::clone(&browser), events.clone());
        tokio::spawn(router.run(command_rx));

        debug!(window_id = %id, url = %options.url, functions = ?host_functions, "window created");

        Self {
            inner: Arc::new(Inner {
                id,
                signals: Signals::new(&options.url),
                options,
                commands,
                events,
                browser,
                host_functions,
                navigation: Mutex::new(()),
            }),
        }
    }

    pub fn id(&self) -> WindowId {
        self.inner.id
    }

    /// The last navigated URL, or the initial URL before any load completes.
    pub fn url(&self) -> Option<String> {
        self.inner
            .signals
            .navigated
            .payload()
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn signals(&self) -> &Signals {
        &self.inner.signals
    }

    pub fn shown(&self) -> &Signal {
        &self.inner.signals.shown
    }

    pub fn ready(&self) -> &Signal {
        &self.inner.signals.ready
    }

    pub fn navigated(&self) -> &Signal {
        &self.inner.signals.navigated
    }

    pub fn new_window(&self) -> &Signal {
        &self.inner.signals.new_window
    }

    pub fn closing(&self) -> &Signal {
        &self.inner.signals.closing
    }

    pub fn closed(&self) -> &Signal {
        &self.inner.signals.closed
    }

    /// Names of the host functions the page can call.
    pub fn host_functions(&self) -> &[String] {
        &self.inner.host_functions
    }

    pub fn state(&self) -> WindowState {
        let signals = &self.inner.signals;
        WindowState {
            shown: signals.shown.is_set(),
            ready: signals.ready.is_set(),
            navigated: signals.navigated.is_set(),
            closing: signals.closing.is_set(),
            closed: signals.closed.is_set(),
            url: self.url(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WindowEvent> {
        self.inner.events.subscribe()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.inner
            .commands
            .send(command)
            .map_err(|_| BridgeError::Closed)
    }

    // -- host -> page --------------------------------------------------------

    /// Run `script` as the body of an async function in the page and return
    /// whatever it resolves to.
    pub async fn evaluate(&self, script: &str) -> Result<Value> {
        self.evaluate_inner(script, None).await
    }

    /// Like [`Window::evaluate`], but gives up with `Cancelled` once `cancel` fires.
    pub async fn evaluate_with_cancel(&self, script: &str, cancel: CancellationToken) -> Result<Value> {
        self.evaluate_inner(script, Some(cancel)).await
    }

    /// Call page function `function` with `args`.
    pub async fn call(&self, function: &str, args: Vec<Value>) -> Result<Value> {
        self.evaluate(&ipc::call_script(function, &args)).await
    }

    /// Load an external script into the page and wait for it to run.
    pub async fn fetch_js(&self, url: &str) -> Result<()> {
        self.call("webview._fetchJs", vec![json!(url)]).await?;
        Ok(())
    }

    async fn evaluate_inner(&self, script: &str, cancel: Option<CancellationToken>) -> Result<Value> {
        if self.inner.signals.closed.is_set() {
            return Err(BridgeError::Closed);
        }
        let call_id = new_call_id();
        let (completion, result) = oneshot::channel();
        self.send(Command::Register {
            call_id: call_id.clone(),
            completion,
        })?;
        let mut guard = PendingGuard {
            call_id: Some(call_id.clone()),
            commands: self.inner.commands.clone(),
        };

        debug!(window_id = %self.id(), call_id = %call_id, "evaluating script");
        let commands = self.inner.commands.clone();
        let failed = call_id.clone();
        self.inner.browser.execute_script(
            &ipc::wrap_evaluation(&call_id, script),
            Box::new(move |submitted| {
                if let Err(e) = submitted {
                    let _ = commands.send(Command::Fail {
                        call_id: failed,
                        error: e.into(),
                    });
                }
            }),
        );

        let settled = async {
            result.await.unwrap_or_else(|_| Err(BridgeError::Closed))
        };
        let bounded = async {
            match self.inner.options.call_timeout {
                Some(limit) => tokio::time::timeout(limit, settled)
                    .await
                    .unwrap_or_else(|_| Err(BridgeError::Timeout(limit))),
                None => settled.await,
            }
        };
        let outcome = match cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(BridgeError::Cancelled),
                outcome = bounded => outcome,
            },
            None => bounded.await,
        };

        if !matches!(outcome, Err(BridgeError::Timeout(_)) | Err(BridgeError::Cancelled)) {
            guard.disarm();
        }
        outcome
    }

    // -- navigation ----------------------------------------------------------

    /// Start loading `url` without waiting for it.
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.inner.browser.load_url(url)?;
        Ok(())
    }

    /// Load `url` and wait until the page has finished loading.
    ///
    /// Calls on the same window run one after another. Returns the URL the
    /// control reports, which may differ from `url` after redirects.
    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        let _navigation = self.inner.navigation.lock().await;
        let navigated = &self.inner.signals.navigated;

        let was_set = navigated.is_set();
        navigated.clear();
        if let Err(e) = self.inner.browser.load_url(url) {
            // The old page is still loaded.
            if was_set {
                navigated.set(navigated.payload());
            }
            return Err(e.into());
        }
        info!(window_id = %self.id(), url, "navigating");

        let payload = match self.inner.options.navigation_timeout {
            Some(limit) => tokio::time::timeout(limit, navigated.wait())
                .await
                .map_err(|_| BridgeError::Timeout(limit))?,
            None => navigated.wait().await,
        };
        Ok(payload
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| url.to_string()))
    }

    // -- page -> host (any thread) -------------------------------------------

    /// Entry point for a structured message posted by the page.
    ///
    /// Safe to call from the GUI thread; the work happens on the router task.
    pub fn handle_web_message(&self, message_type: i64, data: Value) {
        let command = match InboundMessage::parse(message_type, data) {
            Ok(message) => Self::route(message),
            Err(e) => Command::Violation(e),
        };
        self.post(command);
    }

    /// Same as [`Window::handle_web_message`] for a raw `[type, data]` JSON body.
    pub fn handle_raw_message(&self, raw: &str) {
        let command = match InboundMessage::from_json(raw) {
            Ok(message) => Self::route(message),
            Err(e) => Command::Violation(e),
        };
        self.post(command);
    }

    fn route(message: InboundMessage) -> Command {
        match message {
            InboundMessage::Invoke {
                call_id,
                function,
                args,
            } => Command::Invoke {
                call_id,
                function,
                args,
            },
            InboundMessage::CallResult {
                call_id,
                result,
                is_exception,
            } => Command::Resolve {
                call_id,
                outcome: ipc::decode_result(result, is_exception),
            },
        }
    }

    fn post(&self, command: Command) {
        if self.send(command).is_err() {
            warn!(window_id = %self.id(), "message dropped: router stopped");
        }
    }

    /// Called by the collaborator when a page load finishes: installs the
    /// page runtime, then marks the window navigated to `url`.
    pub fn on_navigation_completed(&self, url: impl Into<String>) {
        let url = url.into();
        let window = self.clone();
        self.inner.browser.execute_script(
            PAGE_RUNTIME,
            Box::new(move |installed| {
                if let Err(e) = installed {
                    warn!(window_id = %window.id(), url = %url, error = %e, "page runtime injection failed");
                }
                window.notify(LifecycleEvent::Navigated(url));
            }),
        );
    }

    /// Record a lifecycle change on the matching signal and publish it.
    pub fn notify(&self, event: LifecycleEvent) {
        let signals = &self.inner.signals;
        match &event {
            LifecycleEvent::Shown => signals.shown.set(None),
            LifecycleEvent::Hidden => signals.shown.clear(),
            LifecycleEvent::Ready => signals.ready.set(None),
            LifecycleEvent::Navigated(url) => signals.navigated.set(Some(json!(url))),
            LifecycleEvent::NewWindow { name, url } => {
                signals.new_window.set(Some(json!({ "name": name, "url": url })))
            }
            LifecycleEvent::Closing => signals.closing.set(None),
            LifecycleEvent::Closed => {
                signals.closed.set(None);
                // Nothing will answer once the page is gone.
                self.post(Command::CloseAll);
            }
        }

        info!(window_id = %self.id(), ?event, "lifecycle");
        let _ = self.inner.events.send(WindowEvent::Lifecycle {
            window_id: self.id(),
            event,
        });
    }

    /// Number of evaluations currently waiting for a result.
    pub async fn in_flight(&self) -> Result<usize> {
        let (reply, count) = oneshot::channel();
        self.send(Command::InFlight { reply })?;
        count.await.map_err(|_| BridgeError::Closed)
    }
}

/// Removes a pending entry when its caller stops waiting early.
struct PendingGuard {
    call_id: Option<CallId>,
    commands: mpsc::UnboundedSender<Command>,
}

impl PendingGuard {
    fn disarm(&mut self) {
        self.call_id = None;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Some(call_id) = self.call_id.take() {
            let _ = self.commands.send(Command::Cancel { call_id });
        }
    }
}
