//! In-memory browser double that records traffic and can play the page.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use webbridge_common::{BrowserError, ScriptError};

use crate::browser::{Browser, ScriptCompletion};
use crate::window::Window;

type Responder = dyn Fn(&str) -> Option<Result<Value, ScriptError>> + Send + Sync;

#[derive(Default)]
pub(crate) struct RecordingBrowser {
    scripts: Mutex<Vec<String>>,
    urls: Mutex<Vec<String>>,
    submit_error: Mutex<Option<BrowserError>>,
    load_error: Mutex<Option<BrowserError>>,
    page: Mutex<Option<Window>>,
    responder: Mutex<Option<Arc<Responder>>>,
    auto_navigate: Mutex<bool>,
}

impl RecordingBrowser {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let the double post page messages to `window`.
    pub(crate) fn attach(&self, window: &Window) {
        *self.page.lock().unwrap() = Some(window.clone());
    }

    /// Answer wrapped evaluations: `f` gets the script body and returns the
    /// outcome the page would report, or `None` to stay silent.
    pub(crate) fn respond_with<F>(&self, f: F)
    where
        F: Fn(&str) -> Option<Result<Value, ScriptError>> + Send + Sync + 'static,
    {
        *self.responder.lock().unwrap() = Some(Arc::new(f));
    }

    pub(crate) fn fail_submissions(&self, error: BrowserError) {
        *self.submit_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_loads(&self, error: BrowserError) {
        *self.load_error.lock().unwrap() = Some(error);
    }

    /// Report every load as completed shortly after it starts.
    pub(crate) fn auto_navigate(&self) {
        *self.auto_navigate.lock().unwrap() = true;
    }

    pub(crate) fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Poll until a submitted script satisfies `pred`.
    pub(crate) async fn wait_for_script<P>(&self, pred: P) -> String
    where
        P: Fn(&str) -> bool,
    {
        for _ in 0..400 {
            if let Some(found) = self.scripts().into_iter().find(|s| pred(s)) {
                return found;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no matching script submitted; saw {:?}", self.scripts());
    }

    fn page(&self) -> Option<Window> {
        self.page.lock().unwrap().clone()
    }
}

impl Browser for RecordingBrowser {
    fn load_url(&self, url: &str) -> Result<(), BrowserError> {
        if let Some(e) = self.load_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.urls.lock().unwrap().push(url.to_string());

        if *self.auto_navigate.lock().unwrap() {
            if let Some(window) = self.page() {
                let url = url.to_string();
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(10));
                    window.on_navigation_completed(url);
                });
            }
        }
        Ok(())
    }

    fn execute_script(&self, script: &str, on_complete: ScriptCompletion) {
        self.scripts.lock().unwrap().push(script.to_string());

        if let Some(e) = self.submit_error.lock().unwrap().clone() {
            on_complete(Err(e));
            return;
        }

        let responder = self.responder.lock().unwrap().clone();
        if let (Some(window), Some(responder), Some((call_id, body))) =
            (self.page(), responder, parse_wrapped(script))
        {
            if let Some(outcome) = responder(&body) {
                let (payload, is_exception) = match outcome {
                    Ok(value) => (serde_json::to_string(&value).unwrap(), false),
                    Err(error) => (serde_json::to_string(&error).unwrap(), true),
                };
                // Page messages arrive on the GUI thread, not the caller's.
                std::thread::spawn(move || {
                    window.handle_web_message(1, json!([call_id, payload, is_exception]));
                });
            }
        }

        on_complete(Ok("null".to_string()));
    }
}

/// Split `webview._callJs("<id>", async () => { <body> })` into id and body.
pub(crate) fn parse_wrapped(script: &str) -> Option<(String, String)> {
    let rest = script.strip_prefix("webview._callJs(")?;
    let (id_literal, rest) = rest.split_once(", async () => { ")?;
    let body = rest.strip_suffix(" })")?;
    let call_id: String = serde_json::from_str(id_literal).ok()?;
    Some((call_id, body.to_string()))
}

/// Split `return f(...JSON.parse("<args>"))` into function name and args.
pub(crate) fn parse_call(body: &str) -> Option<(String, Vec<Value>)> {
    let rest = body.strip_prefix("return ")?;
    let (function, rest) = rest.split_once("(...JSON.parse(")?;
    let literal = rest.strip_suffix("))")?;
    let args_json: String = serde_json::from_str(literal).ok()?;
    let args = serde_json::from_str(&args_json).ok()?;
    Some((function.to_string(), args))
}

/// Split `webview._resultOk(id, json, isError)` into its decoded arguments.
pub(crate) fn parse_reply(script: &str) -> Option<(String, String, bool)> {
    let args = script
        .strip_prefix("webview._resultOk(")?
        .strip_suffix(')')?;
    serde_json::from_str(&format!("[{args}]")).ok()
}
