//! Single task that owns a window's pending calls and host functions.
//!
//! Every mutation arrives as a [`Command`] over an unbounded channel, so
//! the GUI thread and any number of async callers can post without locks.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace, warn};
use webbridge_common::{BridgeError, CallId, ProtocolError, ScriptError, WindowId};

use crate::browser::Browser;
use crate::events::WindowEvent;
use crate::functions::FunctionRegistry;
use crate::ipc;
use crate::pending::{Completion, PendingCalls};

pub(crate) enum Command {
    /// A host evaluation is about to be submitted.
    Register {
        call_id: CallId,
        completion: Completion,
    },
    /// The page reported the result of a host evaluation.
    Resolve {
        call_id: CallId,
        outcome: Result<Value, BridgeError>,
    },
    /// The control could not run a submitted script. Ignored if already settled.
    Fail { call_id: CallId, error: BridgeError },
    /// The caller stopped waiting (timeout, cancellation, drop).
    Cancel { call_id: CallId },
    /// The page invoked a host function.
    Invoke {
        call_id: CallId,
        function: String,
        args: Vec<Value>,
    },
    /// A message from the page could not be understood.
    Violation(ProtocolError),
    InFlight { reply: tokio::sync::oneshot::Sender<usize> },
    /// The window closed; fail every call still pending.
    CloseAll,
}

pub(crate) struct Router {
    window_id: WindowId,
    pending: PendingCalls,
    functions: FunctionRegistry,
    browser: Arc<dyn Browser>,
    events: broadcast::Sender<WindowEvent>,
}

impl Router {
    pub(crate) fn new(
        window_id: WindowId,
        functions: FunctionRegistry,
        browser: Arc<dyn Browser>,
        events: broadcast::Sender<WindowEvent>,
    ) -> Self {
        Self {
            window_id,
            pending: PendingCalls::new(),
            functions,
            browser,
            events,
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        debug!(window_id = %self.window_id, pending = self.pending.len(), "router stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Register {
                call_id,
                completion,
            } => {
                if let Err(e) = self.pending.insert(call_id, completion) {
                    self.violation(e);
                }
            }
            Command::Resolve { call_id, outcome } => {
                trace!(window_id = %self.window_id, call_id = %call_id, ok = outcome.is_ok(), "call resolved");
                if let Err(e) = self.pending.resolve(&call_id, outcome) {
                    self.violation(e);
                }
            }
            Command::Fail { call_id, error } => {
                if self.pending.contains(&call_id) {
                    warn!(window_id = %self.window_id, call_id = %call_id, error = %error, "script submission failed");
                    let _ = self.pending.resolve(&call_id, Err(error));
                }
            }
            Command::Cancel { call_id } => {
                if self.pending.remove(&call_id) {
                    debug!(window_id = %self.window_id, call_id = %call_id, "pending call abandoned");
                }
            }
            Command::Invoke {
                call_id,
                function,
                args,
            } => self.invoke(call_id, function, args),
            Command::Violation(error) => self.violation(error),
            Command::InFlight { reply } => {
                let _ = reply.send(self.pending.len());
            }
            Command::CloseAll => {
                let failed = self.pending.close_all();
                if failed > 0 {
                    debug!(window_id = %self.window_id, failed, "pending calls failed: window closed");
                }
            }
        }
    }

    /// Run a host function and send its outcome back to the page.
    fn invoke(&mut self, call_id: CallId, function: String, args: Vec<Value>) {
        let handler = self.functions.get(&function).cloned();
        if handler.is_none() {
            self.violation(ProtocolError::UnknownFunction(function.clone()));
        }

        debug!(window_id = %self.window_id, call_id = %call_id, function = %function, "host function invoked");
        let browser = Arc::clone(&self.browser);
        let window_id = self.window_id;
        tokio::spawn(async move {
            let outcome = match handler {
                Some(handler) => handler.invoke(args).await,
                None => Err(ScriptError::new(
                    "ProtocolError",
                    ProtocolError::UnknownFunction(function.clone()).to_string(),
                )),
            };
            if let Err(e) = &outcome {
                debug!(window_id = %window_id, function = %function, error = %e, "host function failed");
            }

            let script = ipc::result_reply_script(&call_id, &outcome);
            browser.execute_script(
                &script,
                Box::new(move |result| {
                    if let Err(e) = result {
                        warn!(window_id = %window_id, call_id = %call_id, error = %e, "failed to deliver host function result");
                    }
                }),
            );
        });
    }

    fn violation(&self, error: ProtocolError) {
        warn!(window_id = %self.window_id, error = %error, "protocol violation");
        let _ = self.events.send(WindowEvent::ProtocolViolation {
            window_id: self.window_id,
            error,
        });
    }
}
