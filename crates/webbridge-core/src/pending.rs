//! Table of host-initiated evaluations waiting for their result message.

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;
use webbridge_common::{BridgeError, CallId, ProtocolError};

/// Completion handle for one in-flight evaluation.
pub type Completion = oneshot::Sender<Result<Value, BridgeError>>;

/// Maps call ids to their completion handles.
///
/// Owned by a single router task; every id is present at most once and
/// leaves the table on its first resolution.
#[derive(Debug, Default)]
pub struct PendingCalls {
    calls: HashMap<CallId, Completion>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, call_id: CallId, completion: Completion) -> Result<(), ProtocolError> {
        if self.calls.contains_key(&call_id) {
            return Err(ProtocolError::DuplicateCall(call_id.to_string()));
        }
        self.calls.insert(call_id, completion);
        Ok(())
    }

    /// Remove `call_id` and hand `outcome` to whoever is waiting on it.
    pub fn resolve(
        &mut self,
        call_id: &CallId,
        outcome: Result<Value, BridgeError>,
    ) -> Result<(), ProtocolError> {
        let completion = self
            .calls
            .remove(call_id)
            .ok_or_else(|| ProtocolError::UnknownCall(call_id.to_string()))?;

        if completion.send(outcome).is_err() {
            debug!(call_id = %call_id, "result arrived after the caller stopped waiting");
        }
        Ok(())
    }

    /// Drop `call_id` without resolving it. Returns whether it was pending.
    pub fn remove(&mut self, call_id: &CallId) -> bool {
        self.calls.remove(call_id).is_some()
    }

    /// Fail every pending call with [`BridgeError::Closed`]. Returns how many there were.
    pub fn close_all(&mut self) -> usize {
        let count = self.calls.len();
        for (_, completion) in self.calls.drain() {
            let _ = completion.send(Err(BridgeError::Closed));
        }
        count
    }

    pub fn contains(&self, call_id: &CallId) -> bool {
        self.calls.contains_key(call_id)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
