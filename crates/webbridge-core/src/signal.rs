//! Awaitable flag with an optional payload.
//!
//! A `Signal` is set from whichever thread observes the underlying event
//! (usually the GUI thread) and awaited from async tasks. State changes go
//! through a `tokio::sync::watch` channel, so setters never touch a
//! waiter's task directly.

use std::future::Future;

use serde_json::Value;
use tokio::sync::watch;

#[derive(Debug, Clone, Default)]
struct SignalState {
    set: bool,
    payload: Option<Value>,
    /// Bumped on every `set`, so a waiter notices a set that was cleared
    /// again before it got polled.
    generation: u64,
}

#[derive(Debug)]
pub struct Signal {
    name: &'static str,
    state: watch::Sender<SignalState>,
}

impl Signal {
    pub fn new(name: &'static str) -> Self {
        Self::from_state(name, SignalState::default())
    }

    /// Unset signal whose payload is already readable through [`Signal::payload`].
    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self::from_state(
            name,
            SignalState {
                set: false,
                payload: Some(payload),
                generation: 0,
            },
        )
    }

    fn from_state(name: &'static str, state: SignalState) -> Self {
        let (state, _) = watch::channel(state);
        Self { name, state }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mark the signal set, replacing the payload, and wake every waiter.
    /// Safe to call from any thread.
    pub fn set(&self, payload: Option<Value>) {
        self.state.send_modify(|state| {
            state.set = true;
            state.payload = payload;
            state.generation = state.generation.wrapping_add(1);
        });
    }

    /// Reset to unset. The last payload stays readable.
    pub fn clear(&self) {
        self.state.send_modify(|state| state.set = false);
    }

    pub fn is_set(&self) -> bool {
        self.state.borrow().set
    }

    /// Current payload, without waiting.
    pub fn payload(&self) -> Option<Value> {
        self.state.borrow().payload.clone()
    }

    /// Wait until the signal is set and return its payload.
    ///
    /// Returns immediately while the signal stays set. The waiter registers
    /// when `wait` is called, so any later `set` wakes it even if `clear`
    /// runs before the future is polled.
    pub fn wait(&self) -> impl Future<Output = Option<Value>> + Send + 'static {
        let mut rx = self.state.subscribe();
        let seen = rx.borrow_and_update().generation;
        async move {
            let payload = match rx.wait_for(|state| state.set || state.generation != seen).await {
                Ok(state) => state.payload.clone(),
                // The signal was dropped while we waited.
                Err(_) => None,
            };
            payload
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn starts_unset() {
        let signal = Signal::new("shown");
        assert!(!signal.is_set());
        assert_eq!(signal.payload(), None);
        assert_eq!(signal.name(), "shown");
    }

    #[test]
    fn seeded_payload_is_readable_but_unset() {
        let signal = Signal::with_payload("navigated", json!("about:blank"));
        assert!(!signal.is_set());
        assert_eq!(signal.payload(), Some(json!("about:blank")));
    }

    #[tokio::test]
    async fn wait_returns_payload_repeatedly() {
        let signal = Signal::new("ready");
        signal.set(Some(json!({"ok": true})));

        assert_eq!(signal.wait().await, Some(json!({"ok": true})));
        // Second wait must not block.
        let second = tokio::time::timeout(Duration::from_millis(100), signal.wait()).await;
        assert_eq!(second.unwrap(), Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn set_wakes_all_waiters() {
        let signal = Arc::new(Signal::new("closed"));
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let signal = Arc::clone(&signal);
                tokio::spawn(async move { signal.wait().await })
            })
            .collect();

        tokio::task::yield_now().await;
        signal.set(None);

        for waiter in waiters {
            let result = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(result, None);
        }
    }

    #[tokio::test]
    async fn set_from_foreign_thread() {
        let signal = Arc::new(Signal::new("shown"));
        let setter = Arc::clone(&signal);
        std::thread::spawn(move || setter.set(Some(json!(1))))
            .join()
            .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), signal.wait()).await;
        assert_eq!(result.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn clear_then_set_delivers_new_payload() {
        let signal = Arc::new(Signal::new("navigated"));
        signal.set(Some(json!("https://a.example")));
        assert_eq!(signal.wait().await, Some(json!("https://a.example")));

        signal.clear();
        assert!(!signal.is_set());

        let waiter = {
            let signal = Arc::clone(&signal);
            tokio::spawn(async move { signal.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "waiter resolved with stale payload");

        signal.set(Some(json!("https://b.example")));
        let result = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Some(json!("https://b.example")));
        assert_eq!(signal.wait().await, Some(json!("https://b.example")));
    }

    #[tokio::test]
    async fn set_then_clear_still_wakes_existing_waiter() {
        let signal = Arc::new(Signal::new("shown"));
        let waiter = {
            let signal = Arc::clone(&signal);
            tokio::spawn(async move { signal.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        signal.set(Some(json!("x")));
        signal.clear();

        let result = tokio::time::timeout(Duration::from_millis(300), waiter)
            .await
            .expect("waiter missed a set followed by clear")
            .unwrap();
        assert_eq!(result, Some(json!("x")));
        assert!(!signal.is_set());
    }

    #[tokio::test]
    async fn waiter_registers_before_first_poll() {
        let signal = Signal::new("closed");
        let pending = signal.wait();

        signal.set(None);
        signal.clear();

        let result = tokio::time::timeout(Duration::from_millis(300), pending).await;
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn clear_keeps_payload() {
        let signal = Signal::new("navigated");
        signal.set(Some(json!("https://a.example")));
        signal.clear();
        assert_eq!(signal.payload(), Some(json!("https://a.example")));
    }

    #[test]
    fn set_without_payload_drops_previous_one() {
        let signal = Signal::new("shown");
        signal.set(Some(json!(1)));
        signal.set(None);
        assert!(signal.is_set());
        assert_eq!(signal.payload(), None);
    }
}
