//! Registry of open windows.
//!
//! `WindowManager` hands out window ids, spawns a [`Window`] per browser
//! control and keeps them until they are destroyed. The first window opened
//! is the primary one for as long as it lives.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info};
use webbridge_common::WindowId;

use crate::browser::Browser;
use crate::events::LifecycleEvent;
use crate::functions::FunctionRegistry;
use crate::window::{Window, WindowOptions};


#[derive(Debug, Default)]
pub struct WindowManager {
    windows: BTreeMap<WindowId, Window>,
    next_id: u32,
    primary: Option<WindowId>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a window backed by `browser` and register it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        &mut self,
        options: WindowOptions,
        functions: FunctionRegistry,
        browser: Arc<dyn Browser>,
    ) -> Window {
        let id = WindowId(self.next_id);
        self.next_id += 1;

        let window = Window::spawn(id, options, functions, browser);
        self.windows.insert(id, window.clone());
        if self.primary.is_none() {
            self.primary = Some(id);
        }
        info!(window_id = %id, "window opened");
        window
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// The first window opened, or the oldest survivor once it is gone.
    pub fn primary(&self) -> Option<&Window> {
        self.primary
            .and_then(|id| self.windows.get(&id))
            .or_else(|| self.windows.values().next())
    }

    /// Forget a window, marking it closed if the GUI has not already.
    pub fn destroy(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.remove(&id) else {
            return false;
        };
        if !window.closed().is_set() {
            window.notify(LifecycleEvent::Closed);
        }
        if self.primary == Some(id) {
            self.primary = self.windows.keys().next().copied();
        }
        debug!(window_id = %id, "window destroyed");
        true
    }

    /// Destroy every window. Used during shutdown.
    pub fn destroy_all(&mut self) {
        for id in self.ids() {
            self.destroy(id);
        }
    }

    /// Drop windows whose GUI side has already closed. Returns how many went.
    pub fn remove_closed(&mut self) -> usize {
        let closed: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(_, w)| w.closed().is_set())
            .map(|(id, _)| *id)
            .collect();
        for id in &closed {
            self.destroy(*id);
        }
        closed.len()
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Wait until every registered window has closed.
    pub async fn join(&self) {
        let windows: Vec<Window> = self.windows.values().cloned().collect();
        join_all(windows.iter().map(|w| w.closed().wait())).await;
    }
}
