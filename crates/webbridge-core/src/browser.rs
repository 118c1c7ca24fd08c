//! The native browser control, as seen from the bridge.
//!
//! Implementations marshal every call onto the GUI thread that owns the
//! control. Nothing here may block waiting for that thread.

use webbridge_common::BrowserError;

/// Called once when a submitted script finishes, with the raw JSON result
/// the control reports or the reason it could not run the script.
pub type ScriptCompletion = Box<dyn FnOnce(Result<String, BrowserError>) + Send + 'static>;

pub trait Browser: Send + Sync {
    /// Start loading `url`. Completion is reported separately through
    /// `Window::on_navigation_completed`.
    fn load_url(&self, url: &str) -> Result<(), BrowserError>;

    /// Submit `script` for asynchronous execution in the page.
    fn execute_script(&self, script: &str, on_complete: ScriptCompletion);
}
