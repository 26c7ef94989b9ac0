//! Seams to the page and the third-party widget global.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Receives the one-time verification token
pub type VerifyCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Fired when the widget reports an error
pub type ErrorCallback = Arc<dyn Fn() + Send + Sync>;

/// Widget rendering size. Forms only use the invisible widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSize {
    Invisible,
}

/// Options passed to the widget's `render` call
#[derive(Clone)]
pub struct RenderParams {
    pub sitekey: String,
    pub size: WidgetSize,
    pub callback: VerifyCallback,
    pub error_callback: ErrorCallback,
}

impl fmt::Debug for RenderParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderParams")
            .field("sitekey", &self.sitekey)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Attachment point owned by the caller
pub trait MountPoint: Send + Sync {
    /// Remove whatever a previous widget left behind
    fn clear(&self);
}

/// The widget global's imperative API
pub trait WidgetApi: Send + Sync {
    /// Render a widget into `mount`, returning its numeric handle
    fn render(&self, mount: &dyn MountPoint, params: RenderParams) -> Result<i64, String>;

    /// Start the challenge; the outcome arrives through the render callbacks
    fn execute(&self, widget_id: i64) -> Result<(), String>;

    /// Discard any pending challenge state
    fn reset(&self, widget_id: i64) -> Result<(), String>;
}

/// The document hosting the widget script
pub trait ScriptHost: Send + Sync + 'static {
    /// The widget global, if present and exposing `render`
    fn widget_api(&self) -> Option<Arc<dyn WidgetApi>>;

    /// Remove script tags whose source contains `pattern`, returning how many
    fn remove_scripts(&self, pattern: &str) -> usize;

    /// Append a script tag and wait for its load signal or network error
    fn inject_script(&self, src: &str) -> impl Future<Output = Result<(), String>> + Send;
}
