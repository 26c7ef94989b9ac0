//! # reCAPTCHA Widget
//!
//! Lifecycle management for the third-party invisible CAPTCHA widget.
//!
//! ## Architecture
//! ```text
//! Form → WidgetManager ──► ScriptLoader ──► ScriptHost (inject / lookup)
//!            │
//!            └──► registry: container id → (widget id, callback slot)
//!                                 ▲
//!          WidgetApi callbacks ───┘  (first callback per cycle wins)
//! ```
//!
//! The manager is constructed explicitly and shared by reference; one
//! instance lives for the page session.

mod host;
mod loader;
mod manager;

#[cfg(test)]
mod testing;

pub use host::{
    ErrorCallback, MountPoint, RenderParams, ScriptHost, VerifyCallback, WidgetApi, WidgetSize,
};
pub use loader::{ScriptLoadState, ScriptLoader};
pub use manager::{DEFAULT_TOKEN_TIMEOUT, WidgetHandle, WidgetManager};
