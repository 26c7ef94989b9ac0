//! Widget registry and the public contract used by forms.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use axiom_common::AxiomError;
use axiom_common::constants::TOKEN_WAIT_TIMEOUT_SECS;
use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::host::{
    ErrorCallback, MountPoint, RenderParams, ScriptHost, VerifyCallback, WidgetApi, WidgetSize,
};
use crate::loader::{ScriptLoadState, ScriptLoader};

type TokenResult = Result<String, AxiomError>;

/// How long a form waits for a widget token
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(TOKEN_WAIT_TIMEOUT_SECS);

/// A rendered widget, as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetHandle {
    pub container_id: String,
    pub widget_id: i64,
}

/// Registry entry: the remote handle plus the slot its callbacks route through
#[derive(Clone)]
struct Entry {
    widget_id: i64,
    slot: Arc<CallbackSlot>,
}

#[derive(Default)]
struct SlotState {
    retired: bool,
    /// A verification cycle is open between execute and the first callback
    open: bool,
    cycle: u64,
    waiter: Option<oneshot::Sender<TokenResult>>,
}

/// Routes widget callbacks to the caller, one response per cycle.
struct CallbackSlot {
    container_id: String,
    generation: u64,
    on_verify: VerifyCallback,
    on_error: ErrorCallback,
    state: Mutex<SlotState>,
}

impl CallbackSlot {
    fn new(
        container_id: &str,
        generation: u64,
        on_verify: VerifyCallback,
        on_error: ErrorCallback,
    ) -> Self {
        Self {
            container_id: container_id.to_string(),
            generation,
            on_verify,
            on_error,
            state: Mutex::new(SlotState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a new cycle. A waiter from an earlier cycle is dropped, which
    /// its receiver observes as cancellation.
    fn open_cycle(&self, waiter: Option<oneshot::Sender<TokenResult>>) -> Option<u64> {
        let mut state = self.lock();
        if state.retired {
            return None;
        }
        state.open = true;
        state.cycle += 1;
        state.waiter = waiter;
        Some(state.cycle)
    }

    fn close_cycle(&self) {
        let mut state = self.lock();
        state.open = false;
        state.waiter = None;
    }

    /// Close `cycle` only if no newer cycle has replaced it
    fn abandon_cycle(&self, cycle: u64) {
        let mut state = self.lock();
        if state.cycle == cycle {
            state.open = false;
            state.waiter = None;
        }
    }

    fn retire(&self) {
        let mut state = self.lock();
        state.retired = true;
        state.open = false;
        state.waiter = None;
    }

    /// Claim the open cycle, if any. Returns the waiter to resolve.
    fn claim(&self, kind: &str) -> Option<Option<oneshot::Sender<TokenResult>>> {
        let mut state = self.lock();
        if state.retired || !state.open {
            tracing::debug!(
                container_id = %self.container_id,
                generation = self.generation,
                kind,
                "Discarding widget callback outside an open cycle"
            );
            return None;
        }
        state.open = false;
        Some(state.waiter.take())
    }

    fn deliver_token(&self, token: String) {
        let Some(waiter) = self.claim("token") else {
            return;
        };
        (self.on_verify)(token.clone());
        if let Some(tx) = waiter {
            let _ = tx.send(Ok(token));
        }
    }

    fn deliver_error(&self) {
        let Some(waiter) = self.claim("error") else {
            return;
        };
        (self.on_error)();
        if let Some(tx) = waiter {
            let _ = tx.send(Err(AxiomError::CaptchaVerificationFailed(
                "widget reported an error".to_string(),
            )));
        }
    }
}

/// Creates, executes, resets, and destroys widgets keyed by container id.
///
/// At most one live widget exists per container id; creating another one
/// for the same id destroys the first.
pub struct WidgetManager<H> {
    loader: ScriptLoader<H>,
    widgets: DashMap<String, Entry>,
    next_generation: AtomicU64,
}

impl<H: ScriptHost> WidgetManager<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::with_loader(ScriptLoader::new(host))
    }

    pub fn with_loader(loader: ScriptLoader<H>) -> Self {
        Self {
            loader,
            widgets: DashMap::new(),
            next_generation: AtomicU64::new(1),
        }
    }

    pub fn load_state(&self) -> ScriptLoadState {
        self.loader.state()
    }

    pub fn is_registered(&self, container_id: &str) -> bool {
        self.widgets.contains_key(container_id)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn widget_id(&self, container_id: &str) -> Option<i64> {
        self.widgets.get(container_id).map(|e| e.widget_id)
    }

    /// Render an invisible widget for `container_id`.
    ///
    /// Verification events for the container route to `on_verify` and
    /// `on_error` from here on. Script load failures propagate without a
    /// render attempt; a failed render invokes `on_error` once.
    pub async fn create_widget(
        &self,
        container_id: &str,
        mount: &dyn MountPoint,
        site_key: &str,
        on_verify: VerifyCallback,
        on_error: ErrorCallback,
    ) -> Result<WidgetHandle, AxiomError> {
        if site_key.trim().is_empty() {
            return Err(AxiomError::Validation("site key is required".to_string()));
        }

        let api = self.loader.ensure_loaded().await?;

        self.destroy_widget(container_id);
        mount.clear();

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let slot = Arc::new(CallbackSlot::new(
            container_id,
            generation,
            on_verify,
            Arc::clone(&on_error),
        ));

        let params = RenderParams {
            sitekey: site_key.to_string(),
            size: WidgetSize::Invisible,
            callback: token_router(&slot),
            error_callback: error_router(&slot),
        };

        let widget_id = match api.render(mount, params) {
            Ok(id) if id >= 0 => id,
            Ok(id) => {
                slot.retire();
                on_error();
                tracing::error!(
                    container_id,
                    widget_id = id,
                    "Widget render returned a malformed handle"
                );
                return Err(AxiomError::WidgetCreationFailed(format!(
                    "malformed widget id {id}"
                )));
            }
            Err(e) => {
                slot.retire();
                on_error();
                tracing::error!(container_id, error = %e, "Failed to create widget");
                return Err(AxiomError::WidgetCreationFailed(e));
            }
        };

        let previous = self
            .widgets
            .insert(container_id.to_string(), Entry { widget_id, slot });

        // Another create for this id finished while we awaited: last writer wins
        if let Some(previous) = previous {
            tracing::debug!(container_id, "Replacing widget created concurrently");
            release(api.as_ref(), container_id, previous);
        }

        tracing::debug!(container_id, widget_id, generation, "Widget created");

        Ok(WidgetHandle {
            container_id: container_id.to_string(),
            widget_id,
        })
    }

    /// Start verification. The token or error arrives through the callbacks
    /// given at creation. Does nothing if the container has no widget.
    pub fn execute_widget(&self, container_id: &str) {
        let Some((entry, api)) = self.lookup(container_id) else {
            return;
        };

        if entry.slot.open_cycle(None).is_none() {
            return;
        }

        if let Err(e) = api.execute(entry.widget_id) {
            entry.slot.close_cycle();
            tracing::error!(container_id, error = %e, "Failed to execute widget");
        }
    }

    /// Execute the widget and wait for the first response of this cycle.
    ///
    /// A response arriving after `timeout` is discarded. Resetting or
    /// destroying the widget while waiting cancels the request.
    pub async fn request_token(
        &self,
        container_id: &str,
        timeout: Duration,
    ) -> Result<String, AxiomError> {
        let (entry, api) = self.lookup(container_id).ok_or_else(|| {
            AxiomError::IntegrationUnavailable(format!("no widget for container {container_id}"))
        })?;

        let (tx, rx) = oneshot::channel();
        let cycle = entry.slot.open_cycle(Some(tx)).ok_or_else(|| {
            AxiomError::Cancelled(format!("widget for {container_id} was destroyed"))
        })?;

        if let Err(e) = api.execute(entry.widget_id) {
            entry.slot.abandon_cycle(cycle);
            tracing::error!(container_id, error = %e, "Failed to execute widget");
            return Err(AxiomError::IntegrationUnavailable(e));
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AxiomError::Cancelled(format!(
                "verification for {container_id} was superseded"
            ))),
            Err(_) => {
                entry.slot.abandon_cycle(cycle);
                tracing::warn!(container_id, ?timeout, "Timed out waiting for widget token");
                Err(AxiomError::Timeout("CAPTCHA verification timed out".to_string()))
            }
        }
    }

    /// `request_token` with the standard form wait of `DEFAULT_TOKEN_TIMEOUT`
    pub async fn request_token_default(&self, container_id: &str) -> Result<String, AxiomError> {
        self.request_token(container_id, DEFAULT_TOKEN_TIMEOUT).await
    }

    /// Clear pending verification so the widget can be executed again.
    pub fn reset_widget(&self, container_id: &str) {
        let Some((entry, api)) = self.lookup(container_id) else {
            return;
        };

        entry.slot.close_cycle();
        if let Err(e) = api.reset(entry.widget_id) {
            tracing::warn!(container_id, error = %e, "Failed to reset widget");
        }
    }

    /// Release the remote widget and forget the container. Idempotent.
    pub fn destroy_widget(&self, container_id: &str) {
        let Some((_, entry)) = self.widgets.remove(container_id) else {
            return;
        };

        match self.loader.api() {
            Some(api) => release(api.as_ref(), container_id, entry),
            None => entry.slot.retire(),
        }
    }

    /// Destroy every registered widget (application teardown).
    pub fn cleanup(&self) {
        let ids: Vec<String> = self.widgets.iter().map(|e| e.key().clone()).collect();
        for id in &ids {
            self.destroy_widget(id);
        }
        tracing::debug!(count = ids.len(), "Widget registry cleaned up");
    }

    fn lookup(&self, container_id: &str) -> Option<(Entry, Arc<dyn WidgetApi>)> {
        let Some(entry) = self.widgets.get(container_id).map(|e| e.value().clone()) else {
            tracing::debug!(container_id, "No widget registered for container");
            return None;
        };
        let Some(api) = self.loader.api() else {
            tracing::warn!(container_id, "Widget API unavailable");
            return None;
        };
        Some((entry, api))
    }
}

/// Retire the slot first so nothing fires during the reset
fn release(api: &dyn WidgetApi, container_id: &str, entry: Entry) {
    entry.slot.retire();
    if let Err(e) = api.reset(entry.widget_id) {
        tracing::warn!(container_id, error = %e, "Failed to reset widget during destroy");
    }
}

fn token_router(slot: &Arc<CallbackSlot>) -> VerifyCallback {
    let slot: Weak<CallbackSlot> = Arc::downgrade(slot);
    Arc::new(move |token| {
        if let Some(slot) = slot.upgrade() {
            slot.deliver_token(token);
        }
    })
}

fn error_router(slot: &Arc<CallbackSlot>) -> ErrorCallback {
    let slot: Weak<CallbackSlot> = Arc::downgrade(slot);
    Arc::new(move || {
        if let Some(slot) = slot.upgrade() {
            slot.deliver_error();
        }
    })
}
