//! Script loading, deduplicated across every widget on the page.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axiom_common::AxiomError;
use axiom_common::constants::{RECAPTCHA_SCRIPT_PATTERN, RECAPTCHA_SCRIPT_URL};
use tokio::sync::watch;

use crate::host::{ScriptHost, WidgetApi};

/// Load progress of the widget script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLoadState {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

type LoadOutcome = Result<Arc<dyn WidgetApi>, AxiomError>;

/// Loads the widget script at most once.
///
/// The load runs on its own task, so a caller that stops waiting does not
/// abort it. Concurrent and later callers all observe the one outcome.
/// `Loaded` and `Failed` are terminal; a new page session means a new loader.
pub struct ScriptLoader<H> {
    task: Arc<LoadTask<H>>,
    started: AtomicBool,
}

struct LoadTask<H> {
    host: Arc<H>,
    src: String,
    pattern: String,
    loading: AtomicBool,
    outcome: watch::Sender<Option<LoadOutcome>>,
}

/// Clears `loading` and records an outcome if the task ends without one
struct LoadGuard<'a, H>(&'a LoadTask<H>);

impl<H> Drop for LoadGuard<'_, H> {
    fn drop(&mut self) {
        self.0.loading.store(false, Ordering::Release);
        self.0.outcome.send_if_modified(|outcome| {
            if outcome.is_some() {
                return false;
            }
            *outcome = Some(Err(AxiomError::IntegrationUnavailable(
                "widget script load was aborted".to_string(),
            )));
            true
        });
    }
}

impl<H: ScriptHost> ScriptLoader<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::with_script(host, RECAPTCHA_SCRIPT_URL, RECAPTCHA_SCRIPT_PATTERN)
    }

    pub fn with_script(host: Arc<H>, src: impl Into<String>, pattern: impl Into<String>) -> Self {
        let (outcome, _) = watch::channel(None);
        Self {
            task: Arc::new(LoadTask {
                host,
                src: src.into(),
                pattern: pattern.into(),
                loading: AtomicBool::new(false),
                outcome,
            }),
            started: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ScriptLoadState {
        match &*self.task.outcome.borrow() {
            Some(Ok(_)) => ScriptLoadState::Loaded,
            Some(Err(_)) => ScriptLoadState::Failed,
            None if self.task.loading.load(Ordering::Acquire) => ScriptLoadState::Loading,
            None => ScriptLoadState::NotLoaded,
        }
    }

    /// The widget API, once loading has succeeded
    pub fn api(&self) -> Option<Arc<dyn WidgetApi>> {
        match &*self.task.outcome.borrow() {
            Some(Ok(api)) => Some(Arc::clone(api)),
            _ => None,
        }
    }

    /// Resolve once the widget API is usable.
    ///
    /// The first call starts the load on the current Tokio runtime.
    pub async fn ensure_loaded(&self) -> LoadOutcome {
        let mut outcome = self.task.outcome.subscribe();
        self.start();

        let settled = outcome
            .wait_for(Option::is_some)
            .await
            .map(|settled| (*settled).clone());

        match settled {
            Ok(Some(result)) => result,
            _ => Err(AxiomError::IntegrationUnavailable(
                "widget script load was aborted".to_string(),
            )),
        }
    }

    fn start(&self) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }
        self.task.loading.store(true, Ordering::Release);
        let task = Arc::clone(&self.task);
        tokio::spawn(async move { task.run().await });
    }
}

impl<H: ScriptHost> LoadTask<H> {
    async fn run(&self) {
        let _guard = LoadGuard(self);
        let outcome = self.load().await;
        self.outcome.send_replace(Some(outcome));
    }

    async fn load(&self) -> LoadOutcome {
        if let Some(api) = self.host.widget_api() {
            tracing::debug!("Widget API already present, skipping script injection");
            return Ok(api);
        }

        // A previous partial load may have left tags behind
        let removed = self.host.remove_scripts(&self.pattern);
        if removed > 0 {
            tracing::debug!(removed, "Removed stale widget script tags");
        }

        tracing::info!(src = %self.src, "Injecting widget script");
        match self.host.inject_script(&self.src).await {
            Err(e) => {
                tracing::error!(error = %e, "Widget script failed to load");
                Err(AxiomError::ScriptLoadFailed(e))
            }
            Ok(()) => self.host.widget_api().ok_or_else(|| {
                tracing::error!("Widget script loaded but its API is missing");
                AxiomError::IntegrationUnavailable(
                    "widget API missing after script load".to_string(),
                )
            }),
        }
    }
}
