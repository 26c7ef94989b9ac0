//! In-memory page and widget global for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::host::{ErrorCallback, MountPoint, RenderParams, ScriptHost, VerifyCallback, WidgetApi};

#[derive(Debug, Clone, Copy)]
pub enum InjectBehavior {
    Succeed,
    LoadWithoutApi,
    NetworkError,
}

pub struct FakeHost {
    behavior: InjectBehavior,
    installed: Mutex<Option<Arc<FakeApi>>>,
    pending: Arc<FakeApi>,
    scripts: Mutex<Vec<String>>,
    injected: Mutex<Vec<String>>,
    removed: AtomicUsize,
}

impl FakeHost {
    pub fn new(behavior: InjectBehavior) -> Self {
        Self {
            behavior,
            installed: Mutex::new(None),
            pending: FakeApi::new(),
            scripts: Mutex::new(Vec::new()),
            injected: Mutex::new(Vec::new()),
            removed: AtomicUsize::new(0),
        }
    }

    /// A page where the widget global is already present
    pub fn with_api(api: Arc<FakeApi>) -> Self {
        Self {
            behavior: InjectBehavior::Succeed,
            installed: Mutex::new(Some(Arc::clone(&api))),
            pending: api,
            scripts: Mutex::new(Vec::new()),
            injected: Mutex::new(Vec::new()),
            removed: AtomicUsize::new(0),
        }
    }

    /// The API a successful injection installs
    pub fn pending_api(&self) -> Arc<FakeApi> {
        Arc::clone(&self.pending)
    }

    pub fn add_stale_script(&self, src: &str) {
        self.scripts.lock().unwrap().push(src.to_string());
    }

    pub fn inject_count(&self) -> usize {
        self.injected.lock().unwrap().len()
    }

    pub fn injected_sources(&self) -> Vec<String> {
        self.injected.lock().unwrap().clone()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }
}

impl ScriptHost for FakeHost {
    fn widget_api(&self) -> Option<Arc<dyn WidgetApi>> {
        self.installed
            .lock()
            .unwrap()
            .clone()
            .map(|api| api as Arc<dyn WidgetApi>)
    }

    fn remove_scripts(&self, pattern: &str) -> usize {
        let mut scripts = self.scripts.lock().unwrap();
        let before = scripts.len();
        scripts.retain(|src| !src.contains(pattern));
        let removed = before - scripts.len();
        self.removed.fetch_add(removed, Ordering::SeqCst);
        removed
    }

    async fn inject_script(&self, src: &str) -> Result<(), String> {
        self.injected.lock().unwrap().push(src.to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;

        match self.behavior {
            InjectBehavior::Succeed => {
                self.scripts.lock().unwrap().push(src.to_string());
                *self.installed.lock().unwrap() = Some(Arc::clone(&self.pending));
                Ok(())
            }
            InjectBehavior::LoadWithoutApi => Ok(()),
            InjectBehavior::NetworkError => Err("net::ERR_NAME_NOT_RESOLVED".to_string()),
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    next_id: AtomicI64,
    widgets: Mutex<HashMap<i64, RenderParams>>,
    executes: Mutex<Vec<i64>>,
    resets: Mutex<Vec<i64>>,
    responders: Mutex<HashMap<i64, Option<String>>>,
    render_failure: Mutex<Option<String>>,
    malformed: AtomicBool,
    failing_resets: AtomicBool,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rendered(&self, widget_id: i64) -> Option<RenderParams> {
        self.widgets.lock().unwrap().get(&widget_id).cloned()
    }

    pub fn execute_calls(&self) -> Vec<i64> {
        self.executes.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) -> Vec<i64> {
        self.resets.lock().unwrap().clone()
    }

    pub fn fail_next_render(&self, reason: &str) {
        *self.render_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn return_malformed_id(&self) {
        self.malformed.store(true, Ordering::SeqCst);
    }

    pub fn fail_resets(&self) {
        self.failing_resets.store(true, Ordering::SeqCst);
    }

    /// Answer every execute of `widget_id` synchronously: a token, or an error for `None`
    pub fn respond_on_execute(&self, widget_id: i64, token: Option<&str>) {
        self.responders
            .lock()
            .unwrap()
            .insert(widget_id, token.map(str::to_string));
    }

    pub fn fire_token(&self, widget_id: i64, token: &str) {
        let callback = self
            .widgets
            .lock()
            .unwrap()
            .get(&widget_id)
            .map(|p| Arc::clone(&p.callback));
        if let Some(callback) = callback {
            callback(token.to_string());
        }
    }

    pub fn fire_error(&self, widget_id: i64) {
        let callback = self
            .widgets
            .lock()
            .unwrap()
            .get(&widget_id)
            .map(|p| Arc::clone(&p.error_callback));
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl WidgetApi for FakeApi {
    fn render(&self, mount: &dyn MountPoint, params: RenderParams) -> Result<i64, String> {
        let _ = mount;
        if let Some(reason) = self.render_failure.lock().unwrap().take() {
            return Err(reason);
        }
        if self.malformed.load(Ordering::SeqCst) {
            return Ok(-1);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.widgets.lock().unwrap().insert(id, params);
        Ok(id)
    }

    fn execute(&self, widget_id: i64) -> Result<(), String> {
        self.executes.lock().unwrap().push(widget_id);
        let response = self.responders.lock().unwrap().get(&widget_id).cloned();
        match response {
            Some(Some(token)) => self.fire_token(widget_id, &token),
            Some(None) => self.fire_error(widget_id),
            None => {}
        }
        Ok(())
    }

    fn reset(&self, widget_id: i64) -> Result<(), String> {
        self.resets.lock().unwrap().push(widget_id);
        if self.failing_resets.load(Ordering::SeqCst) {
            return Err("widget not found".to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMount {
    clears: AtomicUsize,
}

impl FakeMount {
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl MountPoint for FakeMount {
    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Captures what the manager delivers to a form
#[derive(Default, Clone)]
pub struct Recorder {
    tokens: Arc<Mutex<Vec<String>>>,
    errors: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn on_verify(&self) -> VerifyCallback {
        let tokens = Arc::clone(&self.tokens);
        Arc::new(move |token| tokens.lock().unwrap().push(token))
    }

    pub fn on_error(&self) -> ErrorCallback {
        let errors = Arc::clone(&self.errors);
        Arc::new(move || {
            errors.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}
