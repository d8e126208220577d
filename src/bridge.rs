//! Bridge - the composition root.
//!
//! One explicit context object constructed at startup owns every component
//! and is passed by reference wherever it is needed; there is no ambient
//! global state. The methods here are the entry-point surface the managed
//! runtime calls into, plus `emit` for the UI side and `tick` for the
//! event loop.
//!
//! Lifecycle: construction wires the components, `initialize` opens the
//! surface. Every entry point invoked before `initialize` is a guarded,
//! logged no-op returning a default - never a fatal error.

use std::path::Path;
use std::time::Instant;

use log::{info, warn};
use serde_json::Value as Json;

use crate::engine::UiEngine;
use crate::events::CallbackRegistry;
use crate::model::{ModelRegistry, TableSource};
use crate::runtime::ManagedRuntime;
use crate::store::Store;
use crate::types::Value;
use crate::watch::ReloadWatcher;

pub struct Bridge<R: ManagedRuntime, E: UiEngine> {
    runtime: R,
    engine: E,
    callbacks: CallbackRegistry<R>,
    models: ModelRegistry,
    store: Store,
    watcher: ReloadWatcher,
    initialized: bool,
}

impl<R: ManagedRuntime, E: UiEngine> Bridge<R, E> {
    /// Wire the components together. The surface stays guarded until
    /// [`initialize`](Self::initialize) runs.
    pub fn new(runtime: R, engine: E) -> Self {
        Self {
            runtime,
            engine,
            callbacks: CallbackRegistry::new(),
            models: ModelRegistry::new(),
            store: Store::new(),
            watcher: ReloadWatcher::new(),
            initialized: false,
        }
    }

    /// Open the entry-point surface. Idempotent. `args` are the process
    /// arguments handed over by the managed runtime; the bridge itself has
    /// no use for them but a toolkit binding may.
    pub fn initialize(&mut self, args: &[String]) {
        if self.initialized {
            info!("bridge already initialized");
            return;
        }
        info!("bridge initialized ({} arg(s))", args.len());
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ready(&self, op: &str) -> bool {
        if !self.initialized {
            warn!("'{op}' called before initialize(), ignoring");
        }
        self.initialized
    }

    // =========================================================================
    // UI definition loading
    // =========================================================================

    /// Load a UI definition and, on success, begin watching it for
    /// live reload. Returns false when loading produced no roots.
    pub fn load(&mut self, path: &Path) -> bool {
        if !self.ready("load") {
            return false;
        }
        match self.engine.load(path) {
            Ok(0) => {
                warn!("failed to load {}: no roots produced", path.display());
                false
            }
            Ok(n) => {
                info!("loaded {} ({n} root(s))", path.display());
                // Watch failures are non-fatal: the UI is up, just not
                // live-reloading.
                let _ = self.watcher.watch(path);
                true
            }
            Err(err) => {
                warn!("failed to load {}: {err}", path.display());
                false
            }
        }
    }

    // =========================================================================
    // Reactive store surface
    // =========================================================================

    /// Set a store key. Every set is observable by the UI.
    pub fn set_state(&mut self, key: &str, value: Value) {
        if !self.ready("set_state") {
            return;
        }
        self.store.set(key, value);
    }

    /// Current value of a store key, `Absent` if unset.
    pub fn state(&self, key: &str) -> Value {
        if !self.ready("state") {
            return Value::Absent;
        }
        self.store.get(key)
    }

    pub fn has_state(&self, key: &str) -> bool {
        self.ready("has_state") && self.store.has(key)
    }

    /// The store itself, for UI-side bindings. Its lifetime is independent
    /// of the UI tree; reloads never touch it.
    pub fn store(&self) -> &Store {
        &self.store
    }

    // =========================================================================
    // Callback surface
    // =========================================================================

    /// Register a handler for a signal name. False if the handler is
    /// absent or the bridge is not initialized.
    pub fn register_signal_handler(&mut self, name: &str, handler: Option<R::Ref>) -> bool {
        if !self.ready("register_signal_handler") {
            return false;
        }
        self.callbacks.register(name, handler)
    }

    /// Unregister a signal handler, releasing its pin.
    pub fn unregister_signal_handler(&mut self, name: &str) {
        if !self.ready("unregister_signal_handler") {
            return;
        }
        self.callbacks.unregister(name);
    }

    /// Forward a UI event to the managed runtime. Called by the UI side.
    pub fn emit(&mut self, name: &str, args: &[Value]) {
        if !self.ready("emit") {
            return;
        }
        self.callbacks.emit(&mut self.runtime, name, args);
    }

    // =========================================================================
    // Model surface
    // =========================================================================

    pub fn create_model(&mut self, name: &str) {
        if !self.ready("create_model") {
            return;
        }
        self.models.create(name);
    }

    pub fn set_model_data(&mut self, name: &str, payload: &Json) {
        if !self.ready("set_model_data") {
            return;
        }
        self.models.set_data(name, payload);
    }

    /// Set model data from a JSON string - the wire format the managed
    /// runtime marshals across the boundary. Parse failures are logged and
    /// leave the model unchanged.
    pub fn set_model_json(&mut self, name: &str, json: &str) {
        if !self.ready("set_model_json") {
            return;
        }
        match serde_json::from_str::<Json>(json) {
            Ok(payload) => self.models.set_data(name, &payload),
            Err(err) => warn!("model '{name}': payload is not valid JSON: {err}"),
        }
    }

    pub fn clear_model(&mut self, name: &str) {
        if !self.ready("clear_model") {
            return;
        }
        self.models.clear(name);
    }

    /// Row count of a named model; 0 for unknown names or pre-init.
    pub fn model_count(&self, name: &str) -> usize {
        if !self.ready("model_count") {
            return 0;
        }
        self.models.count(name)
    }

    /// UI-facing capability view of a named model.
    pub fn model_source(&self, name: &str) -> Option<&dyn TableSource> {
        if !self.ready("model_source") {
            return None;
        }
        self.models.source(name)
    }

    // =========================================================================
    // Watcher surface
    // =========================================================================

    pub fn set_auto_reload(&mut self, enabled: bool) {
        if !self.ready("set_auto_reload") {
            return;
        }
        self.watcher.set_auto_reload(enabled);
    }

    pub fn is_auto_reload_enabled(&self) -> bool {
        self.ready("is_auto_reload_enabled") && self.watcher.is_auto_reload_enabled()
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// One cooperative event-loop turn: drain watcher notifications, fire a
    /// due reload, then drain the engine's deferred-deletion queue once.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// As [`tick`](Self::tick), with an injected clock for tests.
    pub fn tick_at(&mut self, now: Instant) {
        if !self.ready("tick") {
            return;
        }
        self.watcher.tick(&mut self.engine, now);
        self.engine.drain_deferred();
    }

    /// The engine collaborator.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The live-reload watcher.
    pub fn watcher(&self) -> &ReloadWatcher {
        &self.watcher
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessEngine;
    use crate::runtime::LocalRuntime;
    use serde_json::json;

    fn bridge() -> Bridge<LocalRuntime, HeadlessEngine> {
        Bridge::new(LocalRuntime::new(), HeadlessEngine::new())
    }

    #[test]
    fn surface_is_guarded_before_initialize() {
        let mut b = bridge();

        assert!(!b.register_signal_handler("clicked", Some(LocalRuntime::handler(|_| Ok(())))));
        b.set_state("k", Value::text("v"));
        assert_eq!(b.state("k"), Value::Absent);
        b.create_model("users");
        b.set_model_data("users", &json!([{"a": 1}]));
        assert_eq!(b.model_count("users"), 0);
        assert!(!b.is_auto_reload_enabled());
        b.tick();

        // After initialize the same calls go through.
        b.initialize(&[]);
        b.set_state("k", Value::text("v"));
        assert_eq!(b.state("k"), Value::text("v"));
        b.create_model("users");
        b.set_model_data("users", &json!([{"a": 1}]));
        assert_eq!(b.model_count("users"), 1);
        assert!(b.is_auto_reload_enabled());
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut b = bridge();
        b.initialize(&["app".to_string()]);
        b.initialize(&[]);
        assert!(b.is_initialized());
    }

    #[test]
    fn emit_reaches_registered_handler() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut b = bridge();
        b.initialize(&[]);

        let calls: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let calls2 = calls.clone();
        let handler = LocalRuntime::handler(move |args| {
            calls2.borrow_mut().push(args.to_vec());
            Ok(())
        });

        assert!(b.register_signal_handler("clicked", Some(handler)));
        b.emit("clicked", &[Value::text("a"), Value::text("b")]);
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0], vec!["a".to_string(), "b".to_string()]);

        b.unregister_signal_handler("clicked");
        b.emit("clicked", &[]);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn model_json_wire_format() {
        let mut b = bridge();
        b.initialize(&[]);
        b.create_model("users");
        b.set_model_json("users", r#"[{"name":"ada"},{"name":"lin"}]"#);
        assert_eq!(b.model_count("users"), 2);

        // Invalid JSON leaves the model unchanged.
        b.set_model_json("users", "not json");
        assert_eq!(b.model_count("users"), 2);
    }
}
