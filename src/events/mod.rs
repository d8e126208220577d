//! Callback Registry - forwards named UI events to managed-runtime handlers.
//!
//! The registry maps signal names to pinned handler references and carries
//! events across two mismatches at once: the garbage-collector boundary
//! (handlers must be pinned while registered, see [`pins`]) and the
//! thread-affinity mismatch (the UI toolkit may deliver an event from a
//! worker thread that holds no call context, see [`emit`]).
//!
//! Faults raised inside a handler never propagate past `emit`; the policy
//! at this boundary is log-and-clear.
//!
//! [`emit`]: CallbackRegistry::emit

pub mod pins;

use std::collections::HashMap;

use log::{debug, error, warn};

use crate::runtime::ManagedRuntime;
use crate::types::{PinHandle, Value};
use pins::PinTable;

// =============================================================================
// Callback Registry
// =============================================================================

/// Maps signal names to pinned managed-runtime handlers.
///
/// Invariant: at most one live pin per signal name at any instant. The
/// registry is the sole owner of its pin table.
pub struct CallbackRegistry<R: ManagedRuntime> {
    pins: PinTable<R::Ref>,
    handlers: HashMap<String, PinHandle>,
}

impl<R: ManagedRuntime> CallbackRegistry<R> {
    pub fn new() -> Self {
        Self {
            pins: PinTable::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a signal name.
    ///
    /// Returns false if `handler` is absent. Otherwise the reference is
    /// pinned and any prior handle for the same name is unpinned first, so
    /// re-registration under the same name is idempotent in effect: the most
    /// recently registered handler is always the one that fires.
    pub fn register(&mut self, name: &str, handler: Option<R::Ref>) -> bool {
        let Some(handler) = handler else {
            error!("cannot register absent handler for signal '{name}'");
            return false;
        };

        let handle = self.pins.pin(handler);
        if let Some(old) = self.handlers.insert(name.to_string(), handle) {
            debug!("replacing existing handler for signal '{name}'");
            self.pins.unpin(old);
        }
        debug!("registered handler for signal '{name}'");
        true
    }

    /// Unregister the handler for a signal name, releasing its pin.
    ///
    /// No-op if none exists.
    pub fn unregister(&mut self, name: &str) {
        match self.handlers.remove(name) {
            Some(handle) => {
                self.pins.unpin(handle);
                debug!("unregistered handler for signal '{name}'");
            }
            None => debug!("no handler registered for signal '{name}'"),
        }
    }

    /// Forward an event to the handler registered for `name`.
    ///
    /// A missing handler is expected, not exceptional: the event is logged
    /// and dropped. If the calling thread has no call context (the toolkit
    /// delivered the event from a worker thread it owns), the thread is
    /// attached on demand and never detached. Arguments are coerced to text
    /// before crossing the boundary. A fault raised inside the handler is
    /// logged and cleared here; it never reaches the UI thread.
    pub fn emit(&self, runtime: &mut R, name: &str, args: &[Value]) {
        let Some(&handle) = self.handlers.get(name) else {
            debug!("no handler registered for signal '{name}', dropping event");
            return;
        };
        let Some(handler) = self.pins.get(handle) else {
            // Name table and pin table are updated together, so a dangling
            // entry would be a registry bug.
            error!("handler pin missing for signal '{name}'");
            return;
        };

        if !runtime.has_call_context() {
            debug!("attaching current thread to managed runtime for '{name}'");
            if let Err(err) = runtime.attach_current_thread() {
                error!("cannot deliver '{name}': {err}");
                return;
            }
        }

        let text_args: Vec<String> = args.iter().map(Value::to_text).collect();
        debug!("emitting '{name}' with {} argument(s)", text_args.len());

        if let Err(fault) = runtime.invoke(handler, &text_args) {
            warn!("handler for '{name}' raised a fault (cleared at boundary): {fault}");
        }
    }

    /// Whether a handler is currently registered for `name`.
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of live pinned handlers.
    pub fn pinned_count(&self) -> usize {
        self.pins.len()
    }
}

impl<R: ManagedRuntime> Default for CallbackRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
