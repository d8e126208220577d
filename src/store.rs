//! Reactive store - key→value state with change notification.
//!
//! The store is owned independently of the UI tree: the live-reload
//! protocol tears the tree down and rebuilds it, and externally-held state
//! survives purely because this object's lifetime is not tied to any root.
//!
//! Each key is backed by a spark-signals [`Signal`], so UI bindings reading
//! through a derived or effect re-run when the key changes. A store-wide
//! revision signal bumps on every `set`, observable even when a write
//! leaves a key's value equal to what it was.

use std::collections::HashMap;

use log::debug;
use spark_signals::{signal, Signal};

use crate::types::Value;

pub struct Store {
    entries: HashMap<String, Signal<Value>>,
    revision: Signal<u64>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            revision: signal(0),
        }
    }

    /// Set a key. Always triggers a change notification via the revision
    /// signal, even when the value is unchanged.
    pub fn set(&mut self, key: &str, value: Value) {
        debug!("store: {key} = {value:?}");
        match self.entries.get(key) {
            Some(existing) => {
                existing.set(value);
            }
            None => {
                self.entries.insert(key.to_string(), signal(value));
            }
        }
        self.revision.set(self.revision.get() + 1);
    }

    /// Current value for a key, `Absent` if never set.
    ///
    /// Reading inside an effect or derived registers a dependency on the
    /// key's signal.
    pub fn get(&self, key: &str) -> Value {
        self.entries
            .get(key)
            .map(Signal::get)
            .unwrap_or(Value::Absent)
    }

    /// Whether a key has ever been set.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store-wide revision signal, bumped on every `set`.
    pub fn revision(&self) -> Signal<u64> {
        self.revision.clone()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
