//! Named model registry - the composition root's model surface.
//!
//! The managed runtime addresses table models by name. Operations on an
//! unknown name are logged no-ops returning a zero/default result; the UI
//! binding a model that was never created is an authoring error, not a
//! reason to fault the bridge.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value as Json;

use super::table::TableModel;
use super::TableSource;

pub struct ModelRegistry {
    models: HashMap<String, TableModel>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Create a named model. No-op if it already exists.
    pub fn create(&mut self, name: &str) {
        if self.models.contains_key(name) {
            debug!("model '{name}' already exists");
            return;
        }
        self.models.insert(name.to_string(), TableModel::new());
        debug!("model '{name}' created");
    }

    /// Replace the data of a named model. Logged no-op for unknown names;
    /// payload validation failures are logged and leave the model unchanged.
    pub fn set_data(&mut self, name: &str, payload: &Json) {
        let Some(model) = self.models.get_mut(name) else {
            warn!("set_data on unknown model '{name}'");
            return;
        };
        if let Err(err) = model.set_data(payload) {
            warn!("model '{name}' rejected payload: {err}");
        }
    }

    /// Clear a named model's rows. Logged no-op for unknown names.
    pub fn clear(&mut self, name: &str) {
        match self.models.get_mut(name) {
            Some(model) => model.clear(),
            None => warn!("clear on unknown model '{name}'"),
        }
    }

    /// Row count of a named model; 0 for unknown names.
    pub fn count(&self, name: &str) -> usize {
        match self.models.get(name) {
            Some(model) => model.count(),
            None => {
                warn!("count on unknown model '{name}'");
                0
            }
        }
    }

    /// Borrow a named model.
    pub fn get(&self, name: &str) -> Option<&TableModel> {
        self.models.get(name)
    }

    /// Borrow a named model through the UI-facing capability interface.
    pub fn source(&self, name: &str) -> Option<&dyn TableSource> {
        self.models.get(name).map(|m| m as &dyn TableSource)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use serde_json::json;

    #[test]
    fn create_is_idempotent() {
        let mut reg = ModelRegistry::new();
        reg.create("users");
        reg.set_data("users", &json!([{"a": 1}]));
        // Creating again must not clobber existing data.
        reg.create("users");
        assert_eq!(reg.count("users"), 1);
    }

    #[test]
    fn unknown_names_are_default_noops() {
        let mut reg = ModelRegistry::new();
        reg.set_data("ghost", &json!([{"a": 1}]));
        reg.clear("ghost");
        assert_eq!(reg.count("ghost"), 0);
        assert!(reg.source("ghost").is_none());
    }

    #[test]
    fn source_exposes_capability_view() {
        let mut reg = ModelRegistry::new();
        reg.create("users");
        reg.set_data("users", &json!([{"name": "ada"}]));

        let source = reg.source("users").unwrap();
        assert_eq!(source.row_count(), 1);
        assert_eq!(source.get(0, "name"), Value::text("ada"));
    }
}
