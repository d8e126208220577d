//! Dynamic table model - schema-less rows with stable field identity.
//!
//! Incoming data is a complete snapshot with no per-row identity, so there
//! is no reliable basis for diffing: every update replaces the whole row
//! sequence in one swap and consumers treat the view as invalidated.
//! Field names, by contrast, are remembered forever - the first time a name
//! is seen it gets the next [`FieldId`], and that assignment survives every
//! later update, including `clear()`.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value as Json;

use crate::error::BridgeError;
use crate::types::{FieldId, Value};

use super::TableSource;

// =============================================================================
// Field Table
// =============================================================================

/// Append-only name↔id mapping for table fields.
///
/// The counter is monotonically increasing for the lifetime of the owning
/// table model; ids are never reused or reclaimed.
pub struct FieldTable {
    ids: HashMap<String, FieldId>,
    names: Vec<String>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Look up or assign the id for a field name.
    pub fn intern(&mut self, name: &str) -> FieldId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = FieldId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        debug!("registered field '{name}' with id {}", id.0);
        id
    }

    /// Id for a name, if it has ever been seen.
    pub fn id(&self, name: &str) -> Option<FieldId> {
        self.ids.get(name).copied()
    }

    /// Name for an id, if assigned.
    pub fn name(&self, id: FieldId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// All known field names, in assignment order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Rows
// =============================================================================

/// One table row: field id → value, in record order.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(FieldId, Value)>,
}

impl Row {
    fn get(&self, id: FieldId) -> Value {
        self.cells
            .iter()
            .find(|(field, _)| *field == id)
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Absent)
    }
}

// =============================================================================
// Table Model
// =============================================================================

/// Ordered rows of heterogeneous fields, replaced wholesale on update.
pub struct TableModel {
    rows: Vec<Row>,
    fields: FieldTable,
}

impl TableModel {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            fields: FieldTable::new(),
        }
    }

    /// Replace the table contents from a payload.
    ///
    /// The payload must be a JSON array of flat objects. A non-array top
    /// level is rejected and the current table stays unchanged. Non-object
    /// records are skipped with a warning but do not abort the rest of the
    /// sequence. New field names are assigned ids as they are discovered.
    /// The visible row sequence is swapped in a single assignment only after
    /// the full payload has been parsed - a full reset, never a patch.
    ///
    /// Returns the number of rows now visible.
    pub fn set_data(&mut self, payload: &Json) -> Result<usize, BridgeError> {
        let Json::Array(records) = payload else {
            return Err(BridgeError::Validation(
                "table payload is not an array".to_string(),
            ));
        };

        let mut new_rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let Json::Object(map) = record else {
                warn!("skipping non-object record at index {index}");
                continue;
            };
            let mut row = Row::default();
            for (name, value) in map {
                let id = self.fields.intern(name);
                row.cells.push((id, Value::from(value)));
            }
            new_rows.push(row);
        }

        self.rows = new_rows;
        debug!(
            "table replaced: {} row(s), {} known field(s)",
            self.rows.len(),
            self.fields.len()
        );
        Ok(self.rows.len())
    }

    /// Drop all rows. The field table is deliberately left intact so ids
    /// stay stable across resets.
    pub fn clear(&mut self) {
        self.rows.clear();
        debug!("table cleared ({} field id(s) retained)", self.fields.len());
    }

    /// Value at `(row, field)`, or `Absent` for an out-of-range row or an
    /// unknown field. Never panics.
    pub fn get(&self, row: usize, field: &str) -> Value {
        let Some(id) = self.fields.id(field) else {
            return Value::Absent;
        };
        self.rows
            .get(row)
            .map(|r| r.get(id))
            .unwrap_or(Value::Absent)
    }

    /// Current row count.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Id for a field name, if it has ever appeared in a payload.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields.id(name)
    }

    /// The append-only field table.
    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for TableModel {
    fn row_count(&self) -> usize {
        self.count()
    }

    fn field_names(&self) -> &[String] {
        self.fields.names()
    }

    fn get(&self, row: usize, field: &str) -> Value {
        TableModel::get(self, row, field)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_ids_in_first_seen_order() {
        let mut model = TableModel::new();
        model
            .set_data(&json!([{"name": "x"}, {"name": "y", "age": 3}]))
            .unwrap();

        assert_eq!(model.field_id("name"), Some(FieldId(0)));
        assert_eq!(model.field_id("age"), Some(FieldId(1)));
        assert_eq!(model.count(), 2);
        assert_eq!(model.get(1, "age"), Value::Number(3.0));
        assert_eq!(model.get(0, "age"), Value::Absent);
    }

    #[test]
    fn non_array_payload_rejected_table_unchanged() {
        let mut model = TableModel::new();
        model.set_data(&json!([{"a": 1}])).unwrap();

        let err = model.set_data(&json!("not an array")).unwrap_err();
        assert!(matches!(err, BridgeError::Validation(_)));
        assert_eq!(model.count(), 1);
        assert_eq!(model.get(0, "a"), Value::Number(1.0));
    }

    #[test]
    fn non_object_records_skipped_not_fatal() {
        let mut model = TableModel::new();
        let n = model
            .set_data(&json!([{"a": 1}, 42, "junk", {"a": 2}]))
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(model.count(), 2);
        assert_eq!(model.get(1, "a"), Value::Number(2.0));
    }

    #[test]
    fn clear_keeps_field_ids_and_counter() {
        let mut model = TableModel::new();
        model.set_data(&json!([{"a": 1, "b": 2}])).unwrap();
        let a = model.field_id("a").unwrap();
        let b = model.field_id("b").unwrap();

        model.clear();
        assert_eq!(model.count(), 0);
        assert_eq!(model.field_id("a"), Some(a));
        assert_eq!(model.field_id("b"), Some(b));

        // New fields continue numbering where the counter left off.
        model.set_data(&json!([{"c": 3}])).unwrap();
        assert_eq!(model.field_id("c"), Some(FieldId(2)));
        assert_eq!(model.field_id("a"), Some(a));
        assert_eq!(model.field_id("b"), Some(b));
    }

    #[test]
    fn repeated_set_data_never_reassigns_ids() {
        let mut model = TableModel::new();
        model.set_data(&json!([{"x": 1}])).unwrap();
        model.set_data(&json!([{"y": 1}, {"x": 2}])).unwrap();

        assert_eq!(model.field_id("x"), Some(FieldId(0)));
        assert_eq!(model.field_id("y"), Some(FieldId(1)));
    }

    #[test]
    fn out_of_range_lookups_are_absent() {
        let mut model = TableModel::new();
        model.set_data(&json!([{"a": 1}])).unwrap();
        assert_eq!(model.get(5, "a"), Value::Absent);
        assert_eq!(model.get(0, "nope"), Value::Absent);
    }

    #[test]
    fn value_shapes_roundtrip() {
        let mut model = TableModel::new();
        model
            .set_data(&json!([{"t": "s", "n": 1.5, "b": false, "z": null}]))
            .unwrap();
        assert_eq!(model.get(0, "t"), Value::text("s"));
        assert_eq!(model.get(0, "n"), Value::Number(1.5));
        assert_eq!(model.get(0, "b"), Value::Bool(false));
        assert_eq!(model.get(0, "z"), Value::Absent);
    }

    #[test]
    fn capability_interface() {
        let mut model = TableModel::new();
        model.set_data(&json!([{"name": "x", "age": 1}])).unwrap();

        let source: &dyn TableSource = &model;
        assert_eq!(source.row_count(), 1);
        assert_eq!(source.field_names(), ["name".to_string(), "age".to_string()]);
        assert_eq!(source.get(0, "name"), Value::text("x"));
    }
}
