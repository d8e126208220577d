//! Dynamic Table Model - schema-less tabular data the UI binds to.
//!
//! - [`table`] - the table model itself and the append-only field table
//! - [`registry`] - named models addressed from the managed runtime

pub mod registry;
pub mod table;

pub use registry::ModelRegistry;
pub use table::{FieldTable, TableModel};

use crate::types::Value;

/// Fixed capability interface the UI engine binds table data through.
///
/// Any table-like data source can implement this; the engine never depends
/// on a concrete model type.
pub trait TableSource {
    /// Number of rows currently visible.
    fn row_count(&self) -> usize;

    /// All field names ever seen, in id-assignment order.
    fn field_names(&self) -> &[String];

    /// Value at `(row, field)`; `Absent` rather than an error for anything
    /// out of range or unknown.
    fn get(&self, row: usize, field: &str) -> Value;
}
