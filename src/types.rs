//! Core types for quill-bridge.
//!
//! These types cross every component boundary: the tagged value union that
//! replaces dynamic property maps, and the opaque handle newtypes for field
//! identity, UI tree roots, and pinned managed references.

use std::fmt;

use serde_json::Value as Json;

// =============================================================================
// Value
// =============================================================================

/// A dynamically-typed value as the UI layer sees it.
///
/// The bridge carries exactly four shapes: text, number, boolean, absent.
/// Anything richer is coerced before it crosses a boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Absent,
}

impl Value {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Check if this is the absent value.
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Textual form used when a value crosses the runtime boundary.
    ///
    /// Numbers with no fractional part render without a trailing `.0`
    /// so that `3` arrives as `"3"`, not `"3.0"`. `Absent` renders as
    /// the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Absent => String::new(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&Json> for Value {
    /// Convert a JSON value into the bridge's value union.
    ///
    /// Records are flat by contract; a nested array or object is carried
    /// as its JSON text rather than rejected.
    fn from(json: &Json) -> Self {
        match json {
            Json::Null => Self::Absent,
            Json::Bool(b) => Self::Bool(*b),
            Json::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Absent),
            Json::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// =============================================================================
// Handles
// =============================================================================

/// Stable integer identity for a table field name.
///
/// Assigned the first time a field name is seen; the name↔id mapping is
/// append-only for the lifetime of a table model. Ids are never reused or
/// reclaimed, not even across `clear()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

/// Opaque handle to a UI tree root held in the ownership arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootHandle(pub u32);

/// Opaque handle into the pin table.
///
/// Identifies a managed-runtime reference the callback registry is keeping
/// alive. Only the registry hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinHandle(pub u32);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_coercion() {
        assert_eq!(Value::Number(3.0).to_text(), "3");
        assert_eq!(Value::Number(3.5).to_text(), "3.5");
        assert_eq!(Value::Number(-12.0).to_text(), "-12");
        assert_eq!(Value::Bool(true).to_text(), "true");
        assert_eq!(Value::text("hi").to_text(), "hi");
        assert_eq!(Value::Absent.to_text(), "");
    }

    #[test]
    fn from_json_scalars() {
        assert_eq!(Value::from(&json!(null)), Value::Absent);
        assert_eq!(Value::from(&json!(true)), Value::Bool(true));
        assert_eq!(Value::from(&json!(42)), Value::Number(42.0));
        assert_eq!(Value::from(&json!("x")), Value::text("x"));
    }

    #[test]
    fn from_json_nested_becomes_text() {
        let v = Value::from(&json!([1, 2]));
        assert_eq!(v, Value::text("[1,2]"));
    }
}
