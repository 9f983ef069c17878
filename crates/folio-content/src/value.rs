//! Classification and defaulting of structural values
//!
//! Content documents have no declared schema; their shape is discovered from
//! the value itself. [`classify`] picks the edit/render strategy for a node,
//! [`zeroed`] builds the empty twin used when appending array items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Strings longer than this (in chars) render as multi-line inputs
pub const LONG_TEXT_THRESHOLD: usize = 60;

/// Key of the object appended to an empty array
pub const PLACEHOLDER_KEY: &str = "value";

/// Shape of a structural value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Leaves are edited in place; containers are walked
    #[inline]
    #[must_use]
    pub fn is_leaf(self) -> bool {
        !matches!(self, Self::Array | Self::Object)
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Presentation hint for string leaves
///
/// Has no effect on editing; only chooses between a single-line input and a
/// text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextHint {
    Short,
    Long,
}

/// Classify a value by its variant
#[inline]
#[must_use]
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(_) => ValueKind::Number,
        Value::String(_) => ValueKind::String,
        Value::Array(_) => ValueKind::Array,
        Value::Object(_) => ValueKind::Object,
    }
}

/// Rendering hint for a string, using [`LONG_TEXT_THRESHOLD`]
#[inline]
#[must_use]
pub fn text_hint(text: &str) -> TextHint {
    text_hint_with(text, LONG_TEXT_THRESHOLD)
}

/// Rendering hint for a string with an explicit threshold
#[must_use]
pub fn text_hint_with(text: &str, threshold: usize) -> TextHint {
    if text.contains('\n') || text.chars().count() > threshold {
        TextHint::Long
    } else {
        TextHint::Short
    }
}

/// Same shape as `value`, every leaf reset to its empty default
///
/// string → `""`, number → `0`, boolean → `false`, null stays null.
/// Objects keep their key set and order; arrays keep their length.
#[must_use]
pub fn zeroed(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(_) => Value::Bool(false),
        Value::Number(n) if n.is_f64() => Value::from(0.0),
        Value::Number(_) => Value::from(0),
        Value::String(_) => Value::String(String::new()),
        Value::Array(items) => Value::Array(items.iter().map(zeroed).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), zeroed(v)))
                .collect::<Map<_, _>>(),
        ),
    }
}

/// Item appended to an array that has no element to copy the shape from
#[inline]
#[must_use]
pub fn placeholder_item() -> Value {
    let mut map = Map::new();
    map.insert(PLACEHOLDER_KEY.to_string(), Value::String(String::new()));
    Value::Object(map)
}

/// Check that every leaf of `value` equals its type's empty default
#[must_use]
pub fn is_zeroed(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.iter().all(is_zeroed),
        Value::Object(map) => map.values().all(is_zeroed),
    }
}
