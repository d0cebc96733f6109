//! Runtime type descriptors for attribute values.
//!
//! Attribute values are plain [`serde_json::Value`]s. [`ValueType`] names the
//! exact runtime type of such a value and is what a `Type` rule compares
//! against. Comparison is by identity: there is no widening from `Integer` to
//! `Float` and no notion of one type accepting another.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Exact runtime type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The unset sentinel, `Value::Null`.
    Null,
    /// `true` / `false`.
    Boolean,
    /// A number representable as `i64` or `u64`.
    Integer,
    /// Any other number.
    Float,
    /// Text.
    String,
    /// An ordered sequence of values.
    Array,
    /// A string-keyed map of values.
    Object,
}

impl ValueType {
    /// Returns the exact type of `value`.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use vigil_validator::foundation::ValueType;
    ///
    /// assert_eq!(ValueType::of(&json!(1)), ValueType::Integer);
    /// assert_eq!(ValueType::of(&json!(1.0)), ValueType::Float);
    /// ```
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether values of this type have a notion of emptiness.
    #[must_use]
    pub const fn has_emptiness(self) -> bool {
        matches!(self, Self::String | Self::Array | Self::Object)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is not one of the known [`ValueType`]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value type `{0}`")]
pub struct UnknownValueType(pub String);

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "null" | "nil" => Ok(Self::Null),
            "boolean" | "bool" => Ok(Self::Boolean),
            "integer" | "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "string" | "str" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            _ => Err(UnknownValueType(s.to_owned())),
        }
    }
}

/// Returns `Some(true)` when `value` is empty, `Some(false)` when it is not,
/// and `None` when its type has no notion of emptiness.
pub(crate) fn emptiness(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) => Some(s.is_empty()),
        Value::Array(items) => Some(items.is_empty()),
        Value::Object(map) => Some(map.is_empty()),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}
