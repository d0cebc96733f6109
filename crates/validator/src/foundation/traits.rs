//! Traits implemented by validated entities.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::engine::ValidationEngine;
use crate::foundation::{AttributeError, Error, RuleError, ValidationErrors, ValueType};
use crate::rule::RuleRegistry;

// ============================================================================
// ATTRIBUTE ACCESS
// ============================================================================

/// Read access to an entity's attributes by name.
///
/// The engine calls this once per rule, every evaluation, so the value seen
/// is always the current one. Return `Value::Null` for an attribute that
/// exists but is unset, and an error for a name the entity does not have.
///
/// # Examples
///
/// ```rust
/// use std::borrow::Cow;
/// use serde_json::Value;
/// use vigil_validator::foundation::{AttributeError, Attributes};
///
/// struct Point { x: i64 }
///
/// impl Attributes for Point {
///     fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
///         match name {
///             "x" => Ok(Cow::Owned(Value::from(self.x))),
///             other => Err(AttributeError::Unknown(other.to_owned())),
///         }
///     }
/// }
///
/// assert_eq!(Point { x: 3 }.attribute("x").unwrap().as_i64(), Some(3));
/// ```
pub trait Attributes {
    /// Returns the current value of attribute `name`.
    fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError>;
}

/// Missing keys read as `Null`.
impl Attributes for Map<String, Value> {
    fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
        Ok(self
            .get(name)
            .map_or(Cow::Owned(Value::Null), Cow::Borrowed))
    }
}

impl Attributes for Value {
    fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
        match self {
            Value::Object(map) => map.attribute(name),
            other => Err(AttributeError::NotAnObject {
                attribute: name.to_owned(),
                found: ValueType::of(other),
            }),
        }
    }
}

impl<T: Attributes + ?Sized> Attributes for &T {
    fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
        (**self).attribute(name)
    }
}

// ============================================================================
// VALIDATABLE
// ============================================================================

/// An entity type that owns a rule registry.
///
/// The registry is shared by every instance of the type. Declare it once, in
/// a `static`, usually through the [`rules!`](crate::rules) macro.
///
/// # Examples
///
/// ```rust
/// use vigil_validator::prelude::*;
///
/// let user: serde_json::Map<String, serde_json::Value> =
///     serde_json::from_str(r#"{ "name": "" }"#).unwrap();
///
/// struct User(serde_json::Map<String, serde_json::Value>);
///
/// impl Attributes for User {
///     fn attribute(&self, name: &str) -> Result<std::borrow::Cow<'_, serde_json::Value>, AttributeError> {
///         self.0.attribute(name)
///     }
/// }
///
/// vigil_validator::rules! {
///     User {
///         name: [Condition::presence()],
///     }
/// }
///
/// let user = User(user);
/// assert!(!user.is_valid().unwrap());
/// assert!(user.validate().unwrap_err().is_invalid());
/// ```
pub trait Validatable: Attributes {
    /// The rules declared for this type.
    fn rules() -> &'static RuleRegistry;

    /// Returns `Ok(true)` if every rule holds.
    ///
    /// Validation failures are `Ok(false)`; only broken rules or accessors
    /// produce an error.
    fn is_valid(&self) -> Result<bool, RuleError>
    where
        Self: Sized,
    {
        ValidationEngine::new(Self::rules()).is_valid(self)
    }

    /// Fails on the first rule that does not hold.
    fn validate(&self) -> Result<(), Error>
    where
        Self: Sized,
    {
        ValidationEngine::new(Self::rules()).assert_valid(self)
    }

    /// Collects every rule that does not hold.
    fn violations(&self) -> Result<ValidationErrors, RuleError>
    where
        Self: Sized,
    {
        ValidationEngine::new(Self::rules()).violations(self)
    }
}
