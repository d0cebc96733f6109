//! Rule evaluation.
//!
//! [`ValidationEngine`] walks a [`RuleRegistry`] in declaration order and
//! reads each rule's attribute from the entity as it goes. Within a rule,
//! clauses run in declaration order and the first failing clause ends the
//! rule. Two contracts sit on top of that walk:
//!
//! - [`is_valid`](ValidationEngine::is_valid) stops at the first failing rule
//!   and answers `false`.
//! - [`assert_valid`](ValidationEngine::assert_valid) stops at the first
//!   failing rule and reports it as a [`ValidationError`].
//!
//! Broken configuration ([`RuleError`]) is never reported as invalid data.

use regex::Regex;
use serde_json::Value;

use crate::foundation::value::emptiness;
use crate::foundation::{
    Attributes, Error, RuleError, Validatable, ValidationError, ValidationErrors, ValueType,
};
use crate::rule::{Condition, Rule, RuleKind, RuleRegistry};

/// Evaluates entities against a registry.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use vigil_validator::engine::ValidationEngine;
/// use vigil_validator::rule::{Condition, RuleRegistry};
///
/// let registry = RuleRegistry::new().with_rule("name", Condition::presence());
/// let engine = ValidationEngine::new(&registry);
///
/// assert_eq!(engine.is_valid(&json!({ "name": "aaa" })), Ok(true));
/// assert_eq!(engine.is_valid(&json!({ "name": "" })), Ok(false));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'r> {
    registry: &'r RuleRegistry,
}

impl<'r> ValidationEngine<'r> {
    /// Creates an engine over `registry`.
    #[must_use]
    pub const fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    /// The registry this engine reads.
    #[must_use]
    pub const fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    /// Returns `Ok(true)` if every rule holds for `entity`.
    ///
    /// Stops at the first failing rule. Only configuration and accessor
    /// defects are returned as errors.
    pub fn is_valid<E>(&self, entity: &E) -> Result<bool, RuleError>
    where
        E: Attributes + ?Sized,
    {
        for rule in self.registry.rules() {
            if check_rule(&rule, entity)?.is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fails with the first rule that does not hold for `entity`.
    pub fn assert_valid<E>(&self, entity: &E) -> Result<(), Error>
    where
        E: Attributes + ?Sized,
    {
        for rule in self.registry.rules() {
            if let Some(error) = check_rule(&rule, entity)? {
                return Err(error.into());
            }
        }
        Ok(())
    }

    /// Evaluates every rule and collects all failures in declaration order.
    ///
    /// Each rule still stops at its own first failing clause. A configuration
    /// or accessor defect aborts the whole evaluation.
    pub fn violations<E>(&self, entity: &E) -> Result<ValidationErrors, RuleError>
    where
        E: Attributes + ?Sized,
    {
        let mut errors = ValidationErrors::new();
        for rule in self.registry.rules() {
            if let Some(error) = check_rule(&rule, entity)? {
                errors.add(error);
            }
        }
        Ok(errors)
    }
}

impl ValidationEngine<'static> {
    /// Engine over the registry of entity type `T`.
    #[must_use]
    pub fn of<T: Validatable>() -> Self {
        Self::new(T::rules())
    }
}

/// Evaluates one rule. `Ok(None)` means it holds.
fn check_rule<E>(rule: &Rule, entity: &E) -> Result<Option<ValidationError>, RuleError>
where
    E: Attributes + ?Sized,
{
    let attribute = rule.attribute();
    tracing::trace!(attribute, "evaluating validation rule");

    let value = entity
        .attribute(attribute)
        .map_err(|source| RuleError::Attribute {
            attribute: attribute.to_owned(),
            source,
        })
        .inspect_err(|e| tracing::warn!(attribute, error = %e, "validation aborted"))?;

    for condition in rule.conditions() {
        let failed = check_condition(attribute, condition, &value)
            .inspect_err(|e| tracing::warn!(attribute, error = %e, "validation aborted"))?;

        if let Some(kind) = failed {
            tracing::debug!(attribute, clause = %kind, "validation rule failed");
            return Ok(Some(ValidationError::new(
                attribute,
                rule.conditions().clone(),
                kind,
                value.into_owned(),
            )));
        }
    }

    Ok(None)
}

/// Evaluates one clause against a value. `Ok(Some(kind))` means it failed.
fn check_condition(
    attribute: &str,
    condition: &Condition,
    value: &Value,
) -> Result<Option<RuleKind>, RuleError> {
    let (kind, holds) = match condition {
        Condition::Presence(enabled) => (
            RuleKind::Presence,
            !enabled || is_present(attribute, value)?,
        ),
        Condition::Format(pattern) => (
            RuleKind::Format,
            matches_format(attribute, pattern, value)?,
        ),
        Condition::Type(expected) => (RuleKind::Type, ValueType::of(value) == *expected),
        Condition::Unrecognized { kind, .. } => {
            return Err(RuleError::UnrecognizedKind {
                attribute: attribute.to_owned(),
                kind: kind.clone(),
            });
        }
    };
    Ok((!holds).then_some(kind))
}

/// Unset values are absent; strings and collections must also be non-empty.
fn is_present(attribute: &str, value: &Value) -> Result<bool, RuleError> {
    if value.is_null() {
        return Ok(false);
    }
    emptiness(value)
        .map(|empty| !empty)
        .ok_or_else(|| unsupported(attribute, RuleKind::Presence, value))
}

/// An unset value cannot match; other non-text values are misuse.
fn matches_format(attribute: &str, pattern: &Regex, value: &Value) -> Result<bool, RuleError> {
    match value {
        Value::String(text) => Ok(pattern.is_match(text)),
        Value::Null => Ok(false),
        other => Err(unsupported(attribute, RuleKind::Format, other)),
    }
}

fn unsupported(attribute: &str, kind: RuleKind, value: &Value) -> RuleError {
    RuleError::Unsupported {
        attribute: attribute.to_owned(),
        kind,
        found: ValueType::of(value),
    }
}
