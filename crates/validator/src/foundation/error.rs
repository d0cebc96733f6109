//! Error types for rule evaluation.
//!
//! Two disjoint classes are kept apart:
//!
//! - [`ValidationError`]: the data is invalid. Expected and recoverable.
//! - [`RuleError`]: the rules or the entity's attribute wiring are broken.
//!   This is a programming defect and is never folded into a `false` verdict.
//!
//! [`Error`] is the union of both, returned by the fail-fast assertion.

use std::fmt;

use serde_json::Value;

use crate::foundation::ValueType;
use crate::rule::{Conditions, RuleKind};

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A rule that did not hold for an instance.
///
/// Carries the whole rule context (attribute name and every clause of the
/// rule), plus the clause that failed and the value that was read.
///
/// # Examples
///
/// ```rust,ignore
/// match user.validate() {
///     Err(Error::Invalid(err)) => eprintln!("{}: {}", err.attribute(), err),
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{attribute} validation failed, {conditions} mismatch")]
pub struct ValidationError {
    attribute: String,
    conditions: Conditions,
    failed: RuleKind,
    value: Value,
}

impl ValidationError {
    /// Creates an error for `attribute` whose `failed` clause rejected `value`.
    pub fn new(
        attribute: impl Into<String>,
        conditions: Conditions,
        failed: RuleKind,
        value: Value,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            conditions,
            failed,
            value,
        }
    }

    /// Name of the attribute whose rule failed.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// All clauses of the failing rule.
    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// The clause that failed.
    #[must_use]
    pub fn failed_clause(&self) -> RuleKind {
        self.failed
    }

    /// The attribute value that was checked.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Error code for programmatic handling, e.g. `"presence"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.failed.as_str()
    }
}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// Every failing rule of one evaluation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error to the collection.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns all errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Names of the failing attributes, in order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(ValidationError::attribute)
    }

    /// Converts to a Result.
    #[must_use = "result must be used"]
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// ATTRIBUTE ERROR
// ============================================================================

/// Failure of an entity's attribute accessor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AttributeError {
    /// The entity has no attribute with this name.
    #[error("unknown attribute `{0}`")]
    Unknown(String),

    /// The entity is not a keyed object.
    #[error("cannot read attribute `{attribute}` from a {found} value")]
    NotAnObject {
        /// The attribute that was requested.
        attribute: String,
        /// What the entity actually was.
        found: ValueType,
    },

    /// Any other accessor failure.
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// RULE ERROR
// ============================================================================

/// A defect in the rules themselves or in the entity's accessor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// A clause of a kind the engine does not know was evaluated.
    #[error("unrecognized rule kind `{kind}` declared for attribute `{attribute}`")]
    UnrecognizedKind {
        /// Attribute the clause was declared for.
        attribute: String,
        /// The unknown kind.
        kind: String,
    },

    /// A clause was applied to a value it has no meaning for,
    /// e.g. presence on a number or format on a boolean.
    #[error("{kind} rule cannot be applied to {found} value of attribute `{attribute}`")]
    Unsupported {
        /// Attribute whose value was read.
        attribute: String,
        /// The clause kind.
        kind: RuleKind,
        /// Type of the value that was read.
        found: ValueType,
    },

    /// The entity failed to produce an attribute value.
    #[error("failed to read attribute `{attribute}`")]
    Attribute {
        /// The attribute that was requested.
        attribute: String,
        /// The accessor's error.
        #[source]
        source: AttributeError,
    },
}

impl RuleError {
    /// Name of the attribute involved.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::UnrecognizedKind { attribute, .. }
            | Self::Unsupported { attribute, .. }
            | Self::Attribute { attribute, .. } => attribute,
        }
    }
}

// ============================================================================
// ERROR
// ============================================================================

/// Result of a fail-fast assertion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The data does not satisfy a rule.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The rules or the accessor are broken.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl Error {
    /// Returns true if this is a data validation failure.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Returns true if this is a configuration or accessor defect.
    #[must_use]
    pub fn is_rule_error(&self) -> bool {
        matches!(self, Self::Rule(_))
    }

    /// The validation failure, if this is one.
    #[must_use]
    pub fn as_invalid(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Rule(_) => None,
        }
    }

    /// Name of the attribute involved.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::Invalid(err) => err.attribute(),
            Self::Rule(err) => err.attribute(),
        }
    }
}

/// Result of a fail-fast assertion.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// TESTS
// ============================================================================
