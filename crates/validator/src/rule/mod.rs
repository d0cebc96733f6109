//! Rules and their condition clauses.
//!
//! A [`Rule`] binds one attribute name to an ordered set of [`Conditions`].
//! Each [`Condition`] is a single clause of one [`RuleKind`]:
//!
//! - **Presence**: the value must be set and non-empty
//! - **Format**: the value's text must match a regular expression
//! - **Type**: the value's runtime type must be exactly the expected one
//!
//! # Examples
//!
//! ```rust
//! use vigil_validator::rule::{Condition, Conditions, Rule};
//!
//! let rule = Rule::new(
//!     "number",
//!     Conditions::new()
//!         .with(Condition::format(r"^[A-Z\-]{0,3}$")?)
//!         .with(Condition::presence()),
//! );
//! assert_eq!(rule.attribute(), "number");
//! assert_eq!(rule.conditions().len(), 2);
//! # Ok::<(), regex::Error>(())
//! ```

#[cfg(feature = "serde")]
pub mod declaration;
pub mod registry;

pub use registry::{RuleRegistry, rules_for};

use std::fmt;

use regex::Regex;
use smallvec::SmallVec;

use crate::foundation::ValueType;

// ============================================================================
// RULE KIND
// ============================================================================

/// Category of a condition clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Value must be set and, for strings and collections, non-empty.
    Presence,
    /// Value must match a pattern.
    Format,
    /// Value must be of an exact type.
    Type,
}

impl RuleKind {
    /// Key used for this kind in declarations and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Format => "format",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CONDITION
// ============================================================================

/// One condition clause of a rule.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Presence check. `false` disables the check.
    Presence(bool),
    /// Pattern the value's text must match. Applied as given, so the
    /// pattern has to anchor itself to constrain the whole value.
    Format(Regex),
    /// Exact type the value must have.
    Type(ValueType),
    /// A clause of a kind this engine does not know.
    ///
    /// Only loose, string-keyed declarations produce this. Evaluating it is a
    /// configuration error.
    Unrecognized {
        /// The declared kind.
        kind: String,
        /// The declared parameter, kept for error reporting.
        parameter: serde_json::Value,
    },
}

impl Condition {
    /// An enabled presence check.
    #[must_use]
    pub const fn presence() -> Self {
        Self::Presence(true)
    }

    /// Compiles `pattern` into a format check.
    pub fn format(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Format(Regex::new(pattern)?))
    }

    /// A format check with an already compiled pattern.
    #[must_use]
    pub fn matching(pattern: Regex) -> Self {
        Self::Format(pattern)
    }

    /// An exact type check.
    #[must_use]
    pub const fn of_type(expected: ValueType) -> Self {
        Self::Type(expected)
    }

    /// A clause of an arbitrary, possibly unknown, kind.
    ///
    /// Inside [`Conditions`] it cannot displace a known clause declared under
    /// the same key.
    pub fn unrecognized(kind: impl Into<String>, parameter: impl Into<serde_json::Value>) -> Self {
        Self::Unrecognized {
            kind: kind.into(),
            parameter: parameter.into(),
        }
    }

    /// The clause kind, or `None` for an unrecognized clause.
    #[must_use]
    pub const fn kind(&self) -> Option<RuleKind> {
        match self {
            Self::Presence(_) => Some(RuleKind::Presence),
            Self::Format(_) => Some(RuleKind::Format),
            Self::Type(_) => Some(RuleKind::Type),
            Self::Unrecognized { .. } => None,
        }
    }

    /// The key this clause is declared under.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Unrecognized { kind, .. } => kind,
            known => known.kind().map_or("", RuleKind::as_str),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Presence(a), Self::Presence(b)) => a == b,
            (Self::Format(a), Self::Format(b)) => a.as_str() == b.as_str(),
            (Self::Type(a), Self::Type(b)) => a == b,
            (
                Self::Unrecognized {
                    kind: ka,
                    parameter: pa,
                },
                Self::Unrecognized {
                    kind: kb,
                    parameter: pb,
                },
            ) => ka == kb && pa == pb,
            _ => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presence(enabled) => write!(f, "presence: {enabled}"),
            Self::Format(pattern) => write!(f, "format: /{}/", pattern.as_str()),
            Self::Type(expected) => write!(f, "type: {expected}"),
            Self::Unrecognized { kind, parameter } => write!(f, "{kind}: {parameter}"),
        }
    }
}

// ============================================================================
// CONDITIONS
// ============================================================================

/// Ordered mapping from clause key to clause.
///
/// Keys are unique: adding a clause whose key is already present replaces the
/// existing clause in place, keeping its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    clauses: SmallVec<[Condition; 2]>,
}

impl Conditions {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a clause.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, condition: Condition) -> Self {
        self.insert(condition);
        self
    }

    /// Adds or replaces a clause in place.
    ///
    /// An unrecognized clause never replaces a known one under the same key;
    /// it is dropped and the known clause stays.
    pub fn insert(&mut self, condition: Condition) {
        match self.clauses.iter_mut().find(|c| c.key() == condition.key()) {
            Some(existing) if existing.kind().is_some() && condition.kind().is_none() => {
                tracing::warn!(
                    key = condition.key(),
                    "ignoring unrecognized clause shadowing a known kind"
                );
            }
            Some(existing) => *existing = condition,
            None => self.clauses.push(condition),
        }
    }

    /// Looks up the clause of a known kind.
    #[must_use]
    pub fn get(&self, kind: RuleKind) -> Option<&Condition> {
        self.clauses.iter().find(|c| c.kind() == Some(kind))
    }

    /// Clauses in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.clauses.iter()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if there are no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut conditions = Self::new();
        for condition in iter {
            conditions.insert(condition);
        }
        conditions
    }
}

impl From<Condition> for Conditions {
    fn from(condition: Condition) -> Self {
        Self::new().with(condition)
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, condition) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{condition}")?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A binding of one attribute name to its condition clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    attribute: String,
    conditions: Conditions,
}

impl Rule {
    /// Creates a rule for `attribute`.
    pub fn new(attribute: impl Into<String>, conditions: impl Into<Conditions>) -> Self {
        Self {
            attribute: attribute.into(),
            conditions: conditions.into(),
        }
    }

    /// Name of the attribute this rule reads.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The rule's clauses, in declaration order.
    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute, self.conditions)
    }
}
