//! Rule sets declared as data.
//!
//! A declaration is a JSON document listing rules in order. Condition keys
//! keep their document order:
//!
//! ```json
//! { "rules": [
//!   { "attribute": "name",   "conditions": { "presence": true } },
//!   { "attribute": "number", "conditions": { "format": "^[A-Z\\-]{0,3}$", "presence": true } },
//!   { "attribute": "owner",  "conditions": { "type": "integer" } }
//! ] }
//! ```
//!
//! Malformed parameters of known kinds are rejected while loading. Unknown
//! kinds are kept as [`Condition::Unrecognized`] and fail when evaluated.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::foundation::ValueType;
use crate::rule::{Condition, Conditions, Rule, RuleKind, RuleRegistry};

/// Error raised while turning a declaration into rules.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DeclarationError {
    /// The document is not a valid declaration.
    #[error("invalid rule declaration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `format` pattern did not compile.
    #[error("invalid format pattern for attribute `{attribute}`")]
    Pattern {
        /// Attribute the clause was declared for.
        attribute: String,
        /// The regex compiler's error.
        #[source]
        source: regex::Error,
    },

    /// A `type` clause names no known type.
    #[error("unknown type `{name}` for attribute `{attribute}`")]
    UnknownType {
        /// Attribute the clause was declared for.
        attribute: String,
        /// The declared type name.
        name: String,
    },

    /// A parameter has the wrong shape for its kind.
    #[error("{kind} parameter for attribute `{attribute}` must be {expected}, got {found}")]
    InvalidParameter {
        /// Attribute the clause was declared for.
        attribute: String,
        /// The clause kind.
        kind: RuleKind,
        /// What the parameter should have been.
        expected: &'static str,
        /// What it was.
        found: ValueType,
    },
}

/// A whole rule set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDeclaration {
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleDeclaration>,
}

/// One declared rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDeclaration {
    /// Attribute the rule reads.
    pub attribute: String,
    /// Clause key to parameter, in declaration order.
    pub conditions: Map<String, Value>,
}

impl RuleDeclaration {
    /// Builds the rule, parsing each clause parameter.
    pub fn into_rule(self) -> Result<Rule, DeclarationError> {
        let conditions = self
            .conditions
            .into_iter()
            .map(|(key, parameter)| parse_condition(&self.attribute, key, parameter))
            .collect::<Result<Conditions, _>>()?;
        Ok(Rule::new(self.attribute, conditions))
    }
}

impl RuleSetDeclaration {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, DeclarationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds every rule, in order. Fails on the first malformed clause.
    pub fn into_rules(self) -> Result<Vec<Rule>, DeclarationError> {
        self.rules.into_iter().map(RuleDeclaration::into_rule).collect()
    }
}

impl RuleRegistry {
    /// Builds a registry from a JSON declaration.
    pub fn from_json_str(json: &str) -> Result<Self, DeclarationError> {
        let registry = Self::new();
        registry.load(RuleSetDeclaration::from_json_str(json)?)?;
        Ok(registry)
    }

    /// Appends every declared rule and returns how many were added.
    ///
    /// All rules are built before any is registered, so a malformed
    /// declaration leaves the registry untouched.
    pub fn load(&self, declaration: RuleSetDeclaration) -> Result<usize, DeclarationError> {
        let rules = declaration.into_rules()?;
        let count = rules.len();
        for rule in rules {
            self.push(rule);
        }
        Ok(count)
    }
}

fn parse_condition(
    attribute: &str,
    key: String,
    parameter: Value,
) -> Result<Condition, DeclarationError> {
    match key.as_str() {
        "presence" => Ok(Condition::Presence(is_truthy(&parameter))),
        "format" => {
            let pattern = expect_str(attribute, RuleKind::Format, &parameter)?;
            Condition::format(pattern).map_err(|source| DeclarationError::Pattern {
                attribute: attribute.to_owned(),
                source,
            })
        }
        "type" => {
            let name = expect_str(attribute, RuleKind::Type, &parameter)?;
            name.parse()
                .map(Condition::Type)
                .map_err(|_| DeclarationError::UnknownType {
                    attribute: attribute.to_owned(),
                    name: name.to_owned(),
                })
        }
        _ => Ok(Condition::Unrecognized {
            kind: key,
            parameter,
        }),
    }
}

/// Everything except `null` and `false` enables a clause.
fn is_truthy(parameter: &Value) -> bool {
    !matches!(parameter, Value::Null | Value::Bool(false))
}

fn expect_str<'a>(
    attribute: &str,
    kind: RuleKind,
    parameter: &'a Value,
) -> Result<&'a str, DeclarationError> {
    parameter
        .as_str()
        .ok_or_else(|| DeclarationError::InvalidParameter {
            attribute: attribute.to_owned(),
            kind,
            expected: "a string",
            found: ValueType::of(parameter),
        })
}
