//! Prelude module for convenient imports.
//!
//! Provides a single `use vigil_validator::prelude::*;` import that brings
//! in the traits, rule types, engine and errors needed to declare and check
//! rules.

pub use crate::engine::ValidationEngine;
pub use crate::foundation::{
    AttributeError, Attributes, Error, RuleError, Validatable, ValidationError, ValidationErrors,
    ValueType,
};
pub use crate::rule::{Condition, Conditions, Rule, RuleKind, RuleRegistry, rules_for};

#[cfg(feature = "serde")]
pub use crate::rule::declaration::{DeclarationError, RuleDeclaration, RuleSetDeclaration};
