//! # vigil-validator
//!
//! Declarative, per-attribute validation rules for entity types.
//!
//! An entity type declares its rules once, at definition time, in a registry
//! shared by all of its instances. Instances are then checked either as a
//! boolean verdict or as a fail-fast assertion that names the failing rule.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::borrow::Cow;
//! use serde_json::Value;
//! use vigil_validator::prelude::*;
//!
//! struct User {
//!     name: Option<String>,
//!     owner: Value,
//! }
//!
//! impl Attributes for User {
//!     fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
//!         match name {
//!             "name" => Ok(Cow::Owned(Value::from(self.name.clone()))),
//!             "owner" => Ok(Cow::Borrowed(&self.owner)),
//!             other => Err(AttributeError::Unknown(other.to_owned())),
//!         }
//!     }
//! }
//!
//! vigil_validator::rules! {
//!     User {
//!         name: [Condition::presence()],
//!         owner: [Condition::of_type(ValueType::Integer)],
//!     }
//! }
//!
//! let user = User { name: Some("aaa".into()), owner: Value::from(1) };
//! assert_eq!(user.is_valid(), Ok(true));
//!
//! let user = User { name: Some(String::new()), owner: Value::from(1) };
//! let error = user.validate().unwrap_err();
//! assert_eq!(error.attribute(), "name");
//! ```
//!
//! ## Rule kinds
//!
//! - **Presence**: [`Condition::presence`](rule::Condition::presence)
//! - **Format**: [`Condition::format`](rule::Condition::format)
//! - **Type**: [`Condition::of_type`](rule::Condition::of_type)
//!
//! ## Errors
//!
//! Invalid data and broken rules are different errors:
//! [`ValidationError`](foundation::ValidationError) versus
//! [`RuleError`](foundation::RuleError). The boolean check only ever answers
//! `false` for the former.

// ValidationError carries the whole rule; boxing it would only add indirection.
#![allow(clippy::result_large_err)]

pub mod engine;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod rule;
