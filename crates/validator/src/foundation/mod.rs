//! Core validation types and traits
//!
//! This module contains the building blocks the engine works with:
//!
//! - **Traits**: [`Attributes`], [`Validatable`]
//! - **Values**: [`ValueType`], the exact-type descriptor used by `Type` rules
//! - **Errors**: [`ValidationError`], [`ValidationErrors`], [`RuleError`],
//!   [`AttributeError`], [`Error`]
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use vigil_validator::foundation::{Attributes, ValueType};
//!
//! let record = json!({ "owner": 1 });
//! let owner = record.attribute("owner").unwrap();
//! assert_eq!(ValueType::of(&owner), ValueType::Integer);
//! ```

pub mod error;
pub mod traits;
pub mod value;

pub use error::{AttributeError, Error, Result, RuleError, ValidationError, ValidationErrors};
pub use traits::{Attributes, Validatable};
pub use value::{UnknownValueType, ValueType};

/// Common imports for working with the foundation types.
pub mod prelude {
    pub use super::{
        AttributeError, Attributes, Error, RuleError, Validatable, ValidationError,
        ValidationErrors, ValueType,
    };
}
