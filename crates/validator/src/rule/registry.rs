//! Per-type rule storage.
//!
//! Each entity type owns exactly one [`RuleRegistry`], shared by all of its
//! instances. Rules are appended at type-definition time and enumerated, in
//! declaration order, at evaluation time.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::foundation::Validatable;
use crate::rule::{Conditions, Rule};

/// Ordered collection of the rules declared for one entity type.
///
/// Registration is protected by an `RwLock` so it can happen concurrently
/// with reads. Enumeration hands out a snapshot, so evaluation never holds
/// the lock while an entity's accessor runs.
///
/// # Examples
///
/// ```rust
/// use vigil_validator::foundation::ValueType;
/// use vigil_validator::rule::{Condition, RuleRegistry};
///
/// let registry = RuleRegistry::new()
///     .with_rule("name", Condition::presence())
///     .with_rule("owner", Condition::of_type(ValueType::Integer));
///
/// let attributes: Vec<_> = registry.attributes();
/// assert_eq!(attributes, ["name", "owner"]);
/// ```
pub struct RuleRegistry {
    rules: RwLock<Vec<Arc<Rule>>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Appends a rule for `attribute`.
    ///
    /// The attribute name is not checked here; a name the entity does not
    /// have surfaces when the rule is evaluated. Several rules may target the
    /// same attribute and are evaluated independently.
    pub fn register(&self, attribute: impl Into<String>, conditions: impl Into<Conditions>) {
        self.push(Rule::new(attribute, conditions));
    }

    /// Appends an already built rule.
    pub fn push(&self, rule: Rule) {
        tracing::debug!(
            attribute = rule.attribute(),
            clauses = rule.conditions().len(),
            "registered validation rule"
        );
        self.rules.write().push(Arc::new(rule));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rule(self, attribute: impl Into<String>, conditions: impl Into<Conditions>) -> Self {
        self.register(attribute, conditions);
        self
    }

    /// Snapshot of all rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> Vec<Arc<Rule>> {
        self.rules.read().clone()
    }

    /// Declared attribute names in declaration order, duplicates included.
    #[must_use]
    pub fn attributes(&self) -> Vec<String> {
        self.rules
            .read()
            .iter()
            .map(|rule| rule.attribute().to_owned())
            .collect()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns true if no rule has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &*self.rules.read())
            .finish()
    }
}

impl FromIterator<Rule> for RuleRegistry {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let registry = Self::new();
        for rule in iter {
            registry.push(rule);
        }
        registry
    }
}

/// Rules declared for entity type `T`, in declaration order.
#[must_use]
pub fn rules_for<T: Validatable>() -> Vec<Arc<Rule>> {
    T::rules().rules()
}
