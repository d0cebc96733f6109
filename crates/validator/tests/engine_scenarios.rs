//! End-to-end checks of rule declaration and evaluation on typed entities.

use std::borrow::Cow;
use std::cell::Cell;
use std::sync::LazyLock;

use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::{Value, json};
use vigil_validator::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

/// One letter, a hyphen, then up to three letters.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]-[A-Z]{0,3}$").unwrap());

#[derive(Default)]
struct User {
    name: Option<String>,
    number: Option<String>,
    owner: Value,
}

impl Attributes for User {
    fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
        match name {
            "name" => Ok(Cow::Owned(Value::from(self.name.clone()))),
            "number" => Ok(Cow::Owned(Value::from(self.number.clone()))),
            "owner" => Ok(Cow::Borrowed(&self.owner)),
            other => Err(AttributeError::Unknown(other.to_owned())),
        }
    }
}

vigil_validator::rules! {
    User {
        name: [Condition::presence()],
        number: [Condition::matching(NUMBER_PATTERN.clone()), Condition::presence()],
        owner: [Condition::of_type(ValueType::Integer)],
    }
}

fn user(name: &str, number: &str, owner: Value) -> User {
    User {
        name: Some(name.into()),
        number: Some(number.into()),
        owner,
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Entity whose accessor counts reads, to observe short-circuiting.
struct Counting {
    values: serde_json::Map<String, Value>,
    reads: Cell<usize>,
}

impl Counting {
    fn new(values: Value) -> Self {
        let Value::Object(values) = values else {
            panic!("fixture must be an object");
        };
        Self {
            values,
            reads: Cell::new(0),
        }
    }
}

impl Attributes for Counting {
    fn attribute(&self, name: &str) -> Result<Cow<'_, Value>, AttributeError> {
        self.reads.set(self.reads.get() + 1);
        self.values.attribute(name)
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn valid_user_passes_both_contracts() {
    init_tracing();
    let user = user("aaa", "A-ZZZ", json!(1));

    assert_eq!(user.is_valid(), Ok(true));
    assert_eq!(user.validate(), Ok(()));
    assert!(user.violations().unwrap().is_empty());
}

#[test]
fn first_failing_rule_is_reported() {
    init_tracing();
    let user = user("A-ZZZ", "B", json!(1));

    assert_eq!(user.is_valid(), Ok(false));

    let error = user.validate().unwrap_err();
    let invalid = error.as_invalid().expect("validation failure");
    assert_eq!(invalid.attribute(), "number");
    assert_eq!(invalid.failed_clause(), RuleKind::Format);
    assert_eq!(invalid.value(), &json!("B"));
    assert_eq!(
        error.to_string(),
        "number validation failed, {format: /^[A-Z]-[A-Z]{0,3}$/, presence: true} mismatch"
    );
}

#[test]
fn rules_run_in_declaration_order() {
    // Both `name` and `owner` are wrong; `name` is declared first.
    let user = User {
        name: None,
        number: Some("A-B".into()),
        owner: json!(1.0),
    };

    assert_eq!(user.validate().unwrap_err().attribute(), "name");
    assert_eq!(
        user.violations().unwrap().attributes().collect::<Vec<_>>(),
        ["name", "owner"]
    );
}

#[test]
fn owner_type_is_exact() {
    assert_eq!(user("a", "A-", json!(1)).is_valid(), Ok(true));
    assert_eq!(user("a", "A-", json!(1.0)).is_valid(), Ok(false));
    assert_eq!(user("a", "A-", json!("1")).is_valid(), Ok(false));
}

#[test]
fn unset_user_is_invalid_not_broken() {
    let user = User::default();
    assert_eq!(user.is_valid(), Ok(false));
    assert!(user.validate().unwrap_err().is_invalid());
}

#[test]
fn values_are_read_at_evaluation_time() {
    let mut user = user("aaa", "B", json!(1));
    assert_eq!(user.is_valid(), Ok(false));

    user.number = Some("C-D".into());
    assert_eq!(user.is_valid(), Ok(true));
}

#[test]
fn rules_are_shared_by_every_instance() {
    assert_eq!(rules_for::<User>().len(), 3);
    assert!(std::ptr::eq(User::rules(), ValidationEngine::of::<User>().registry()));
}

// ============================================================================
// SHORT-CIRCUIT
// ============================================================================

#[test]
fn boolean_check_stops_at_first_failing_rule() {
    let registry = RuleRegistry::new()
        .with_rule("first", Condition::presence())
        .with_rule("second", Condition::presence())
        .with_rule("third", Condition::presence());
    let engine = ValidationEngine::new(&registry);

    let entity = Counting::new(json!({ "first": "", "second": "x", "third": "x" }));
    assert_eq!(engine.is_valid(&entity), Ok(false));
    assert_eq!(entity.reads.get(), 1);

    let entity = Counting::new(json!({ "first": "x", "second": "x", "third": "x" }));
    assert_eq!(engine.is_valid(&entity), Ok(true));
    assert_eq!(entity.reads.get(), 3);
}

#[test]
fn assertion_stops_at_first_failing_rule() {
    let registry = RuleRegistry::new()
        .with_rule("first", Condition::presence())
        .with_rule("second", Condition::unrecognized("bogus", true));
    let engine = ValidationEngine::new(&registry);

    // The broken second rule is never reached.
    let entity = Counting::new(json!({ "first": null }));
    assert!(engine.assert_valid(&entity).unwrap_err().is_invalid());
    assert_eq!(entity.reads.get(), 1);
}

#[test]
fn collect_all_reads_every_rule() {
    let registry = RuleRegistry::new()
        .with_rule("first", Condition::presence())
        .with_rule("second", Condition::presence());
    let entity = Counting::new(json!({}));

    let errors = ValidationEngine::new(&registry).violations(&entity).unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(entity.reads.get(), 2);
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[test]
fn empty_registry_accepts_anything() {
    let registry = RuleRegistry::new();
    let engine = ValidationEngine::new(&registry);

    assert_eq!(engine.is_valid(&json!({})), Ok(true));
    assert_eq!(engine.assert_valid(&json!({ "x": null })), Ok(()));
    assert_eq!(engine.is_valid(&User::default()), Ok(true));
}

#[test]
fn unrecognized_kind_is_fatal_not_false() {
    init_tracing();
    let registry = RuleRegistry::new().with_rule("name", Condition::unrecognized("bogus", true));
    let engine = ValidationEngine::new(&registry);
    let entity = json!({ "name": "aaa" });

    let expected = RuleError::UnrecognizedKind {
        attribute: "name".into(),
        kind: "bogus".into(),
    };
    assert_eq!(engine.is_valid(&entity), Err(expected.clone()));
    assert_eq!(engine.assert_valid(&entity), Err(Error::Rule(expected)));
}

#[test]
fn accessor_failure_propagates() {
    let registry = RuleRegistry::new().with_rule("email", Condition::presence());
    let engine = ValidationEngine::new(&registry);

    let error = engine.is_valid(&user("a", "A-", json!(1))).unwrap_err();
    assert_eq!(
        error,
        RuleError::Attribute {
            attribute: "email".into(),
            source: AttributeError::Unknown("email".into()),
        }
    );
    assert!(engine.violations(&User::default()).is_err());
}

#[test]
fn presence_on_number_is_misuse() {
    let registry = RuleRegistry::new().with_rule("owner", Condition::presence());
    let error = ValidationEngine::new(&registry)
        .assert_valid(&user("a", "A-", json!(7)))
        .unwrap_err();

    assert!(error.is_rule_error());
    assert_eq!(
        error.to_string(),
        "presence rule cannot be applied to integer value of attribute `owner`"
    );
}
