//! Macros for declaring an entity type's rules.

/// Declares the rules of an entity type and implements
/// [`Validatable`](crate::foundation::Validatable) for it.
///
/// The registry lives in a `static` initialized on first use, so every
/// instance of the type shares it. Each entry is an attribute name followed by
/// the rule's clauses in evaluation order. An attribute may appear more than
/// once; each entry becomes its own rule.
///
/// The type must already implement [`Attributes`](crate::foundation::Attributes).
///
/// # Examples
///
/// ```rust,ignore
/// vigil_validator::rules! {
///     User {
///         name: [Condition::presence()],
///         number: [
///             Condition::matching(NUMBER_PATTERN.clone()),
///             Condition::presence(),
///         ],
///         owner: [Condition::of_type(ValueType::Integer)],
///     }
/// }
/// ```
#[macro_export]
macro_rules! rules {
    (
        $ty:ty {
            $( $attr:ident : [ $( $condition:expr ),+ $(,)? ] ),* $(,)?
        }
    ) => {
        impl $crate::foundation::Validatable for $ty {
            fn rules() -> &'static $crate::rule::RuleRegistry {
                static RULES: ::std::sync::LazyLock<$crate::rule::RuleRegistry> =
                    ::std::sync::LazyLock::new(|| {
                        let registry = $crate::rule::RuleRegistry::new();
                        $(
                            registry.register(
                                stringify!($attr),
                                <$crate::rule::Conditions as ::std::iter::FromIterator<_>>::from_iter(
                                    [$( $condition ),+],
                                ),
                            );
                        )*
                        registry
                    });
                &RULES
            }
        }
    };
}
