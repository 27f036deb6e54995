//! # Type-Check Decorators
//!
//! Wrap a conversion with an explicit assertion on the value handed to
//! `to_json` ([`WithTypeCheckOnDump`]) or on the JSON handed to
//! `from_json` ([`WithTypeCheckOnRead`]). A failed assertion raises
//! [`ConversionError::TypeMismatch`] naming the value and the expected type.
//! The schema of the wrapped conversion is passed through unchanged.

use std::fmt;

use crate::conversion::Conversion;
use crate::error::ConversionError;
use crate::value::{Json, JsonKind};

/// An assertion that a value belongs to an expected type.
pub trait TypeCheck<T: ?Sized>: Send + Sync {
    /// Whether `value` has the expected type.
    fn accepts(&self, value: &T) -> bool;

    /// Human-readable name of the expected type.
    fn expected(&self) -> String;
}

impl TypeCheck<Json> for JsonKind {
    fn accepts(&self, value: &Json) -> bool {
        self.matches(value)
    }

    fn expected(&self) -> String {
        self.as_str().to_string()
    }
}

/// A named predicate usable as a [`TypeCheck`].
#[derive(Clone, Copy)]
pub struct Predicate<F> {
    name: &'static str,
    check: F,
}

impl<F> Predicate<F> {
    /// `name` is reported as the expected type when `check` fails.
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

impl<T: ?Sized, F> TypeCheck<T> for Predicate<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn accepts(&self, value: &T) -> bool {
        (self.check)(value)
    }

    fn expected(&self) -> String {
        self.name.to_string()
    }
}

/// Asserts the type of the value passed to `to_json`.
#[derive(Debug, Clone)]
pub struct WithTypeCheckOnDump<K, C> {
    check: K,
    inner: C,
}

impl<K, C> WithTypeCheckOnDump<K, C> {
    pub fn new(check: K, inner: C) -> Self {
        Self { check, inner }
    }
}

impl<K, C> Conversion for WithTypeCheckOnDump<K, C>
where
    C: Conversion,
    C::Value: fmt::Debug,
    K: TypeCheck<C::Value>,
{
    type Value = C::Value;

    fn to_json(&self, value: &C::Value) -> Result<Json, ConversionError> {
        if !self.check.accepts(value) {
            return Err(ConversionError::TypeMismatch {
                expected: self.check.expected(),
                found: format!("{value:?}"),
            });
        }
        self.inner.to_json(value)
    }

    fn from_json(&self, json: &Json) -> Result<C::Value, ConversionError> {
        self.inner.from_json(json)
    }

    fn schema(&self) -> Json {
        self.inner.schema()
    }
}

/// Asserts the type of the JSON passed to `from_json`.
#[derive(Debug, Clone)]
pub struct WithTypeCheckOnRead<K, C> {
    check: K,
    inner: C,
}

impl<K, C> WithTypeCheckOnRead<K, C> {
    pub fn new(check: K, inner: C) -> Self {
        Self { check, inner }
    }
}

impl<K, C> Conversion for WithTypeCheckOnRead<K, C>
where
    C: Conversion,
    K: TypeCheck<Json>,
{
    type Value = C::Value;

    fn to_json(&self, value: &C::Value) -> Result<Json, ConversionError> {
        self.inner.to_json(value)
    }

    fn from_json(&self, json: &Json) -> Result<C::Value, ConversionError> {
        if !self.check.accepts(json) {
            return Err(ConversionError::type_mismatch(self.check.expected(), json));
        }
        self.inner.from_json(json)
    }

    fn schema(&self) -> Json {
        self.inner.schema()
    }
}

/// Wrap `inner` with both a dump-side and a read-side type check.
pub fn with_type_checks<D, R, C>(
    on_dump: D,
    on_read: R,
    inner: C,
) -> WithTypeCheckOnRead<R, WithTypeCheckOnDump<D, C>> {
    WithTypeCheckOnRead::new(on_read, WithTypeCheckOnDump::new(on_dump, inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::identity;
    use serde_json::json;

    #[test]
    fn test_dump_check_rejects_wrong_type() {
        let conv = WithTypeCheckOnDump::new(JsonKind::String, identity());
        assert_eq!(conv.to_json(&json!("ok")).unwrap(), json!("ok"));
        let err = conv.to_json(&json!(123)).unwrap_err();
        match err {
            ConversionError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "string");
                assert!(found.contains("123"));
            }
            other => panic!("Expected TypeMismatch, got: {other}"),
        }
        // The read side is unchecked.
        assert_eq!(conv.from_json(&json!(123)).unwrap(), json!(123));
    }

    #[test]
    fn test_read_check_rejects_wrong_type() {
        let conv = WithTypeCheckOnRead::new(JsonKind::Integer, identity());
        assert_eq!(conv.from_json(&json!(5)).unwrap(), json!(5));
        assert!(conv.from_json(&json!("5")).is_err());
        assert_eq!(conv.to_json(&json!("5")).unwrap(), json!("5"));
    }

    #[test]
    fn test_with_type_checks_guards_both_directions() {
        let conv = with_type_checks(JsonKind::Boolean, JsonKind::Boolean, identity());
        assert!(conv.to_json(&json!(1)).is_err());
        assert!(conv.from_json(&json!(1)).is_err());
        assert_eq!(conv.from_json(&json!(false)).unwrap(), json!(false));
    }

    #[test]
    fn test_predicate_names_expected_type() {
        let even = Predicate::new("even integer", |v: &Json| {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        });
        let conv = WithTypeCheckOnRead::new(even, identity());
        let err = conv.from_json(&json!(3)).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: 3 is not of type even integer");
    }

    #[test]
    fn test_schema_passes_through() {
        let conv = with_type_checks(JsonKind::String, JsonKind::String, identity());
        assert_eq!(conv.schema(), json!({}));
    }
}
