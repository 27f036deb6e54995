//! # Primitive Conversions
//!
//! Identity-shaped codecs for strings, integers, floats and booleans.
//! Decoding asserts the JSON scalar has the expected wire type before
//! returning it; encoding asserts the domain value is representable
//! (a non-finite float has no JSON form). Both assertions fail with
//! [`ConversionError::TypeMismatch`] naming the expected type and the
//! offending value.
//!
//! [`json_of`] offers the same guards for callers that keep raw JSON as
//! their domain type.

use std::fmt;
use std::marker::PhantomData;

use crate::check::{with_type_checks, WithTypeCheckOnDump, WithTypeCheckOnRead};
use crate::combinator::WithSchema;
use crate::conversion::{identity, Conversion, Identity};
use crate::error::ConversionError;
use crate::value::{Json, JsonKind};

/// A Rust scalar with a direct JSON counterpart.
pub trait Scalar: Sized + Send + Sync + fmt::Debug + 'static {
    /// The JSON-Schema type of the wire form.
    const KIND: JsonKind;

    /// The wire form, or `None` if the value has no JSON representation.
    fn to_scalar(&self) -> Option<Json>;

    /// Extract the value, or `None` if `json` does not hold one.
    fn from_scalar(json: &Json) -> Option<Self>;
}

impl Scalar for String {
    const KIND: JsonKind = JsonKind::String;

    fn to_scalar(&self) -> Option<Json> {
        Some(Json::String(self.clone()))
    }

    fn from_scalar(json: &Json) -> Option<Self> {
        json.as_str().map(str::to_owned)
    }
}

impl Scalar for i64 {
    const KIND: JsonKind = JsonKind::Integer;

    fn to_scalar(&self) -> Option<Json> {
        Some(Json::from(*self))
    }

    fn from_scalar(json: &Json) -> Option<Self> {
        json.as_i64()
    }
}

impl Scalar for f64 {
    const KIND: JsonKind = JsonKind::Number;

    fn to_scalar(&self) -> Option<Json> {
        serde_json::Number::from_f64(*self).map(Json::Number)
    }

    fn from_scalar(json: &Json) -> Option<Self> {
        json.as_f64()
    }
}

impl Scalar for bool {
    const KIND: JsonKind = JsonKind::Boolean;

    fn to_scalar(&self) -> Option<Json> {
        Some(Json::Bool(*self))
    }

    fn from_scalar(json: &Json) -> Option<Self> {
        json.as_bool()
    }
}

/// Type-checked identity codec for a [`Scalar`].
pub struct Primitive<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T: Scalar> Primitive<T> {
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T: Scalar> Default for Primitive<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Primitive<T> {
    fn clone(&self) -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T> Copy for Primitive<T> {}

impl<T: Scalar> fmt::Debug for Primitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive<{}>", T::KIND)
    }
}

impl<T: Scalar> Conversion for Primitive<T> {
    type Value = T;

    fn to_json(&self, value: &T) -> Result<Json, ConversionError> {
        value.to_scalar().ok_or_else(|| ConversionError::TypeMismatch {
            expected: T::KIND.to_string(),
            found: format!("{value:?}"),
        })
    }

    fn from_json(&self, json: &Json) -> Result<T, ConversionError> {
        if !T::KIND.matches(json) {
            return Err(ConversionError::type_mismatch(T::KIND, json));
        }
        T::from_scalar(json).ok_or_else(|| ConversionError::type_mismatch(T::KIND, json))
    }

    fn schema(&self) -> Json {
        T::KIND.schema()
    }
}

/// `String` ⇄ JSON string.
pub fn string_conv() -> Primitive<String> {
    Primitive::new()
}

/// `i64` ⇄ JSON integer.
pub fn int_conv() -> Primitive<i64> {
    Primitive::new()
}

/// `f64` ⇄ JSON number. Integers are accepted on input.
pub fn float_conv() -> Primitive<f64> {
    Primitive::new()
}

/// `bool` ⇄ JSON boolean.
pub fn bool_conv() -> Primitive<bool> {
    Primitive::new()
}

/// Raw JSON guarded on both sides by `kind`, with schema `{"type": kind}`.
pub type JsonOf = WithTypeCheckOnRead<JsonKind, WithTypeCheckOnDump<JsonKind, WithSchema<Identity>>>;

/// Identity codec over raw JSON restricted to one wire type.
pub fn json_of(kind: JsonKind) -> JsonOf {
    with_type_checks(kind, kind, WithSchema::new(identity(), kind.schema()))
}
