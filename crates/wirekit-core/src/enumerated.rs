//! # Enumerated-Value Conversion
//!
//! Encodes the members of a fixed enumeration as their underlying scalar
//! values and derives the schema `{type: <scalar>, enum: [values...]}` from
//! the declaration order.
//!
//! ## Declaration Check
//!
//! All underlying values must share one wire type: integer, string or
//! float. Anything else (booleans, objects, arrays, null, mixed types, an
//! empty enumeration) is rejected when the conversion is built, never when
//! it is used.

use std::any::type_name;
use std::fmt;

use crate::conversion::Conversion;
use crate::error::{ConfigError, ConversionError};
use crate::value::{Json, JsonKind};

/// A closed set of named members with scalar underlying values.
///
/// ```
/// use serde_json::{json, Value};
/// use wirekit_core::{Conversion, EnumConversion, Enumerated};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level { Low, High }
///
/// impl Enumerated for Level {
///     fn members() -> Vec<(&'static str, Self)> {
///         vec![("low", Level::Low), ("high", Level::High)]
///     }
///     fn value(&self) -> Value {
///         match self { Level::Low => json!(1), Level::High => json!(2) }
///     }
/// }
///
/// let conv = EnumConversion::<Level>::new().unwrap();
/// assert_eq!(conv.schema(), json!({"type": "integer", "enum": [1, 2]}));
/// assert_eq!(conv.from_json(&json!(2)).unwrap(), Level::High);
/// ```
pub trait Enumerated: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Every member with its name, in declaration order.
    fn members() -> Vec<(&'static str, Self)>;

    /// The underlying wire value of this member.
    fn value(&self) -> Json;
}

#[derive(Debug, Clone)]
struct Member<E> {
    name: &'static str,
    member: E,
    value: Json,
}

/// Conversion between an [`Enumerated`] type and its underlying values.
#[derive(Debug, Clone)]
pub struct EnumConversion<E> {
    members: Vec<Member<E>>,
    kind: JsonKind,
}

impl<E: Enumerated> EnumConversion<E> {
    /// Build the conversion, checking the underlying values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedEnumValue` if the enumeration is
    /// empty, a value is not an integer/string/float, or values mix types.
    pub fn new() -> Result<Self, ConfigError> {
        let unsupported = |reason: String| ConfigError::UnsupportedEnumValue {
            type_name: type_name::<E>().to_string(),
            reason,
        };

        let mut members = Vec::new();
        let mut kind = None;
        for (name, member) in E::members() {
            let value = member.value();
            let member_kind = scalar_kind(&value).ok_or_else(|| {
                unsupported(format!(
                    "member '{name}' has value {value}, expected an integer, string or float"
                ))
            })?;
            match kind {
                None => kind = Some(member_kind),
                Some(k) if k != member_kind => {
                    return Err(unsupported(format!(
                        "member '{name}' is a {member_kind} but earlier members are {k}"
                    )));
                }
                Some(_) => {}
            }
            members.push(Member {
                name,
                member,
                value,
            });
        }

        let kind = kind.ok_or_else(|| unsupported("enumeration has no members".to_string()))?;
        Ok(Self { members, kind })
    }

    /// The wire type shared by all underlying values.
    pub fn kind(&self) -> JsonKind {
        self.kind
    }

    /// The declared name of `member`, if it belongs to the enumeration.
    pub fn name_of(&self, member: &E) -> Option<&'static str> {
        self.members
            .iter()
            .find(|m| &m.member == member)
            .map(|m| m.name)
    }

    fn matches(&self, candidate: &Json, value: &Json) -> bool {
        match self.kind {
            // 1.0 and 1 must find the same float member.
            JsonKind::Number => candidate.as_f64().is_some() && candidate.as_f64() == value.as_f64(),
            _ => candidate == value,
        }
    }
}

fn scalar_kind(value: &Json) -> Option<JsonKind> {
    match JsonKind::of(value) {
        kind @ (JsonKind::Integer | JsonKind::Number | JsonKind::String) => Some(kind),
        _ => None,
    }
}

impl<E: Enumerated> Conversion for EnumConversion<E> {
    type Value = E;

    fn to_json(&self, value: &E) -> Result<Json, ConversionError> {
        self.members
            .iter()
            .find(|m| &m.member == value)
            .map(|m| m.value.clone())
            .ok_or_else(|| ConversionError::UnknownVariant {
                value: format!("{value:?}"),
            })
    }

    fn from_json(&self, json: &Json) -> Result<E, ConversionError> {
        self.members
            .iter()
            .find(|m| self.matches(&m.value, json))
            .map(|m| m.member.clone())
            .ok_or_else(|| ConversionError::UnknownVariant {
                value: json.to_string(),
            })
    }

    fn schema(&self) -> Json {
        let values: Vec<Json> = self.members.iter().map(|m| m.value.clone()).collect();
        serde_json::json!({
            "type": self.kind.as_str(),
            "enum": values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Foo {
        X,
        Y,
        Z,
    }

    impl Enumerated for Foo {
        fn members() -> Vec<(&'static str, Self)> {
            vec![("x", Foo::X), ("y", Foo::Y), ("z", Foo::Z)]
        }

        fn value(&self) -> Json {
            match self {
                Foo::X => json!(1),
                Foo::Y => json!(2),
                Foo::Z => json!(3),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Tag {
        Foo,
        Bar,
    }

    impl Enumerated for Tag {
        fn members() -> Vec<(&'static str, Self)> {
            vec![("x", Tag::Foo), ("y", Tag::Bar)]
        }

        fn value(&self) -> Json {
            match self {
                Tag::Foo => json!("foo"),
                Tag::Bar => json!("bar"),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Ratio {
        Low,
        High,
    }

    impl Enumerated for Ratio {
        fn members() -> Vec<(&'static str, Self)> {
            vec![("x", Ratio::Low), ("y", Ratio::High)]
        }

        fn value(&self) -> Json {
            match self {
                Ratio::Low => json!(1.2),
                Ratio::High => json!(4.6),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Blob {
        A,
        B,
    }

    impl Enumerated for Blob {
        fn members() -> Vec<(&'static str, Self)> {
            vec![("x", Blob::A), ("y", Blob::B)]
        }

        fn value(&self) -> Json {
            match self {
                Blob::A => json!({"foo": 1}),
                Blob::B => json!({"boo": 4}),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Mixed {
        Num,
        Text,
    }

    impl Enumerated for Mixed {
        fn members() -> Vec<(&'static str, Self)> {
            vec![("num", Mixed::Num), ("text", Mixed::Text)]
        }

        fn value(&self) -> Json {
            match self {
                Mixed::Num => json!(1),
                Mixed::Text => json!("one"),
            }
        }
    }

    #[test]
    fn test_enum_conv() {
        let conv = EnumConversion::<Foo>::new().unwrap();
        assert_eq!(conv.schema(), json!({"type": "integer", "enum": [1, 2, 3]}));
        assert_eq!(conv.to_json(&Foo::X).unwrap(), json!(1));
        assert_eq!(conv.from_json(&json!(3)).unwrap(), Foo::Z);
        assert_eq!(conv.name_of(&Foo::Y), Some("y"));
    }

    #[test]
    fn test_enum_unknown_value() {
        let err = EnumConversion::<Foo>::new().unwrap().from_json(&json!(5)).unwrap_err();
        assert!(matches!(err, ConversionError::UnknownVariant { ref value } if value == "5"));
        assert_eq!(err.to_string(), "no matching enumerated value for 5");
    }

    #[test]
    fn test_enum_schema_per_value_type() {
        assert_eq!(
            EnumConversion::<Tag>::new().unwrap().schema(),
            json!({"type": "string", "enum": ["foo", "bar"]})
        );
        assert_eq!(
            EnumConversion::<Ratio>::new().unwrap().schema(),
            json!({"type": "number", "enum": [1.2, 4.6]})
        );
    }

    #[test]
    fn test_float_enum_lookup() {
        let conv = EnumConversion::<Ratio>::new().unwrap();
        assert_eq!(conv.from_json(&json!(4.6)).unwrap(), Ratio::High);
        assert!(conv.from_json(&json!("4.6")).is_err());
    }

    #[test]
    fn test_enum_rejects_object_values() {
        let err = EnumConversion::<Blob>::new().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedEnumValue { .. }));
    }

    #[test]
    fn test_enum_rejects_mixed_values() {
        let err = EnumConversion::<Mixed>::new().unwrap_err();
        assert!(err.to_string().contains("member 'text' is a string but earlier members are integer"));
    }
}
