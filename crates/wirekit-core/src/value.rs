//! # JSON Value Model
//!
//! The wire representation is `serde_json::Value`, compiled with the
//! `preserve_order` feature so that object keys are emitted in insertion
//! order. [`JsonKind`] names the JSON-Schema `type` keywords and classifies
//! values against them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A JSON value: null, boolean, number, string, array or ordered object.
pub type Json = serde_json::Value;

/// An insertion-ordered JSON object.
pub type JsonObject = serde_json::Map<String, Json>;

/// The JSON-Schema primitive types.
///
/// `Integer` only matches numbers representable as `i64`/`u64`; `Number`
/// matches every JSON number, integers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// The most specific kind of `value`.
    pub fn of(value: &Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(_) => Self::Boolean,
            Json::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Json::Number(_) => Self::Number,
            Json::String(_) => Self::String,
            Json::Array(_) => Self::Array,
            Json::Object(_) => Self::Object,
        }
    }

    /// The JSON-Schema `type` keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether `value` is accepted by a schema of this `type`.
    pub fn matches(&self, value: &Json) -> bool {
        match self {
            Self::Number => value.is_number(),
            kind => *kind == Self::of(value),
        }
    }

    /// The minimal schema `{"type": <kind>}`.
    pub fn schema(&self) -> Json {
        serde_json::json!({ "type": self.as_str() })
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_distinguishes_integers() {
        assert_eq!(JsonKind::of(&json!(1)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(1.5)), JsonKind::Number);
        assert_eq!(JsonKind::of(&json!(u64::MAX)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
    }

    #[test]
    fn test_number_matches_integers() {
        assert!(JsonKind::Number.matches(&json!(3)));
        assert!(JsonKind::Number.matches(&json!(3.25)));
        assert!(!JsonKind::Integer.matches(&json!(3.25)));
        assert!(!JsonKind::Integer.matches(&json!(true)));
    }

    #[test]
    fn test_schema_and_serde_names_agree() {
        for kind in [JsonKind::Boolean, JsonKind::Integer, JsonKind::Object] {
            assert_eq!(kind.schema(), json!({ "type": kind.as_str() }));
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let mut obj = JsonObject::new();
        obj.insert("zeta".into(), json!(1));
        obj.insert("alpha".into(), json!(2));
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }
}
