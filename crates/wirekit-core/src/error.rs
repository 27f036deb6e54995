//! # Error Types — Path-Carrying Conversion Failures
//!
//! Defines the two error families of the codec layer. Both use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! - [`ConversionError`] is raised while data flows: a leaf conversion
//!   rejects a value, a required key is missing, an enumerated value is
//!   unknown, or an external schema validator refuses a document.
//! - [`ConfigError`] is raised once, when a model type or an enumerated
//!   conversion is declared. It never occurs while converting data of a
//!   successfully declared type.
//!
//! ## Path Composition
//!
//! Leaf conversions fail once and never annotate their own failures.
//! Compound models (records and sequences) are the only components that
//! enrich a failure, by calling [`ConversionError::at`] with the field name
//! or [`ConversionError::at_index`] with the element index:
//!
//! - a failure that already carries a path gets `<segment>.` prefixed;
//! - any other failure becomes a fresh [`PathError`] whose path is just the
//!   segment. Its message is not repeated in the path string; the original
//!   failure stays reachable through [`std::error::Error::source`].
//!
//! A failure three levels deep therefore renders as
//! `Path: 'foo.arr_field.<0>.xyz'`.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::value::{Json, JsonKind};

/// Boxed error produced by an external collaborator (schema validator).
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure raised while converting between a domain value and JSON.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// A value failed an explicit type assertion.
    #[error("type mismatch: {found} is not of type {expected}")]
    TypeMismatch {
        /// Description of the expected type.
        expected: String,
        /// Rendering of the offending value.
        found: String,
    },

    /// The JSON input does not have the structural shape the conversion needs.
    #[error("shape mismatch: expected a JSON {expected}, got {found}")]
    Shape {
        /// The required JSON shape.
        expected: JsonKind,
        /// Rendering of the offending value.
        found: String,
    },

    /// A required record key is absent from the input object.
    #[error("missing required key '{key}'")]
    MissingKey {
        /// The external (wire) key that was looked up.
        key: String,
    },

    /// No enumerated member carries the decoded value.
    #[error("no matching enumerated value for {value}")]
    UnknownVariant {
        /// Rendering of the value that did not match.
        value: String,
    },

    /// The value has the right JSON type but cannot be decoded.
    #[error("invalid value: {message}")]
    Invalid {
        /// What was wrong with the value.
        message: String,
    },

    /// The value of an absent `MaybeMissing` slot was read.
    #[error("missing value")]
    Absent,

    /// An external schema validator rejected the document.
    #[error("{0}")]
    Validation(#[source] BoxError),

    /// The model type involved in the conversion failed its declaration check.
    #[error("model definition error: {0}")]
    Config(#[from] ConfigError),

    /// A failure located inside a nested structure.
    #[error(transparent)]
    Path(#[from] PathError),
}

impl ConversionError {
    /// Build a type mismatch for a JSON value.
    pub fn type_mismatch(expected: impl fmt::Display, found: &Json) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Build a shape mismatch for a JSON value.
    pub fn shape(expected: JsonKind, found: &Json) -> Self {
        Self::Shape {
            expected,
            found: found.to_string(),
        }
    }

    /// Wrap an error raised by an external validator without reinterpreting it.
    pub fn validation(err: impl Into<BoxError>) -> Self {
        Self::Validation(err.into())
    }

    /// Locate this failure under the named segment.
    ///
    /// An existing path is prefixed with `<segment>.`; any other failure
    /// becomes the cause of a fresh path equal to `segment`.
    pub fn at(self, segment: impl fmt::Display) -> Self {
        match self {
            Self::Path(mut inner) => {
                inner.path = format!("{segment}.{}", inner.path);
                Self::Path(inner)
            }
            other => Self::Path(PathError {
                path: segment.to_string(),
                details: Vec::new(),
                source: Some(Box::new(other)),
            }),
        }
    }

    /// Locate this failure under the element at `index` (`<index>` segment).
    pub fn at_index(self, index: usize) -> Self {
        self.at(format_args!("<{index}>"))
    }

    /// The accumulated path, if this failure was located by a compound.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(inner) => Some(inner.path()),
            _ => None,
        }
    }

    /// The innermost failure, skipping every path layer.
    pub fn root_cause(&self) -> &ConversionError {
        let mut current = self;
        while let Self::Path(inner) = current {
            match inner.source.as_deref() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }
}

/// A failure located at a dotted/bracketed path inside nested structures.
///
/// Renders as `Path: '<path>'`, followed by `, <detail>` for every detail.
#[derive(Debug)]
pub struct PathError {
    path: String,
    details: Vec<String>,
    source: Option<Box<ConversionError>>,
}

impl PathError {
    /// A path failure with no cause.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            details: Vec::new(),
            source: None,
        }
    }

    /// Attach a human-readable detail shown after the path.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// The dotted/bracketed location, e.g. `foo.arr_field.<0>.xyz`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Details attached with [`PathError::with_detail`].
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// The failure that started this path, if any.
    pub fn cause(&self) -> Option<&ConversionError> {
        self.source.as_deref()
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path: '{}'", self.path)?;
        for detail in &self.details {
            write!(f, ", {detail}")?;
        }
        Ok(())
    }
}

impl StdError for PathError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

/// Error raised when a model type or enumerated conversion is declared.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The declared field set and the conversion map disagree.
    #[error(
        "record {type_name}: fields without a conversion: [{}]; conversions without a field: [{}]",
        .missing_conversion.join(", "),
        .unknown_fields.join(", ")
    )]
    FieldMismatch {
        /// The record type being declared.
        type_name: String,
        /// Declared fields that have no conversion entry.
        missing_conversion: Vec<String>,
        /// Conversion entries that name no declared field.
        unknown_fields: Vec<String>,
    },

    /// A field name appears twice in the declaration.
    #[error("record {type_name}: field '{field}' is declared more than once")]
    DuplicateField {
        /// The record type being declared.
        type_name: String,
        /// The repeated field name.
        field: String,
    },

    /// An alias table maps a name more than once in the same direction.
    #[error("alias table maps '{name}' more than once")]
    DuplicateAlias {
        /// The repeated internal or external name.
        name: String,
    },

    /// An alias renames a field the record does not declare.
    #[error("record {type_name}: alias renames undeclared field '{field}'")]
    UnknownAliasField {
        /// The record type being declared.
        type_name: String,
        /// The internal name found in the alias table.
        field: String,
    },

    /// Two fields resolve to the same wire key.
    #[error("record {type_name}: fields '{first}' and '{second}' both use the wire key '{key}'")]
    ExternalNameCollision {
        /// The record type being declared.
        type_name: String,
        /// The shared external key.
        key: String,
        /// First field using the key.
        first: String,
        /// Second field using the key.
        second: String,
    },

    /// A sequence type was declared without an item conversion.
    #[error("sequence {type_name}: no item conversion declared")]
    MissingItemConversion {
        /// The sequence type being declared.
        type_name: String,
    },

    /// Keep-undefined mode was requested for a record with no extension bag.
    #[error("record {type_name}: keep-undefined mode requires an extension bag")]
    NoExtensionSlot {
        /// The record type being declared.
        type_name: String,
    },

    /// An enumeration's underlying values are not usable on the wire.
    #[error("enumeration {type_name}: {reason}")]
    UnsupportedEnumValue {
        /// The enumeration type.
        type_name: String,
        /// Why the values were rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_at_starts_fresh_path() {
        let err = ConversionError::type_mismatch("string", &json!(123)).at("inner_field");
        assert_eq!(err.path(), Some("inner_field"));
        assert_eq!(err.to_string(), "Path: 'inner_field'");
    }

    #[test]
    fn test_at_prefixes_existing_path() {
        let err = ConversionError::MissingKey { key: "xyz".into() }
            .at("xyz")
            .at_index(0)
            .at("arr_field")
            .at("foo");
        assert_eq!(err.path(), Some("foo.arr_field.<0>.xyz"));
        assert_eq!(err.to_string(), "Path: 'foo.arr_field.<0>.xyz'");
    }

    #[test]
    fn test_root_cause_keeps_original_message() {
        let err = ConversionError::MissingKey { key: "from".into() }
            .at("from_")
            .at("message");
        assert!(matches!(
            err.root_cause(),
            ConversionError::MissingKey { key } if key == "from"
        ));
        let source = StdError::source(&err).expect("path errors chain their cause");
        assert_eq!(source.to_string(), "missing required key 'from'");
    }

    #[test]
    fn test_details_are_comma_joined() {
        let err = PathError::new("a.b")
            .with_detail("first")
            .with_detail("second");
        assert_eq!(err.to_string(), "Path: 'a.b', first, second");
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_root_cause_of_unlocated_error_is_itself() {
        let err = ConversionError::Absent;
        assert!(matches!(err.root_cause(), ConversionError::Absent));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_field_mismatch_lists_both_sides() {
        let err = ConfigError::FieldMismatch {
            type_name: "Foo".into(),
            missing_conversion: vec!["bar".into()],
            unknown_fields: vec!["baz".into(), "qux".into()],
        };
        assert_eq!(
            err.to_string(),
            "record Foo: fields without a conversion: [bar]; conversions without a field: [baz, qux]"
        );
    }

    #[test]
    fn test_validation_error_displays_as_is() {
        let err = ConversionError::validation("\"abc\" is a required property");
        assert_eq!(err.to_string(), "\"abc\" is a required property");
        assert!(err.path().is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z_]{1,8}",
            (0usize..100).prop_map(|i| format!("<{i}>")),
        ]
    }

    proptest! {
        /// Wrapping innermost-first yields the segments outermost-first.
        #[test]
        fn path_composition(segments in prop::collection::vec(segment(), 1..6)) {
            let mut err = ConversionError::Absent;
            for seg in segments.iter().rev() {
                err = err.at(seg);
            }
            let expected = segments.join(".");
            prop_assert_eq!(err.path(), Some(expected.as_str()));
            prop_assert!(matches!(err.root_cause(), ConversionError::Absent));
        }
    }
}
