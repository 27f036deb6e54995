//! # Validate-on-the-Fly Conversion
//!
//! [`Validated`] runs the JSON side of every conversion through a compiled
//! [`SchemaValidator`]: the output of `to_json` after encoding, the input of
//! `from_json` before decoding. A rejected value surfaces as
//! [`ConversionError::Validation`] carrying the untouched
//! [`SchemaValidationError`]; it is never turned into a path failure by
//! this combinator.

use wirekit_core::{Conversion, ConversionError, Json};

use crate::validate::{SchemaDraft, SchemaValidationError, SchemaValidator};

/// Wraps a conversion with schema validation in both directions.
#[derive(Debug)]
pub struct Validated<C> {
    inner: C,
    validator: SchemaValidator,
}

impl<C: Conversion> Validated<C> {
    /// Validate against the wrapped conversion's own schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if that schema
    /// does not compile.
    pub fn new(inner: C) -> Result<Self, SchemaValidationError> {
        let validator = SchemaValidator::new(&inner.schema())?;
        Ok(Self { inner, validator })
    }

    /// Validate against `schema`, which also becomes this conversion's schema.
    pub fn with_schema(inner: C, schema: &Json) -> Result<Self, SchemaValidationError> {
        Self::with_draft(inner, schema, SchemaDraft::default())
    }

    /// Validate against `schema` compiled under `draft`.
    pub fn with_draft(
        inner: C,
        schema: &Json,
        draft: SchemaDraft,
    ) -> Result<Self, SchemaValidationError> {
        let validator = SchemaValidator::with_draft(schema, draft)?;
        Ok(Self { inner, validator })
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Conversion> Conversion for Validated<C> {
    type Value = C::Value;

    fn to_json(&self, value: &C::Value) -> Result<Json, ConversionError> {
        let json = self.inner.to_json(value)?;
        self.validator
            .validate(&json)
            .map_err(ConversionError::validation)?;
        Ok(json)
    }

    fn from_json(&self, json: &Json) -> Result<C::Value, ConversionError> {
        self.validator
            .validate(json)
            .map_err(ConversionError::validation)?;
        self.inner.from_json(json)
    }

    fn schema(&self) -> Json {
        self.validator.schema().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wirekit_core::{identity, int_conv, string_conv, OptionalConv, WithSchema};

    #[test]
    fn test_from_json_validates_before_decoding() {
        let conv = Validated::with_schema(
            int_conv(),
            &json!({"type": "integer", "minimum": 0}),
        )
        .unwrap();
        assert_eq!(conv.from_json(&json!(5)).unwrap(), 5);
        let err = conv.from_json(&json!(-1)).unwrap_err();
        assert!(matches!(err, ConversionError::Validation(_)));
        assert!(err.path().is_none());
    }

    #[test]
    fn test_to_json_validates_after_encoding() {
        let conv = Validated::with_schema(
            string_conv(),
            &json!({"type": "string", "pattern": "^[a-z]+$"}),
        )
        .unwrap();
        assert_eq!(conv.to_json(&"abc".to_string()).unwrap(), json!("abc"));
        let err = conv.to_json(&"ABC".to_string()).unwrap_err();
        let source = std::error::Error::source(&err).expect("validator error is chained");
        let original = source
            .downcast_ref::<SchemaValidationError>()
            .expect("validator error is passed through untouched");
        assert_eq!(original.violations().len(), 1);
    }

    #[test]
    fn test_own_schema_is_used_by_default() {
        let conv = Validated::new(OptionalConv::new(string_conv())).unwrap();
        assert_eq!(conv.schema(), json!({"type": ["string", "null"]}));
        assert_eq!(conv.from_json(&Json::Null).unwrap(), None);
        assert!(conv.from_json(&json!(3)).is_err());
    }

    #[test]
    fn test_schema_override_is_what_gets_validated() {
        let inner = WithSchema::new(identity(), json!({"type": "array", "items": {"type": "integer"}}));
        let conv = Validated::new(inner).unwrap();
        assert!(conv.from_json(&json!([1, 2])).is_ok());
        assert!(conv.from_json(&json!([1, "2"])).is_err());
        assert_eq!(conv.validator().draft(), SchemaDraft::Draft202012);
    }
}
