//! # Schema Validation
//!
//! Runtime validation of JSON values against derived JSON Schemas
//! (Draft 2020-12 by default).
//!
//! The schemas produced by conversions and compound models use only
//! `type`, `properties`, `required`, `items`, `additionalProperties`,
//! `pattern` and `enum`, so every supported draft interprets them the same
//! way. The draft is configurable for callers who hand-write schemas with
//! [`WithSchema`](wirekit_core::WithSchema).
//!
//! Validation failures carry every violation with its instance path, the
//! schema path that triggered it and the validator's message.

use std::fmt;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wirekit_core::Json;

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The value did not conform to the schema.
    #[error("validation failed:\n{}", render_violations(violations))]
    ValidationFailed {
        /// Every violation, in the validator's order.
        violations: Vec<Violation>,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error: {reason}")]
    ValidatorBuildError {
        /// Reason the validator could not be built.
        reason: String,
    },
}

impl SchemaValidationError {
    /// The violations of a failed validation, empty for build errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ValidationFailed { violations } => violations,
            Self::ValidatorBuildError { .. } => &[],
        }
    }
}

/// One schema violation, located in both the instance and the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value; empty at the document root.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "  {at}: {} [{}]", self.message, self.schema_path)
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON Schema dialect used to compile a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaDraft {
    #[serde(rename = "draft-04")]
    Draft4,
    #[serde(rename = "draft-06")]
    Draft6,
    #[serde(rename = "draft-07")]
    Draft7,
    #[serde(rename = "2019-09")]
    Draft201909,
    #[default]
    #[serde(rename = "2020-12")]
    Draft202012,
}

impl SchemaDraft {
    fn as_jsonschema(self) -> jsonschema::Draft {
        match self {
            Self::Draft4 => jsonschema::Draft::Draft4,
            Self::Draft6 => jsonschema::Draft::Draft6,
            Self::Draft7 => jsonschema::Draft::Draft7,
            Self::Draft201909 => jsonschema::Draft::Draft201909,
            Self::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// A compiled validator for one schema.
///
/// ## Thread Safety
///
/// `SchemaValidator` is `Send + Sync`. Compilation happens once at
/// construction; validation does not mutate it.
pub struct SchemaValidator {
    schema: Json,
    draft: SchemaDraft,
    validator: Validator,
}

impl SchemaValidator {
    /// Compile `schema` under Draft 2020-12.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if the schema
    /// is not a valid JSON Schema.
    pub fn new(schema: &Json) -> Result<Self, SchemaValidationError> {
        Self::with_draft(schema, SchemaDraft::default())
    }

    /// Compile `schema` under the given draft.
    pub fn with_draft(schema: &Json, draft: SchemaDraft) -> Result<Self, SchemaValidationError> {
        let mut opts = jsonschema::options();
        opts.with_draft(draft.as_jsonschema());
        let validator = opts.build(schema).map_err(|e| {
            tracing::warn!(error = %e, "schema rejected by validator");
            SchemaValidationError::ValidatorBuildError {
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            schema: schema.clone(),
            draft,
            validator,
        })
    }

    pub fn schema(&self) -> &Json {
        &self.schema
    }

    pub fn draft(&self) -> SchemaDraft {
        self.draft
    }

    /// Whether `instance` conforms, without collecting violations.
    pub fn is_valid(&self, instance: &Json) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validate `instance`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` with structured
    /// violation details if the value is invalid.
    pub fn validate(&self, instance: &Json) -> Result<(), SchemaValidationError> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::trace!(violations = errors.len(), "value failed schema validation");
            Err(SchemaValidationError::ValidationFailed {
                violations: errors,
            })
        }
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

/// Validate `instance` against `schema` in one call.
///
/// Compiles the schema on every call; keep a [`SchemaValidator`] when the
/// same schema validates many values.
pub fn validate(instance: &Json, schema: &Json) -> Result<(), SchemaValidationError> {
    SchemaValidator::new(schema)?.validate(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_schema() -> Json {
        json!({
            "type": "object",
            "properties": {
                "abc": {"type": ["string", "null"]},
                "n": {"type": "integer"},
            },
            "required": ["abc"],
        })
    }

    #[test]
    fn test_valid_values_pass() {
        let validator = SchemaValidator::new(&record_schema()).unwrap();
        assert!(validator.validate(&json!({"abc": null})).is_ok());
        assert!(validator.validate(&json!({"abc": "hello", "n": 3})).is_ok());
        assert_eq!(validator.draft(), SchemaDraft::Draft202012);
    }

    #[test]
    fn test_missing_required_reported_at_root() {
        let err = validate(&json!({}), &record_schema()).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "");
        assert!(violations[0].message.contains("abc"));
        assert!(err.to_string().contains("(root)"));
    }

    #[test]
    fn test_display_names_instance_and_schema_location() {
        let err = validate(&json!({"abc": "x", "n": "y"}), &record_schema()).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.starts_with("validation failed:\n  /n: "));
        assert!(rendered.ends_with("[/properties/n/type]"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_every_violation_is_collected() {
        let validator = SchemaValidator::new(&record_schema()).unwrap();
        let err = validator.validate(&json!({"abc": 1, "n": "x"})).unwrap_err();
        let mut paths: Vec<&str> = err
            .violations()
            .iter()
            .map(|v| v.instance_path.as_str())
            .collect();
        paths.sort();
        assert_eq!(paths, ["/abc", "/n"]);
        assert!(!validator.is_valid(&json!({"abc": 1})));
    }

    #[test]
    fn test_invalid_schema_fails_to_build() {
        let err = SchemaValidator::new(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidatorBuildError { .. }));
        assert!(err.violations().is_empty());
    }

    #[test]
    fn test_draft_config_names() {
        let draft: SchemaDraft = serde_json::from_value(json!("draft-07")).unwrap();
        assert_eq!(draft, SchemaDraft::Draft7);
        assert_eq!(serde_json::to_value(SchemaDraft::default()).unwrap(), json!("2020-12"));
        let validator = SchemaValidator::with_draft(&record_schema(), draft).unwrap();
        assert!(validator.is_valid(&json!({"abc": "x"})));
    }
}
