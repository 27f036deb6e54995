//! # wirekit-schema — Schema Validation
//!
//! The JSON Schema collaborator of wirekit, backed by the `jsonschema`
//! crate. Conversions and compound models derive schemas; this crate checks
//! values against them.
//!
//! ## Runtime Validation (`validate`)
//!
//! - [`SchemaValidator`] compiles a schema once and validates many values,
//!   reporting every [`Violation`] with its instance and schema paths.
//! - [`validate`] is the one-shot form: compile, validate, discard.
//!
//! ## Validate-on-the-Fly (`validated`)
//!
//! [`Validated`] decorates any conversion so that the JSON it emits and the
//! JSON it accepts are both checked against a schema.
//!
//! ## Crate Policy
//!
//! - Depends only on `wirekit-core` internally.
//! - Validation failures are passed through as [`SchemaValidationError`],
//!   never rewritten into path failures.

pub mod validate;
pub mod validated;

pub use validate::{
    validate, SchemaDraft, SchemaValidationError, SchemaValidator, Violation,
};
pub use validated::Validated;
