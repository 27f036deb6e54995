//! # The Conversion Contract
//!
//! A [`Conversion`] is a bidirectional codec between one domain type and
//! the JSON value model, plus the JSON-Schema fragment describing exactly
//! the values `from_json` accepts.
//!
//! ## Invariants
//!
//! - `to_json` and `from_json` are inverses on the valid domain.
//! - Implementations hold no per-call state and are `Send + Sync`, so a
//!   single instance can be shared by every model that uses it.
//! - Leaf conversions report failures without a path; locating a failure
//!   is the job of the enclosing compound model.

use std::fmt;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::value::Json;

/// Bidirectional codec between `Self::Value` and JSON.
pub trait Conversion: Send + Sync {
    /// The domain type this conversion produces and consumes.
    type Value;

    /// Encode a domain value as JSON.
    fn to_json(&self, value: &Self::Value) -> Result<Json, ConversionError>;

    /// Decode a domain value from JSON.
    fn from_json(&self, json: &Json) -> Result<Self::Value, ConversionError>;

    /// The JSON-Schema fragment accepted by [`Conversion::from_json`].
    fn schema(&self) -> Json;
}

/// A shared, type-erased conversion.
pub type DynConversion<T> = Arc<dyn Conversion<Value = T>>;

impl<C: Conversion + ?Sized> Conversion for Arc<C> {
    type Value = C::Value;

    fn to_json(&self, value: &Self::Value) -> Result<Json, ConversionError> {
        (**self).to_json(value)
    }

    fn from_json(&self, json: &Json) -> Result<Self::Value, ConversionError> {
        (**self).from_json(json)
    }

    fn schema(&self) -> Json {
        (**self).schema()
    }
}

impl<C: Conversion + ?Sized> Conversion for Box<C> {
    type Value = C::Value;

    fn to_json(&self, value: &Self::Value) -> Result<Json, ConversionError> {
        (**self).to_json(value)
    }

    fn from_json(&self, json: &Json) -> Result<Self::Value, ConversionError> {
        (**self).from_json(json)
    }

    fn schema(&self) -> Json {
        (**self).schema()
    }
}

type ToJsonFn<T> = dyn Fn(&T) -> Result<Json, ConversionError> + Send + Sync;
type FromJsonFn<T> = dyn Fn(&Json) -> Result<T, ConversionError> + Send + Sync;

/// A conversion assembled from two functions and a fixed schema.
pub struct ConversionOf<T> {
    to_json: Box<ToJsonFn<T>>,
    from_json: Box<FromJsonFn<T>>,
    schema: Json,
}

impl<T> ConversionOf<T> {
    /// Build a conversion from an encoder, a decoder and the schema they
    /// are intended for.
    pub fn new<E, D>(to_json: E, from_json: D, schema: Json) -> Self
    where
        E: Fn(&T) -> Result<Json, ConversionError> + Send + Sync + 'static,
        D: Fn(&Json) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        Self {
            to_json: Box::new(to_json),
            from_json: Box::new(from_json),
            schema,
        }
    }
}

impl<T> fmt::Debug for ConversionOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOf")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl<T> Conversion for ConversionOf<T> {
    type Value = T;

    fn to_json(&self, value: &T) -> Result<Json, ConversionError> {
        (self.to_json)(value)
    }

    fn from_json(&self, json: &Json) -> Result<T, ConversionError> {
        (self.from_json)(json)
    }

    fn schema(&self) -> Json {
        self.schema.clone()
    }
}

/// The identity codec over raw JSON. Its schema `{}` accepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

/// Shorthand for [`Identity`].
pub fn identity() -> Identity {
    Identity
}

impl Conversion for Identity {
    type Value = Json;

    fn to_json(&self, value: &Json) -> Result<Json, ConversionError> {
        Ok(value.clone())
    }

    fn from_json(&self, json: &Json) -> Result<Json, ConversionError> {
        Ok(json.clone())
    }

    fn schema(&self) -> Json {
        Json::Object(Default::default())
    }
}
