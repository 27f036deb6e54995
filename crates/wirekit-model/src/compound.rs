//! # The Compound Capability
//!
//! Records and sequence instances both convert themselves through their
//! registered model. [`CompoundConv`] lets any conversion slot hold one, so
//! compounds nest: a record field can be another record or a sequence, and
//! a sequence item can be a record.

use std::fmt;
use std::marker::PhantomData;

use wirekit_core::{ConfigError, Conversion, ConversionError, Json};

use crate::record::Record;
use crate::registry::{record_model, sequence_model};
use crate::sequence::{Arr, Sequence};

/// A value that converts itself to and from JSON and describes its schema.
pub trait Compound: Sized + Send + Sync + 'static {
    /// Encode this value.
    fn as_json(&self) -> Result<Json, ConversionError>;

    /// Decode a value.
    fn from_json(json: &Json) -> Result<Self, ConversionError>;

    /// The schema of the type, derived once from its declaration.
    fn schema() -> Result<Json, ConfigError>;
}

impl<R: Record> Compound for R {
    fn as_json(&self) -> Result<Json, ConversionError> {
        record_model::<R>()?.to_json(self)
    }

    fn from_json(json: &Json) -> Result<Self, ConversionError> {
        record_model::<R>()?.from_json(json)
    }

    fn schema() -> Result<Json, ConfigError> {
        record_model::<R>().map(|model| model.schema().clone())
    }
}

impl<S: Sequence> Compound for Arr<S> {
    fn as_json(&self) -> Result<Json, ConversionError> {
        sequence_model::<S>()?.to_json(self)
    }

    fn from_json(json: &Json) -> Result<Self, ConversionError> {
        sequence_model::<S>()?.from_json(json).map(Arr::new)
    }

    fn schema() -> Result<Json, ConfigError> {
        sequence_model::<S>().map(|model| model.schema().clone())
    }
}

/// Delegates a conversion slot to a [`Compound`] type.
///
/// Construction registers the type, so a faulty declaration surfaces when
/// the enclosing declaration is built rather than on first use.
pub struct CompoundConv<T> {
    schema: Json,
    marker: PhantomData<fn() -> T>,
}

impl<T: Compound> CompoundConv<T> {
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of `T`'s declaration.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            schema: T::schema()?,
            marker: PhantomData,
        })
    }
}

impl<T> Clone for CompoundConv<T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CompoundConv<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompoundConv<{}>", std::any::type_name::<T>())
    }
}

impl<T: Compound> Conversion for CompoundConv<T> {
    type Value = T;

    fn to_json(&self, value: &T) -> Result<Json, ConversionError> {
        value.as_json()
    }

    fn from_json(&self, json: &Json) -> Result<T, ConversionError> {
        T::from_json(json)
    }

    fn schema(&self) -> Json {
        self.schema.clone()
    }
}
