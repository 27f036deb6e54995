//! # Combinator Conversions
//!
//! Decorators that compose an inner [`Conversion`] into a conversion for
//! a larger domain type:
//!
//! | Combinator | Domain type | Schema |
//! |------------|-------------|--------|
//! | [`OptionalConv`] | `Option<T>` | inner schema with `"null"` added to `type` |
//! | [`ListConversion`] | `Vec<T>` | `{type: array, items: <inner>}` |
//! | [`MappingConv`] | `BTreeMap<K, V>` | `{type: object, additionalProperties: <value>}` |
//! | [`WithSchema`] | `T` | the supplied schema |
//!
//! Combinators never locate failures; an element failure inside a list
//! surfaces exactly as the inner conversion raised it.

use std::collections::BTreeMap;

use crate::conversion::Conversion;
use crate::error::ConversionError;
use crate::value::{Json, JsonKind, JsonObject};

/// `None` ⇄ `null`; anything else goes through the inner conversion.
#[derive(Debug, Clone)]
pub struct OptionalConv<C> {
    inner: C,
}

impl<C: Conversion> OptionalConv<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Conversion> Conversion for OptionalConv<C> {
    type Value = Option<C::Value>;

    fn to_json(&self, value: &Option<C::Value>) -> Result<Json, ConversionError> {
        match value {
            None => Ok(Json::Null),
            Some(v) => self.inner.to_json(v),
        }
    }

    fn from_json(&self, json: &Json) -> Result<Option<C::Value>, ConversionError> {
        if json.is_null() {
            return Ok(None);
        }
        self.inner.from_json(json).map(Some)
    }

    /// Adds `"null"` to the inner schema's `type`.
    ///
    /// A schema without a `type` keyword is returned unchanged, so `null`
    /// is not representable in it.
    fn schema(&self) -> Json {
        let mut schema = self.inner.schema();
        if let Some(ty) = schema.as_object_mut().and_then(|obj| obj.get_mut("type")) {
            let mut types = match ty.take() {
                Json::Array(types) => types,
                single => vec![single],
            };
            let null = Json::from(JsonKind::Null.as_str());
            if !types.contains(&null) {
                types.push(null);
            }
            *ty = Json::Array(types);
        }
        schema
    }
}

/// `Vec<T>` ⇄ JSON array, element-wise through the inner conversion.
#[derive(Debug, Clone)]
pub struct ListConversion<C> {
    item: C,
}

impl<C: Conversion> ListConversion<C> {
    pub fn new(item: C) -> Self {
        Self { item }
    }
}

impl<C: Conversion> Conversion for ListConversion<C> {
    type Value = Vec<C::Value>;

    fn to_json(&self, value: &Vec<C::Value>) -> Result<Json, ConversionError> {
        value
            .iter()
            .map(|v| self.item.to_json(v))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    fn from_json(&self, json: &Json) -> Result<Vec<C::Value>, ConversionError> {
        let items = json
            .as_array()
            .ok_or_else(|| ConversionError::shape(JsonKind::Array, json))?;
        items.iter().map(|v| self.item.from_json(v)).collect()
    }

    fn schema(&self) -> Json {
        serde_json::json!({
            "type": "array",
            "items": self.item.schema(),
        })
    }
}

/// A mapping whose keys are not known in advance.
///
/// Keys and values each have their own conversion. Encoded keys must be
/// JSON strings; the key schema is not represented since wire keys are
/// always strings.
#[derive(Debug, Clone)]
pub struct MappingConv<K, V> {
    key: K,
    value: V,
}

impl<K, V> MappingConv<K, V>
where
    K: Conversion,
    V: Conversion,
{
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> Conversion for MappingConv<K, V>
where
    K: Conversion,
    K::Value: Ord,
    V: Conversion,
{
    type Value = BTreeMap<K::Value, V::Value>;

    fn to_json(&self, value: &Self::Value) -> Result<Json, ConversionError> {
        let mut obj = JsonObject::new();
        for (k, v) in value {
            let key = match self.key.to_json(k)? {
                Json::String(key) => key,
                other => return Err(ConversionError::type_mismatch("string key", &other)),
            };
            obj.insert(key, self.value.to_json(v)?);
        }
        Ok(Json::Object(obj))
    }

    fn from_json(&self, json: &Json) -> Result<Self::Value, ConversionError> {
        let obj = json
            .as_object()
            .ok_or_else(|| ConversionError::shape(JsonKind::Object, json))?;
        obj.iter()
            .map(|(k, v)| -> Result<_, ConversionError> {
                let key = self.key.from_json(&Json::String(k.clone()))?;
                Ok((key, self.value.from_json(v)?))
            })
            .collect()
    }

    fn schema(&self) -> Json {
        serde_json::json!({
            "type": "object",
            "additionalProperties": self.value.schema(),
        })
    }
}

/// Replaces the schema of the wrapped conversion; data passes through.
#[derive(Debug, Clone)]
pub struct WithSchema<C> {
    inner: C,
    schema: Json,
}

impl<C: Conversion> WithSchema<C> {
    pub fn new(inner: C, schema: Json) -> Self {
        Self { inner, schema }
    }
}

impl<C: Conversion> Conversion for WithSchema<C> {
    type Value = C::Value;

    fn to_json(&self, value: &C::Value) -> Result<Json, ConversionError> {
        self.inner.to_json(value)
    }

    fn from_json(&self, json: &Json) -> Result<C::Value, ConversionError> {
        self.inner.from_json(json)
    }

    fn schema(&self) -> Json {
        self.schema.clone()
    }
}
