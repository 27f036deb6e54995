//! # Sequence Model — Ordered Compounds
//!
//! A sequence type is a marker implementing [`Sequence`]; its instances are
//! [`Arr<S>`]. Every element goes through the single item conversion. A
//! failure at index `i` is located under the `<i>` segment, so nested
//! failures read `arr_field.<0>.xyz`.
//!
//! Two sequence types with the same item type are distinct: `Arr<A>` and
//! `Arr<B>` never compare equal, even with identical contents.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use wirekit_core::{ConfigError, Conversion, ConversionError, DynConversion, Json, JsonKind};

/// A homogeneous list type bound to one item conversion.
pub trait Sequence: Send + Sync + 'static {
    type Item: Send + Sync + 'static;

    /// Declare the item conversion.
    fn declare() -> Result<SequenceDecl<Self::Item>, ConfigError>;
}

/// Builder for a sequence declaration.
pub struct SequenceDecl<T> {
    item: Option<DynConversion<T>>,
}

impl<T: 'static> SequenceDecl<T> {
    pub fn new() -> Self {
        Self { item: None }
    }

    pub fn item<C>(mut self, conv: C) -> Self
    where
        C: Conversion<Value = T> + 'static,
    {
        self.item = Some(std::sync::Arc::new(conv));
        self
    }
}

impl<T: 'static> Default for SequenceDecl<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The validated, schema-bearing model of a sequence type.
pub struct SequenceModel<S: Sequence> {
    type_name: &'static str,
    item: DynConversion<S::Item>,
    schema: Json,
}

impl<S: Sequence> SequenceModel<S> {
    /// Check that an item conversion was declared and derive the schema.
    pub fn define() -> Result<Self, ConfigError> {
        let type_name = type_name::<S>();
        let result = S::declare().and_then(|decl| {
            decl.item.ok_or_else(|| ConfigError::MissingItemConversion {
                type_name: type_name.to_string(),
            })
        });
        match result {
            Ok(item) => {
                let schema = serde_json::json!({
                    "type": "array",
                    "items": item.schema(),
                });
                tracing::debug!(sequence = type_name, "sequence model defined");
                Ok(Self {
                    type_name,
                    item,
                    schema,
                })
            }
            Err(err) => {
                tracing::warn!(sequence = type_name, error = %err, "sequence definition rejected");
                Err(err)
            }
        }
    }

    pub fn to_json(&self, items: &[S::Item]) -> Result<Json, ConversionError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.item.to_json(item).map_err(|e| e.at_index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    pub fn from_json(&self, json: &Json) -> Result<Vec<S::Item>, ConversionError> {
        let items = json
            .as_array()
            .ok_or_else(|| ConversionError::shape(JsonKind::Array, json))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.item.from_json(item).map_err(|e| e.at_index(i)))
            .collect()
    }

    /// `{type: array, items: <item schema>}`.
    pub fn schema(&self) -> &Json {
        &self.schema
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<S: Sequence> fmt::Debug for SequenceModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceModel")
            .field("type_name", &self.type_name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

// ─── Instances ───────────────────────────────────────────────────────

/// An instance of sequence type `S`.
pub struct Arr<S: Sequence> {
    items: Vec<S::Item>,
    marker: PhantomData<fn() -> S>,
}

impl<S: Sequence> Arr<S> {
    pub fn new(items: Vec<S::Item>) -> Self {
        Self {
            items,
            marker: PhantomData,
        }
    }

    pub fn into_vec(self) -> Vec<S::Item> {
        self.items
    }
}

impl<S: Sequence> Deref for Arr<S> {
    type Target = [S::Item];

    fn deref(&self) -> &[S::Item] {
        &self.items
    }
}

impl<S: Sequence> From<Vec<S::Item>> for Arr<S> {
    fn from(items: Vec<S::Item>) -> Self {
        Self::new(items)
    }
}

impl<S: Sequence> FromIterator<S::Item> for Arr<S> {
    fn from_iter<I: IntoIterator<Item = S::Item>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S: Sequence> IntoIterator for Arr<S> {
    type Item = S::Item;
    type IntoIter = std::vec::IntoIter<S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, S: Sequence> IntoIterator for &'a Arr<S> {
    type Item = &'a S::Item;
    type IntoIter = std::slice::Iter<'a, S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<S: Sequence> Default for Arr<S> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<S: Sequence> Clone for Arr<S>
where
    S::Item: Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.items.clone())
    }
}

impl<S: Sequence> PartialEq for Arr<S>
where
    S::Item: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<S: Sequence> fmt::Debug for Arr<S>
where
    S::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = type_name::<S>().rsplit("::").next().unwrap_or("Arr");
        write!(f, "{name}")?;
        f.debug_list().entries(&self.items).finish()
    }
}
