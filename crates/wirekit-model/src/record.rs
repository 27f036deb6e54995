//! # Record Model — Keyed Compounds
//!
//! A record type lists its fields once in [`Record::FIELDS`] and binds each
//! of them to a [`Conversion`] in [`Record::declare`]. The resulting
//! [`RecordModel`] drives both directions of the conversion and derives the
//! record schema.
//!
//! ## Wire Shape
//!
//! ```text
//! {
//!   "<aliased name>": <field conversion output>,   one per field, FIELDS order
//!   ...                                             Absent MaybeMissing fields omitted
//!   "<undefined key>": <raw JSON>                  open mode only
//! }
//! ```
//!
//! ## Definition-Time Checks
//!
//! [`RecordModel::define`] rejects a declaration when:
//!
//! - `FIELDS` and the declared conversions disagree
//!   ([`ConfigError::FieldMismatch`], both differences listed);
//! - a field is named twice ([`ConfigError::DuplicateField`]);
//! - the alias table renames an undeclared field
//!   ([`ConfigError::UnknownAliasField`]);
//! - two fields resolve to the same wire key
//!   ([`ConfigError::ExternalNameCollision`]);
//! - open mode is requested but the type exposes no extension bag
//!   ([`ConfigError::NoExtensionSlot`]).
//!
//! None of these can happen while converting data of a defined record.

use std::any::type_name;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use wirekit_core::{
    AliasTable, ConfigError, Conversion, ConversionError, Json, JsonKind, JsonObject,
    MaybeMissing,
};

// ─── Extension Bag ───────────────────────────────────────────────────

/// Wire keys kept verbatim by an open-mode record.
///
/// Keys are the external names found in the input, in order of first
/// encounter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extension {
    entries: JsonObject,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Json) -> Option<Json> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Json> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Json)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<JsonObject> for Extension {
    fn from(entries: JsonObject) -> Self {
        Self { entries }
    }
}

// ─── Record Capability ───────────────────────────────────────────────

/// A record type with a static field declaration.
///
/// Decoding starts from `Default::default()` and then assigns every
/// declared field: the decoded value, or `Absent` for a maybe-missing field
/// whose key is not on the wire. The default only has to be a valid
/// placeholder; what it holds never reaches a decoded record. Field types
/// therefore need a `Default`, even enumerations.
pub trait Record: Default + Send + Sync + 'static {
    /// Internal field names in declaration order. Output follows this order.
    const FIELDS: &'static [&'static str];

    /// Bind every field in [`Record::FIELDS`] to a conversion.
    fn declare() -> Result<RecordDecl<Self>, ConfigError>;

    /// The extension bag used in open mode.
    fn extension(&self) -> Option<&Extension> {
        None
    }

    /// Mutable access to the extension bag used in open mode.
    fn extension_mut(&mut self) -> Option<&mut Extension> {
        None
    }
}

// ─── Declaration ─────────────────────────────────────────────────────

type EncodeFn<R> = dyn Fn(&R) -> Result<Option<Json>, ConversionError> + Send + Sync;
type DecodeFn<R> = dyn Fn(&mut R, &Json) -> Result<(), ConversionError> + Send + Sync;
type AbsentFn<R> = dyn Fn(&mut R) + Send + Sync;

/// One field bound to its conversion, with the value type erased.
struct FieldDecl<R> {
    name: &'static str,
    schema: Json,
    encode: Box<EncodeFn<R>>,
    decode: Box<DecodeFn<R>>,
    /// Marks the field `Absent`; `None` for a required field.
    absent: Option<Box<AbsentFn<R>>>,
}

impl<R> FieldDecl<R> {
    fn required(&self) -> bool {
        self.absent.is_none()
    }
}

/// Builder for a record declaration.
///
/// ```
/// use wirekit_core::{int_conv, string_conv, ConfigError, MaybeMissing};
/// use wirekit_model::{Record, RecordDecl};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Note {
///     id: i64,
///     text: MaybeMissing<String>,
/// }
///
/// impl Record for Note {
///     const FIELDS: &'static [&'static str] = &["id", "text"];
///
///     fn declare() -> Result<RecordDecl<Self>, ConfigError> {
///         Ok(RecordDecl::<Self>::new()
///             .field("id", int_conv(), |n| &n.id, |n, v| n.id = v)
///             .maybe_missing("text", string_conv(), |n| &n.text, |n, v| n.text = v))
///     }
/// }
/// ```
pub struct RecordDecl<R> {
    fields: Vec<FieldDecl<R>>,
    aliases: AliasTable,
    keep_undefined: bool,
}

impl<R: Record> RecordDecl<R> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            aliases: AliasTable::default(),
            keep_undefined: false,
        }
    }

    /// A required field: decoding fails if its key is absent.
    pub fn field<C>(
        mut self,
        name: &'static str,
        conv: C,
        get: fn(&R) -> &C::Value,
        set: fn(&mut R, C::Value),
    ) -> Self
    where
        C: Conversion + 'static,
        C::Value: 'static,
    {
        let schema = conv.schema();
        let conv = Arc::new(conv);
        let read = Arc::clone(&conv);
        self.fields.push(FieldDecl {
            name,
            schema,
            encode: Box::new(move |record| conv.to_json(get(record)).map(Some)),
            decode: Box::new(move |record, json| {
                set(record, read.from_json(json)?);
                Ok(())
            }),
            absent: None,
        });
        self
    }

    /// A field that may be absent from the wire object.
    ///
    /// `Absent` is omitted on output and the field is not listed in the
    /// schema's `required` array.
    pub fn maybe_missing<C>(
        mut self,
        name: &'static str,
        conv: C,
        get: fn(&R) -> &MaybeMissing<C::Value>,
        set: fn(&mut R, MaybeMissing<C::Value>),
    ) -> Self
    where
        C: Conversion + 'static,
        C::Value: 'static,
    {
        let schema = conv.schema();
        let conv = Arc::new(conv);
        let read = Arc::clone(&conv);
        self.fields.push(FieldDecl {
            name,
            schema,
            encode: Box::new(move |record| match get(record) {
                MaybeMissing::Present(value) => conv.to_json(value).map(Some),
                MaybeMissing::Absent => Ok(None),
            }),
            decode: Box::new(move |record, json| {
                set(record, MaybeMissing::Present(read.from_json(json)?));
                Ok(())
            }),
            absent: Some(Box::new(move |record: &mut R| {
                set(record, MaybeMissing::Absent)
            })),
        });
        self
    }

    /// Rename fields on the wire.
    pub fn aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Keep undeclared wire keys in the record's extension bag.
    pub fn keep_undefined(mut self) -> Self {
        self.keep_undefined = true;
        self
    }
}

impl<R: Record> Default for RecordDecl<R> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Model ───────────────────────────────────────────────────────────

struct ResolvedField<R> {
    external: String,
    decl: FieldDecl<R>,
}

/// The validated, schema-bearing model of a record type.
pub struct RecordModel<R> {
    type_name: &'static str,
    fields: Vec<ResolvedField<R>>,
    keep_undefined: bool,
    schema: Json,
}

impl<R: Record> RecordModel<R> {
    /// Run the definition-time checks and derive the schema.
    pub fn define() -> Result<Self, ConfigError> {
        let type_name = type_name::<R>();
        let result = R::declare().and_then(|decl| Self::build(type_name, decl));
        match &result {
            Ok(model) => tracing::debug!(
                record = type_name,
                fields = model.fields.len(),
                keep_undefined = model.keep_undefined,
                "record model defined"
            ),
            Err(err) => tracing::warn!(record = type_name, error = %err, "record definition rejected"),
        }
        result
    }

    fn build(type_name: &'static str, decl: RecordDecl<R>) -> Result<Self, ConfigError> {
        check_unique(type_name, R::FIELDS.iter().copied())?;
        check_unique(type_name, decl.fields.iter().map(|f| f.name))?;

        let declared: BTreeSet<&str> = R::FIELDS.iter().copied().collect();
        let converted: BTreeSet<&str> = decl.fields.iter().map(|f| f.name).collect();
        let missing_conversion: Vec<String> = R::FIELDS
            .iter()
            .filter(|name| !converted.contains(*name))
            .map(|name| name.to_string())
            .collect();
        let unknown_fields: Vec<String> = decl
            .fields
            .iter()
            .filter(|f| !declared.contains(f.name))
            .map(|f| f.name.to_string())
            .collect();
        if !missing_conversion.is_empty() || !unknown_fields.is_empty() {
            return Err(ConfigError::FieldMismatch {
                type_name: type_name.to_string(),
                missing_conversion,
                unknown_fields,
            });
        }

        if let Some((internal, _)) = decl.aliases.iter().find(|(i, _)| !declared.contains(i)) {
            return Err(ConfigError::UnknownAliasField {
                type_name: type_name.to_string(),
                field: internal.to_string(),
            });
        }

        if decl.keep_undefined && R::default().extension().is_none() {
            return Err(ConfigError::NoExtensionSlot {
                type_name: type_name.to_string(),
            });
        }

        let mut by_name: HashMap<&'static str, FieldDecl<R>> =
            decl.fields.into_iter().map(|f| (f.name, f)).collect();
        let mut owners: HashMap<String, &'static str> = HashMap::new();
        let mut fields = Vec::with_capacity(R::FIELDS.len());
        for &name in R::FIELDS {
            let external = decl.aliases.aliased(name).to_string();
            if let Some(first) = owners.insert(external.clone(), name) {
                return Err(ConfigError::ExternalNameCollision {
                    type_name: type_name.to_string(),
                    key: external,
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            // Present: FIELDS and the declared names were checked equal above.
            if let Some(field) = by_name.remove(name) {
                fields.push(ResolvedField {
                    external,
                    decl: field,
                });
            }
        }

        let schema = derive_schema(&fields);
        Ok(Self {
            type_name,
            fields,
            keep_undefined: decl.keep_undefined,
            schema,
        })
    }

    /// Encode a record as a JSON object.
    pub fn to_json(&self, record: &R) -> Result<Json, ConversionError> {
        let mut obj = JsonObject::new();
        for field in &self.fields {
            let encoded = (field.decl.encode)(record).map_err(|e| e.at(field.decl.name))?;
            if let Some(json) = encoded {
                obj.insert(field.external.clone(), json);
            }
        }
        if self.keep_undefined {
            if let Some(extension) = record.extension() {
                for (key, value) in extension.iter() {
                    if !obj.contains_key(key) {
                        obj.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(Json::Object(obj))
    }

    /// Decode a record from a JSON object.
    pub fn from_json(&self, json: &Json) -> Result<R, ConversionError> {
        let obj = json
            .as_object()
            .ok_or_else(|| ConversionError::shape(JsonKind::Object, json))?;

        let mut record = R::default();
        for field in &self.fields {
            match obj.get(&field.external) {
                Some(value) => (field.decl.decode)(&mut record, value)
                    .map_err(|e| e.at(field.decl.name))?,
                None => match &field.decl.absent {
                    Some(absent) => absent(&mut record),
                    None => {
                        return Err(ConversionError::MissingKey {
                            key: field.external.clone(),
                        }
                        .at(field.decl.name));
                    }
                },
            }
        }

        if self.keep_undefined {
            if let Some(extension) = record.extension_mut() {
                *extension = Extension::new();
                for (key, value) in obj {
                    if !self.is_external_name(key) {
                        extension.insert(key.clone(), value.clone());
                    }
                }
                tracing::trace!(
                    record = self.type_name,
                    captured = extension.len(),
                    "kept undefined keys"
                );
            }
        }
        Ok(record)
    }

    /// `{type: object, properties: {...}, required: [...]}` keyed by wire name.
    pub fn schema(&self) -> &Json {
        &self.schema
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The wire key of the internal field `name`.
    pub fn external_name(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.decl.name == name)
            .map(|f| f.external.as_str())
    }

    pub fn keeps_undefined(&self) -> bool {
        self.keep_undefined
    }

    fn is_external_name(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.external == key)
    }
}

impl<R> fmt::Debug for RecordModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordModel")
            .field("type_name", &self.type_name)
            .field(
                "fields",
                &self
                    .fields
                    .iter()
                    .map(|f| (f.decl.name, f.external.as_str()))
                    .collect::<Vec<_>>(),
            )
            .field("keep_undefined", &self.keep_undefined)
            .finish()
    }
}

fn check_unique<'a>(
    type_name: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateField {
                type_name: type_name.to_string(),
                field: name.to_string(),
            });
        }
    }
    Ok(())
}

fn derive_schema<R>(fields: &[ResolvedField<R>]) -> Json {
    let mut properties = JsonObject::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.external.clone(), field.decl.schema.clone());
        if field.decl.required() {
            required.push(Json::String(field.external.clone()));
        }
    }
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
