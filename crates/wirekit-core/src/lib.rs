//! # wirekit-core — Conversions Between Domain Values and JSON
//!
//! This crate is the leaf of the wirekit workspace. It defines the
//! [`Conversion`] contract (a bidirectional codec plus the JSON-Schema
//! fragment it accepts) and every conversion that does not need a model
//! registry: primitives, date-times, enumerations and combinators.
//!
//! ## Key Design Principles
//!
//! 1. **One codec, one schema.** A conversion's `schema()` describes
//!    exactly what its `from_json` accepts. Combinators derive their schema
//!    from the wrapped conversion.
//!
//! 2. **Leaves fail, compounds locate.** Leaf conversions return a plain
//!    [`ConversionError`]. Records and sequences prefix it with their field
//!    name or element index through [`ConversionError::at`], producing paths
//!    such as `foo.arr_field.<0>.xyz`.
//!
//! 3. **Declarations fail early.** Anything that can be wrong with a
//!    declaration (an enumeration with mixed value types, a non-bijective
//!    alias table) is a [`ConfigError`] returned when it is built.
//!
//! 4. **Absent is not null.** [`MaybeMissing`] keeps "key not on the wire"
//!    apart from every domain value.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `wirekit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod alias;
pub mod check;
pub mod combinator;
pub mod conversion;
pub mod enumerated;
pub mod error;
pub mod presence;
pub mod primitive;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use alias::AliasTable;
pub use check::{with_type_checks, Predicate, TypeCheck, WithTypeCheckOnDump, WithTypeCheckOnRead};
pub use combinator::{ListConversion, MappingConv, OptionalConv, WithSchema};
pub use conversion::{identity, Conversion, ConversionOf, DynConversion, Identity};
pub use enumerated::{EnumConversion, Enumerated};
pub use error::{BoxError, ConfigError, ConversionError, PathError};
pub use presence::MaybeMissing;
pub use primitive::{
    bool_conv, float_conv, int_conv, json_of, string_conv, JsonOf, Primitive, Scalar,
};
pub use temporal::{
    datetime_iso_format_conv, datetime_timestamp_conv, DateTimeIsoConv, DateTimeTimestampConv,
    ISO_DATETIME_PATTERN,
};
pub use value::{Json, JsonKind, JsonObject};
