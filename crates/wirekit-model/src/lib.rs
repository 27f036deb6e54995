//! # wirekit-model — Records and Sequences
//!
//! Compound models built on `wirekit-core` conversions. A compound type
//! declares its shape once, statically; the first use (or an explicit
//! [`register`]) validates the declaration, derives the JSON Schema and
//! stores the model for the rest of the process.
//!
//! ## Model Shapes
//!
//! - **Record** (`record.rs`): keyed compound. Fields listed in
//!   [`Record::FIELDS`], each bound to a conversion by [`RecordDecl`].
//!   Fields may be maybe-missing, renamed through an
//!   [`AliasTable`](wirekit_core::AliasTable), and an open record keeps
//!   undeclared keys in its [`Extension`] bag.
//!
//! - **Sequence** (`sequence.rs`): ordered compound. A marker type
//!   implementing [`Sequence`] names the item conversion; [`Arr<S>`] holds
//!   the elements.
//!
//! ## Error Paths
//!
//! Records locate failures under the internal field name and sequences
//! under `<index>`, so a failure deep inside a document reads
//! `Path: 'foo.arr_field.<0>.xyz'`.
//!
//! ## Registration
//!
//! Schemas are computed when a model is registered, never lazily on a
//! read path. The registry (`registry.rs`) is safe under concurrent first
//! access.

pub mod compound;
pub mod record;
pub mod registry;
pub mod sequence;

pub use compound::{Compound, CompoundConv};
pub use record::{Extension, Record, RecordDecl, RecordModel};
pub use registry::{record_model, register, register_sequence, sequence_model};
pub use sequence::{Arr, Sequence, SequenceDecl, SequenceModel};
