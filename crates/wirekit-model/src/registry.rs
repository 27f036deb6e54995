//! # Model Registry
//!
//! One validated model per record or sequence type, built the first time
//! the type is used (or eagerly through [`register`] /
//! [`register_sequence`]) and kept for the rest of the process.
//!
//! The model is built outside the lock. Building a model declares its
//! fields, which may register nested models; holding the lock across that
//! would deadlock. If two threads race on the same type, both build and the
//! first insert wins. Models are pure functions of the static declaration,
//! so the loser's copy is identical and simply dropped.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use wirekit_core::ConfigError;

use crate::record::{Record, RecordModel};
use crate::sequence::{Sequence, SequenceModel};

type Registered = &'static (dyn Any + Send + Sync);

static MODELS: OnceLock<RwLock<HashMap<TypeId, Registered>>> = OnceLock::new();

fn models() -> &'static RwLock<HashMap<TypeId, Registered>> {
    MODELS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn lookup<M: Any>(models: &HashMap<TypeId, Registered>) -> Option<&'static M> {
    models
        .get(&TypeId::of::<M>())
        .copied()
        .and_then(|model: Registered| model.downcast_ref::<M>())
}

/// The registered model of type `M`, building it with `build` if needed.
fn model_for<M, F>(build: F) -> Result<&'static M, ConfigError>
where
    M: Any + Send + Sync,
    F: FnOnce() -> Result<M, ConfigError>,
{
    let registered = lookup::<M>(&models().read());
    if let Some(model) = registered {
        return Ok(model);
    }

    let built = build()?;

    let mut guard = models().write();
    if let Some(model) = lookup::<M>(&guard) {
        return Ok(model);
    }
    let leaked: &'static M = Box::leak(Box::new(built));
    guard.insert(TypeId::of::<M>(), leaked);
    tracing::debug!(model = type_name::<M>(), registered = guard.len(), "model registered");
    Ok(leaked)
}

/// The model of record type `R`.
///
/// # Errors
///
/// Returns the [`ConfigError`] raised by the definition-time checks.
pub fn record_model<R: Record>() -> Result<&'static RecordModel<R>, ConfigError> {
    model_for(RecordModel::<R>::define)
}

/// The model of sequence type `S`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingItemConversion`] if `S` declares no item
/// conversion.
pub fn sequence_model<S: Sequence>() -> Result<&'static SequenceModel<S>, ConfigError> {
    model_for(SequenceModel::<S>::define)
}

/// Validate and register record type `R` now rather than at first use.
pub fn register<R: Record>() -> Result<(), ConfigError> {
    record_model::<R>().map(|_| ())
}

/// Validate and register sequence type `S` now rather than at first use.
pub fn register_sequence<S: Sequence>() -> Result<(), ConfigError> {
    sequence_model::<S>().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordDecl;
    use std::thread;
    use wirekit_core::{int_conv, string_conv};

    #[derive(Debug, Default)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl Record for Point {
        const FIELDS: &'static [&'static str] = &["x", "y"];

        fn declare() -> Result<RecordDecl<Self>, ConfigError> {
            Ok(RecordDecl::<Self>::new()
                .field("x", int_conv(), |p| &p.x, |p, v| p.x = v)
                .field("y", int_conv(), |p| &p.y, |p, v| p.y = v))
        }
    }

    #[derive(Debug, Default)]
    struct Broken {
        name: String,
    }

    impl Record for Broken {
        const FIELDS: &'static [&'static str] = &["name", "age"];

        fn declare() -> Result<RecordDecl<Self>, ConfigError> {
            Ok(RecordDecl::<Self>::new().field("name", string_conv(), |b| &b.name, |b, v| b.name = v))
        }
    }

    #[test]
    fn test_model_is_built_once() {
        let first = record_model::<Point>().unwrap();
        let second = record_model::<Point>().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_concurrent_first_access_agrees() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| record_model::<Point>().map(|m| m as *const RecordModel<Point> as usize)))
            .collect();
        let addresses: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_rejected_definition_is_not_registered() {
        let err = register::<Broken>().unwrap_err();
        assert!(matches!(err, ConfigError::FieldMismatch { .. }));
        // Still rejected: nothing was cached.
        assert_eq!(register::<Broken>().unwrap_err(), err);
    }
}
