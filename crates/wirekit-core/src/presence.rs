//! # Presence Wrapper
//!
//! [`MaybeMissing`] distinguishes "key absent from the wire object" from any
//! domain value, `null` included. A record field declared as maybe-missing
//! is omitted on output when `Absent` and is not listed in the schema's
//! `required` array.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConversionError;

/// A value that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaybeMissing<T> {
    /// The key was present with this value.
    Present(T),
    /// The key was absent.
    Absent,
}

impl<T> Default for MaybeMissing<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> MaybeMissing<T> {
    /// Whether a value is present.
    pub fn has(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The present value.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Absent`] when nothing is present.
    pub fn value(&self) -> Result<&T, ConversionError> {
        match self {
            Self::Present(v) => Ok(v),
            Self::Absent => Err(ConversionError::Absent),
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MaybeMissing<U> {
        match self {
            Self::Present(v) => MaybeMissing::Present(f(v)),
            Self::Absent => MaybeMissing::Absent,
        }
    }
}

impl<T> From<Option<T>> for MaybeMissing<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Absent,
        }
    }
}

impl<T> From<MaybeMissing<T>> for Option<T> {
    fn from(value: MaybeMissing<T>) -> Self {
        value.into_option()
    }
}

impl<T: Serialize> Serialize for MaybeMissing<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for MaybeMissing<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
