//! # Alias Tables — Internal ⇄ External Field Names
//!
//! An [`AliasTable`] renames record fields on the wire. It is a partial
//! bijection: every internal name maps to at most one external name and
//! vice versa. Names not in the table map to themselves.
//!
//! Tables can be loaded from a configuration document as a plain
//! `{internal: external}` object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Partial bijection between internal and external names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AliasTable {
    to_external: BTreeMap<String, String>,
    to_internal: BTreeMap<String, String>,
}

impl AliasTable {
    /// Build a table from `(internal, external)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateAlias`] if a name appears twice on
    /// either side.
    pub fn new<I, A, B>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut table = Self::default();
        for (internal, external) in pairs {
            let (internal, external) = (internal.into(), external.into());
            if table.to_external.contains_key(&internal) {
                return Err(ConfigError::DuplicateAlias { name: internal });
            }
            if table.to_internal.contains_key(&external) {
                return Err(ConfigError::DuplicateAlias { name: external });
            }
            table.to_internal.insert(external.clone(), internal.clone());
            table.to_external.insert(internal, external);
        }
        Ok(table)
    }

    /// The external name for `internal`.
    pub fn aliased<'a>(&'a self, internal: &'a str) -> &'a str {
        self.to_external
            .get(internal)
            .map(String::as_str)
            .unwrap_or(internal)
    }

    /// The internal name for `external`.
    pub fn actual<'a>(&'a self, external: &'a str) -> &'a str {
        self.to_internal
            .get(external)
            .map(String::as_str)
            .unwrap_or(external)
    }

    /// Whether the table renames nothing.
    pub fn is_identity(&self) -> bool {
        self.to_external.iter().all(|(k, v)| k == v)
    }

    /// `(internal, external)` pairs in internal-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.to_external
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.to_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_external.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for AliasTable {
    type Error = ConfigError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl From<AliasTable> for BTreeMap<String, String> {
    fn from(table: AliasTable) -> Self {
        table.to_external
    }
}
