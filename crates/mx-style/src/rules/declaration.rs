//! Declaration blocks.

use std::collections::HashMap;
use std::collections::hash_map;
use std::path::Path;
use std::sync::Arc;

/// A raw declaration value together with the file it came from.
///
/// The value is kept as written (whitespace-trimmed); interpretation is
/// deferred until a typed property is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationValue {
    /// The raw value text.
    pub value: String,
    /// The stylesheet the value was read from.
    pub source: Option<Arc<Path>>,
}

impl DeclarationValue {
    /// Create a declaration value.
    pub fn new(value: impl Into<String>, source: Option<Arc<Path>>) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    /// The raw value text.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Directory of the originating stylesheet, for resolving relative paths.
    pub fn source_dir(&self) -> Option<&Path> {
        self.source.as_deref().and_then(Path::parent)
    }
}

/// Property name to raw value mapping of one rule block.
///
/// Every selector of a comma-separated list points at the same table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationTable {
    entries: HashMap<String, DeclarationValue>,
}

impl DeclarationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, replacing any earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: DeclarationValue) {
        self.entries.insert(name.into(), value);
    }

    /// Look up a declaration.
    pub fn get(&self, name: &str) -> Option<&DeclarationValue> {
        self.entries.get(name)
    }

    /// Copy every declaration of `other` into this table, overwriting.
    pub fn extend_from(&mut self, other: &DeclarationTable) {
        self.entries.extend(
            other
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, DeclarationValue> {
        self.entries.iter()
    }
}
