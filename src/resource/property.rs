/*!
 * Named properties attached to text units and containers.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named value, optionally read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    // @field: Property name
    pub name: String,

    // @field: Property value
    pub value: String,

    // @field: Value may not be changed by a translator
    #[serde(default)]
    pub read_only: bool,
}

impl Property {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            read_only: false,
        }
    }

    pub fn read_only(name: &str, value: &str) -> Self {
        Self {
            read_only: true,
            ..Self::new(name, value)
        }
    }
}

/// Insertion-ordered property set, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: IndexMap<String, Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.entries.get_mut(name)
    }

    /// Add or replace a property and return the stored value
    pub fn set(&mut self, property: Property) -> &mut Property {
        let name = property.name.clone();
        let (index, _) = self.entries.insert_full(name, property);
        &mut self.entries[index]
    }

    /// Existing property, or the one built by `make` after it is stored
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> Property) -> &mut Property {
        self.entries.entry(name.to_string()).or_insert_with(make)
    }

    /// Remove a property, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<Property> {
        self.entries.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
