use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::FieldValue;

/// A named, client-declared subset of an entity's fields.
///
/// Fragment reads and writes operate only on the declared subset; fields
/// outside it are never touched. The declaration is positional-free: field
/// order does not matter, only membership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    name: String,
    fields: Vec<String>,
}

impl Fragment {
    /// Declare a fragment. At least one field is required.
    pub fn new(name: &str, fields: &[&str]) -> Result<Self, TypeError> {
        if fields.is_empty() {
            return Err(TypeError::EmptyFragment {
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// The fragment's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the fragment declares the given field.
    pub fn declares(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// An owned snapshot of the values behind a [`Fragment`].
///
/// `FragmentData` never aliases store internals: mutating it has no effect on
/// the cache until it is written back through the fragment accessor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentData {
    values: BTreeMap<String, FieldValue>,
}

impl FragmentData {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value, returning `self` for chaining.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }

    /// Add one value in place.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.values.insert(field.to_string(), value.into());
    }

    /// Read one value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Whether the snapshot carries the given field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Iterate over the carried values in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    /// Number of carried values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot carries no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
