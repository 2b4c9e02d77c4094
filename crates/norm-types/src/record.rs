use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// The known fields of one entity.
///
/// An `EntityRecord` is a mapping from field name to [`FieldValue`]. Records
/// are created the first time any write mentions their identity and updated
/// by shallow merges; fields are never individually deleted, only overwritten
/// (possibly with explicit null).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl EntityRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one field.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Whether the field has ever been set (explicit null counts as set).
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set one field, returning `self` for chaining in construction code.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Set one field in place.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Shallow-merge a patch into this record.
    ///
    /// Every field present in the patch overwrites the existing value,
    /// including explicit [`FieldValue::Null`]. Fields absent from the patch
    /// are untouched. The merge is all-or-nothing: it cannot partially fail.
    pub fn merge(&mut self, patch: FieldPatch) {
        for (field, value) in patch.fields {
            self.fields.insert(field, value);
        }
    }

    /// Iterate over all known fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Number of known fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field has ever been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A partial record applied to an [`EntityRecord`] via shallow merge.
///
/// Presence semantics matter: a field carried with `FieldValue::Null`
/// overwrites, a field not carried at all leaves the existing value alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one field to the patch, returning `self` for chaining.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Add one field to the patch in place.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Iterate over the carried fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Whether the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Test 1: Merge overwrites carried fields only ----
    #[test]
    fn merge_overwrites_carried_fields_only() {
        let mut record = EntityRecord::new()
            .with("name", "Lenin at Finland Station")
            .with("followed", false);

        record.merge(FieldPatch::new().with("followed", true));

        assert_eq!(record.get("followed").unwrap().as_bool(), Some(true));
        assert_eq!(
            record.get("name"),
            Some(&FieldValue::str("Lenin at Finland Station"))
        );
    }

    // ---- Test 2: Explicit null overwrites ----
    #[test]
    fn explicit_null_overwrites() {
        let mut record = EntityRecord::new().with("icon", "eye.svg");
        record.merge(FieldPatch::new().with("icon", FieldValue::Null));

        assert_eq!(record.get("icon"), Some(&FieldValue::Null));
        assert!(record.contains_field("icon"));
    }

    // ---- Test 3: Merge creates fields that never existed ----
    #[test]
    fn merge_creates_new_fields() {
        let mut record = EntityRecord::new();
        record.merge(FieldPatch::new().with("followed", true));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("followed").unwrap().as_bool(), Some(true));
    }
}
