//! Fragment access: reading and writing a declared subset of one entity.
//!
//! A [`FragmentAccessor`] borrows any [`EntityStore`] and moves declared
//! field subsets in and out of it. Reads return owned snapshots
//! ([`norm_types::FragmentData`]); a local edit to a snapshot persists only
//! through an explicit [`FragmentAccessor::write_fragment`] call.

use tracing::debug;

use norm_types::{EntityId, FieldPatch, Fragment, FragmentData};

use crate::error::{StoreError, StoreResult};
use crate::traits::EntityStore;

/// Reads and writes named field subsets against a normalized store.
pub struct FragmentAccessor<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> FragmentAccessor<'a> {
    /// Build an accessor over the given store.
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Read the declared fields of `fragment` from the record at `id`.
    ///
    /// Fails with [`StoreError::FragmentMissing`] if the identity is unknown
    /// and with [`StoreError::FieldMissing`] if any declared field has never
    /// been set. The returned snapshot is detached from the store.
    pub fn read_fragment(
        &self,
        id: &EntityId,
        fragment: &Fragment,
    ) -> StoreResult<FragmentData> {
        let record = self
            .store
            .get(id)?
            .ok_or_else(|| StoreError::FragmentMissing { id: id.clone() })?;

        let mut data = FragmentData::new();
        for field in fragment.fields() {
            let value = record.get(field).ok_or_else(|| StoreError::FieldMissing {
                id: id.clone(),
                field: field.clone(),
            })?;
            data.set(field, value.clone());
        }
        debug!(id = %id, fragment = fragment.name(), "fragment read");
        Ok(data)
    }

    /// Write `data` to the record at `id` through `fragment`.
    ///
    /// The data must cover exactly the declared fields: a declared field
    /// absent from the data fails with [`StoreError::FieldNotCovered`], a
    /// data field outside the declaration fails with
    /// [`StoreError::FieldNotDeclared`]. On success the write delegates to
    /// [`EntityStore::merge`], which notifies subscribers.
    pub fn write_fragment(
        &self,
        id: &EntityId,
        fragment: &Fragment,
        data: FragmentData,
    ) -> StoreResult<()> {
        for field in fragment.fields() {
            if !data.contains_field(field) {
                return Err(StoreError::FieldNotCovered {
                    fragment: fragment.name().to_string(),
                    field: field.clone(),
                });
            }
        }
        for (field, _) in data.iter() {
            if !fragment.declares(field) {
                return Err(StoreError::FieldNotDeclared {
                    fragment: fragment.name().to_string(),
                    field: field.clone(),
                });
            }
        }

        let mut patch = FieldPatch::new();
        for (field, value) in data.iter() {
            patch.set(field, value.clone());
        }
        debug!(id = %id, fragment = fragment.name(), "fragment written");
        self.store.merge(id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use norm_types::FieldValue;
    use proptest::prelude::*;

    fn collection(n: u32) -> EntityId {
        format!("Collection:{n}").parse().unwrap()
    }

    fn followed_fragment() -> Fragment {
        Fragment::new("Res", &["followed"]).unwrap()
    }

    // ---- Test 1: Read of an unknown identity fails typed ----
    #[test]
    fn read_unknown_identity_fails() {
        let store = InMemoryStore::new();
        let accessor = FragmentAccessor::new(&store);

        let err = accessor
            .read_fragment(&collection(1), &followed_fragment())
            .unwrap_err();
        assert!(matches!(err, StoreError::FragmentMissing { .. }));
    }

    // ---- Test 2: Read of a never-set field fails typed ----
    #[test]
    fn read_missing_field_fails() {
        let store = InMemoryStore::new();
        store
            .merge(&collection(1), FieldPatch::new().with("name", "History"))
            .unwrap();
        let accessor = FragmentAccessor::new(&store);

        let err = accessor
            .read_fragment(&collection(1), &followed_fragment())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::FieldMissing { ref field, .. } if field == "followed"
        ));
    }

    // ---- Test 3: Write validates exact coverage ----
    #[test]
    fn write_validates_coverage() {
        let store = InMemoryStore::new();
        let accessor = FragmentAccessor::new(&store);
        let fragment = followed_fragment();

        // Declared field not covered.
        let err = accessor
            .write_fragment(&collection(1), &fragment, FragmentData::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::FieldNotCovered { .. }));

        // Extra field outside the declaration.
        let data = FragmentData::new().with("followed", true).with("name", "x");
        let err = accessor
            .write_fragment(&collection(1), &fragment, data)
            .unwrap_err();
        assert!(matches!(err, StoreError::FieldNotDeclared { .. }));
    }

    // ---- Test 4: Write then read round-trips ----
    #[test]
    fn write_read_round_trip() {
        let store = InMemoryStore::new();
        let accessor = FragmentAccessor::new(&store);
        let fragment = followed_fragment();

        accessor
            .write_fragment(
                &collection(42),
                &fragment,
                FragmentData::new().with("followed", true),
            )
            .unwrap();

        let data = accessor.read_fragment(&collection(42), &fragment).unwrap();
        assert_eq!(data.get("followed").unwrap().as_bool(), Some(true));
    }

    // ---- Test 5: Fragment writes leave undeclared fields alone ----
    #[test]
    fn write_leaves_other_fields_alone() {
        let store = InMemoryStore::new();
        store
            .merge(&collection(1), FieldPatch::new().with("name", "History"))
            .unwrap();
        let accessor = FragmentAccessor::new(&store);

        accessor
            .write_fragment(
                &collection(1),
                &followed_fragment(),
                FragmentData::new().with("followed", true),
            )
            .unwrap();

        let record = store.get(&collection(1)).unwrap().unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::str("History")));
    }

    proptest! {
        // ---- Test 6: Property: fragment round-trip for arbitrary values ----
        #[test]
        fn prop_fragment_round_trip(
            flag in any::<bool>(),
            count in any::<i64>(),
            label in "[a-zA-Z0-9 ]{0,24}",
        ) {
            let store = InMemoryStore::new();
            let accessor = FragmentAccessor::new(&store);
            let fragment =
                Fragment::new("Props", &["followed", "count", "label"]).unwrap();

            let data = FragmentData::new()
                .with("followed", flag)
                .with("count", count)
                .with("label", label.as_str());

            accessor
                .write_fragment(&collection(7), &fragment, data.clone())
                .unwrap();
            let back = accessor.read_fragment(&collection(7), &fragment).unwrap();
            prop_assert_eq!(back, data);
        }
    }
}
