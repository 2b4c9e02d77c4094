use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// A scalar field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// The value of one field on an entity record.
///
/// A field holds a scalar, a reference to another entity by [`EntityId`], an
/// ordered list of values, or explicit null. References resolve lazily: the
/// store does not require the target to exist at write time, and a dangling
/// reference only surfaces when something tries to read through it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Explicit null. In a merge patch this overwrites the existing value.
    Null,
    /// A scalar value.
    Scalar(Scalar),
    /// A reference to another entity by typed identity.
    Ref(EntityId),
    /// An ordered list of values (scalars or references).
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Shorthand for a string scalar.
    pub fn str(s: &str) -> Self {
        Self::Scalar(Scalar::Str(s.to_string()))
    }

    /// Returns the boolean payload, if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns the referenced identity, if this is a reference.
    pub fn as_ref_id(&self) -> Option<&EntityId> {
        match self {
            Self::Ref(id) => Some(id),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Scalar(Scalar::Float(x))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

impl From<EntityId> for FieldValue {
    fn from(id: EntityId) -> Self {
        Self::Ref(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Test 1: Conversions produce the expected shapes ----
    #[test]
    fn conversions() {
        assert_eq!(FieldValue::from(true).as_bool(), Some(true));
        assert_eq!(FieldValue::from(3i64), FieldValue::Scalar(Scalar::Int(3)));
        assert_eq!(FieldValue::from("x"), FieldValue::str("x"));

        let id: EntityId = "Collection:1".parse().unwrap();
        let v = FieldValue::from(id.clone());
        assert_eq!(v.as_ref_id(), Some(&id));
    }

    // ---- Test 2: Null is not a boolean ----
    #[test]
    fn null_is_not_bool() {
        assert_eq!(FieldValue::Null.as_bool(), None);
    }
}
