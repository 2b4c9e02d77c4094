use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Typed identity addressing one entity across the whole cache.
///
/// An `EntityId` pairs an entity type name with an externally-assigned
/// identifier. The canonical string form is `"<Type>:<externalId>"`, e.g.
/// `"Collection:42"`. The server owns the external id; the cache never
/// generates identities.
///
/// Identities are the fundamental addressing primitive: the normalized store
/// is keyed by them, query-result edge lists embed them, and change events
/// name them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    type_name: String,
    external_id: String,
}

impl EntityId {
    /// Build an identity from its two parts.
    ///
    /// The type name must be non-empty and must not contain `:` (it would
    /// make the canonical form ambiguous). The external id must be
    /// non-empty; it may contain `:` since the first separator wins.
    pub fn new(type_name: &str, external_id: &str) -> Result<Self, TypeError> {
        if type_name.is_empty() {
            return Err(TypeError::InvalidIdentity {
                value: format!("{type_name}:{external_id}"),
                reason: "empty type name".into(),
            });
        }
        if type_name.contains(':') {
            return Err(TypeError::InvalidIdentity {
                value: format!("{type_name}:{external_id}"),
                reason: "type name contains ':'".into(),
            });
        }
        if external_id.is_empty() {
            return Err(TypeError::InvalidIdentity {
                value: format!("{type_name}:{external_id}"),
                reason: "empty external id".into(),
            });
        }
        Ok(Self {
            type_name: type_name.to_string(),
            external_id: external_id.to_string(),
        })
    }

    /// The entity type name (the part before `:`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The externally-assigned identifier (the part after the first `:`).
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Canonical string form, `"<Type>:<externalId>"`.
    pub fn canonical(&self) -> String {
        format!("{}:{}", self.type_name, self.external_id)
    }
}

impl FromStr for EntityId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, TypeError> {
        let (type_name, external_id) = s.split_once(':').ok_or_else(|| {
            TypeError::InvalidIdentity {
                value: s.to_string(),
                reason: "missing ':' separator".into(),
            }
        })?;
        Self::new(type_name, external_id)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.canonical())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
