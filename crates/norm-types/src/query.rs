use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Cache key for one query result: operation name plus canonical variables.
///
/// Two calls with the same operation and semantically equal variables must
/// produce equal keys, so variables are canonicalized before serialization:
/// object keys are sorted recursively and the result rendered as compact
/// JSON. `{"limit":15}` and a map built in any insertion order collide on the
/// same key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    operation: String,
    variables: String,
}

impl QueryKey {
    /// Build a key from an operation name and its variables.
    pub fn new(operation: &str, variables: &Value) -> Result<Self, TypeError> {
        let canonical = canonicalize(variables);
        let variables = serde_json::to_string(&canonical)
            .map_err(|e| TypeError::UnserializableVariables(e.to_string()))?;
        Ok(Self {
            operation: operation.to_string(),
            variables,
        })
    }

    /// The operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The canonical serialized variables.
    pub fn variables(&self) -> &str {
        &self.variables
    }
}

impl fmt::Debug for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryKey({} {})", self.operation, self.variables)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.variables)
    }
}

/// Rebuild a JSON value with all object keys in sorted order, recursively.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let mut out = serde_json::Map::new();
            for (k, v) in entries {
                out.insert(k.clone(), canonicalize(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
