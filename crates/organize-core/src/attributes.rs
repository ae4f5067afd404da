//! Per-entry attribute mapping filled by filters and read by templates

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Keys the template engine derives from the entry itself.
///
/// Filters may not contribute attributes under these names.
pub const RESERVED_KEYS: &[&str] = &["path", "basedir", "relative_path"];

/// Attributes collected for one entry.
///
/// Values may be nested mappings (for example the named groups of a regex
/// filter), reachable from templates with dotted access.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap {
    values: BTreeMap<String, Value>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new attribute.
    ///
    /// Fails if the key already exists or is reserved; existing values are
    /// never overwritten.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) || self.values.contains_key(&key) {
            return Err(Error::AttributeCollision { key });
        }
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Merge all attributes of `other` into this map.
    ///
    /// Stops at the first colliding key. Keys merged before the collision
    /// stay in place; callers treat the entry as failed anyway.
    pub fn merge(&mut self, other: AttributeMap) -> Result<()> {
        for (key, value) in other.values {
            self.insert(key, value)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Resolve a dotted path such as `["regex", "year"]`.
    ///
    /// Objects are indexed by key, arrays by position.
    pub fn lookup(&self, path: &[String]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.values.get(first)?;
        for segment in rest {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
