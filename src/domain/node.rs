// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recursive configuration tree.
//!
//! A [`ConfigNode`] owns one level of configuration data and, transitively, every
//! nested level below it. Raw nested data is wrapped into nested nodes eagerly when a
//! node is built, and every node carries its own `allow_modification` flag.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use crate::domain::cursor::Cursor;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::raw::{list_to_map, RawMap, RawValue};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A navigable, optionally mutable configuration tree.
///
/// Children are kept in insertion order. Integer keys are stable identifiers: removing
/// one never shifts another, and `append` never reuses an index that was handed out
/// before, even after the entry holding it was removed.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{ConfigNode, RawValue, raw_map};
///
/// let mut node = ConfigNode::new(
///     raw_map([
///         ("hostname", RawValue::from("all")),
///         ("db", RawValue::map([("host", "127.0.0.1"), ("name", "live")])),
///     ]),
///     true,
/// );
///
/// assert_eq!(node.lookup("db.name").and_then(|v| v.as_str()), Some("live"));
/// node.set("hostname", "staging").unwrap();
/// assert_eq!(node.get("hostname").and_then(|v| v.as_str()), Some("staging"));
///
/// node.set_read_only();
/// assert!(node.set("hostname", "prod").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ConfigNode {
    data: IndexMap<ConfigKey, ConfigValue>,
    allow_modification: bool,
    /// One past the highest integer key ever stored; `None` once `u64::MAX` was used
    next_index: Option<u64>,
}

impl ConfigNode {
    /// Builds a node from raw data, wrapping every nested map or list into a nested
    /// node that inherits `allow_modification`.
    pub fn new(data: RawMap, allow_modification: bool) -> Self {
        let mut node = Self::empty(allow_modification);
        node.data.reserve(data.len());
        for (key, value) in data {
            let value = ConfigValue::wrap(value, allow_modification);
            node.insert_unchecked(key, value);
        }
        node
    }

    /// Builds a node from a list; the items receive the keys `0..n`.
    pub fn from_list(items: Vec<RawValue>, allow_modification: bool) -> Self {
        Self::new(list_to_map(items), allow_modification)
    }

    /// Builds a node from any raw value that is a map or a list.
    pub fn from_raw(raw: RawValue, allow_modification: bool) -> Result<Self> {
        match raw {
            RawValue::Map(map) => Ok(Self::new(map, allow_modification)),
            RawValue::List(items) => Ok(Self::from_list(items, allow_modification)),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "expected a map or a list at the top level, found {}",
                    other.kind()
                ),
                source: None,
            }),
        }
    }

    /// Creates a node without children.
    pub fn empty(allow_modification: bool) -> Self {
        Self {
            data: IndexMap::new(),
            allow_modification,
            next_index: Some(0),
        }
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: impl Into<ConfigKey>) -> Option<&ConfigValue> {
        self.data.get(&key.into())
    }

    /// Returns the value stored under `key`, or `default` if the key is absent.
    ///
    /// A stored null is returned as is; only an absent key yields the default.
    pub fn get_or<'a>(
        &'a self,
        key: impl Into<ConfigKey>,
        default: &'a ConfigValue,
    ) -> &'a ConfigValue {
        self.get(key).unwrap_or(default)
    }

    /// Returns the nested node stored under `key`, if the value is a node.
    pub fn get_node(&self, key: impl Into<ConfigKey>) -> Option<&ConfigNode> {
        self.get(key).and_then(ConfigValue::as_node)
    }

    /// Follows a dotted path such as `db.replicas.0.host`.
    ///
    /// Each segment is tried as a parsed key first (so `0` finds an integer key) and
    /// then as a literal name.
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut value = self.lookup_segment(first)?;
        for segment in segments {
            value = value.as_node()?.lookup_segment(segment)?;
        }
        Some(value)
    }

    fn lookup_segment(&self, segment: &str) -> Option<&ConfigValue> {
        self.data
            .get(&ConfigKey::parse(segment))
            .or_else(|| self.data.get(&ConfigKey::from(segment)))
    }

    /// Returns true if `key` is present. A stored null counts as present.
    pub fn has(&self, key: impl Into<ConfigKey>) -> bool {
        self.data.contains_key(&key.into())
    }

    /// Returns the number of direct children.
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Same as [`count`](Self::count).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the keys are exactly `0..n` in order.
    pub fn is_list(&self) -> bool {
        self.data
            .keys()
            .enumerate()
            .all(|(i, key)| key.as_index() == Some(i as u64))
    }

    /// Iterates over the direct children's keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.data.keys()
    }

    /// Iterates over the direct children in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ConfigKey, ConfigValue> {
        self.data.iter()
    }

    /// Returns a traversal cursor over a snapshot of the current keys.
    ///
    /// The cursor does not borrow the node, so entries may be removed between steps.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    /// Returns the key that `append` would use next.
    ///
    /// `None` once the key `u64::MAX` has been stored; appending then fails.
    pub fn next_index(&self) -> Option<u64> {
        self.next_index
    }

    /// Materializes the subtree into plain nested data.
    ///
    /// Order and key identity are preserved; integer keys are not renumbered.
    pub fn to_array(&self) -> RawMap {
        self.data
            .iter()
            .map(|(key, value)| (key.clone(), value.to_raw()))
            .collect()
    }

    /// Consuming form of [`to_array`](Self::to_array).
    pub fn into_raw(self) -> RawMap {
        self.data
            .into_iter()
            .map(|(key, value)| (key, value.into_raw()))
            .collect()
    }

    /// Stores `value` under `key`, replacing any previous value wholesale.
    ///
    /// Nested raw data is wrapped into a new node that inherits this node's
    /// `allow_modification`.
    pub fn set(&mut self, key: impl Into<ConfigKey>, value: impl Into<RawValue>) -> Result<()> {
        self.ensure_writable("set")?;
        let value = ConfigValue::wrap(value.into(), self.allow_modification);
        self.insert_unchecked(key.into(), value);
        Ok(())
    }

    /// Removes `key`. Other keys keep their identity and relative order.
    pub fn unset(&mut self, key: impl Into<ConfigKey>) -> Result<()> {
        self.ensure_writable("unset")?;
        self.data.shift_remove(&key.into());
        Ok(())
    }

    /// Stores `value` under the next unused integer key and returns that key.
    ///
    /// Fails with `IndexExhausted` once no integer key is left above the highest one
    /// ever stored; existing entries are never overwritten.
    pub fn append(&mut self, value: impl Into<RawValue>) -> Result<ConfigKey> {
        self.ensure_writable("append")?;
        let key = ConfigKey::Index(self.next_index.ok_or(ConfigError::IndexExhausted {
            operation: "append",
        })?);
        let value = ConfigValue::wrap(value.into(), self.allow_modification);
        self.insert_unchecked(key.clone(), value);
        Ok(key)
    }

    /// Returns mutable access to the nested node under `key`.
    ///
    /// Fails when this node is read-only, since replacing a child is a mutation of
    /// this node.
    pub fn get_node_mut(
        &mut self,
        key: impl Into<ConfigKey>,
    ) -> Result<Option<&mut ConfigNode>> {
        self.ensure_writable("get_node_mut")?;
        Ok(match self.data.get_mut(&key.into()) {
            Some(ConfigValue::Node(node)) => Some(node),
            _ => None,
        })
    }

    /// Forbids modification of this node and of every nested node below it.
    ///
    /// There is no way back.
    pub fn set_read_only(&mut self) {
        self.set_allow_modification(false);
        tracing::debug!("Sealed configuration node with {} entries", self.count());
    }

    /// Returns true if this node rejects mutation.
    pub fn is_read_only(&self) -> bool {
        !self.allow_modification
    }

    /// Applies `allow_modification` to this node and all nested nodes.
    pub(crate) fn set_allow_modification(&mut self, allow_modification: bool) {
        self.allow_modification = allow_modification;
        for value in self.data.values_mut() {
            if let ConfigValue::Node(node) = value {
                node.set_allow_modification(allow_modification);
            }
        }
    }

    pub(crate) fn allows_modification(&self) -> bool {
        self.allow_modification
    }

    pub(crate) fn ensure_writable(&self, operation: &'static str) -> Result<()> {
        if self.allow_modification {
            Ok(())
        } else {
            Err(ConfigError::ReadOnlyViolation { operation })
        }
    }

    pub(crate) fn contains_key(&self, key: &ConfigKey) -> bool {
        self.data.contains_key(key)
    }

    pub(crate) fn value_mut(&mut self, key: &ConfigKey) -> Option<&mut ConfigValue> {
        self.data.get_mut(key)
    }

    pub(crate) fn value(&self, key: &ConfigKey) -> Option<&ConfigValue> {
        self.data.get(key)
    }

    pub(crate) fn insert_unchecked(&mut self, key: ConfigKey, value: ConfigValue) {
        if let ConfigKey::Index(n) = key {
            self.next_index = advance_index(self.next_index, n);
        }
        self.data.insert(key, value);
    }
}

/// Moves a next-index counter past `stored`. `None` means exhausted and stays so.
pub(crate) fn advance_index(next: Option<u64>, stored: u64) -> Option<u64> {
    let next = next?;
    Some(next.max(stored.checked_add(1)?))
}

/// Two nodes are equal when they hold equal entries in the same order.
impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len() && self.data.iter().eq(other.data.iter())
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a ConfigKey, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, ConfigKey, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_list() && !self.is_empty() {
            let mut seq = serializer.serialize_seq(Some(self.data.len()))?;
            for value in self.data.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.data.len()))?;
            for (key, value) in &self.data {
                map.serialize_entry(key, value)?;
            }
            map.end()
        }
    }
}
