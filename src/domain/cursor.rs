// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateful traversal over a node's direct children.
//!
//! A [`Cursor`] walks a snapshot of the keys taken when it was created (or rewound).
//! It holds no borrow of the node, so entries can be removed while a traversal is in
//! progress without the next step skipping the entry that follows.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use crate::domain::node::ConfigNode;

/// A traversal position over the direct children of a [`ConfigNode`].
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{ConfigNode, raw_map};
///
/// let mut node = ConfigNode::new(raw_map([("first", 1), ("second", 2), ("third", 3)]), true);
/// let mut visited = Vec::new();
///
/// let mut cursor = node.cursor();
/// while cursor.valid() {
///     let key = cursor.key().cloned().unwrap();
///     if key.as_name() == Some("first") {
///         node.unset(&key).unwrap();
///     }
///     visited.push(key.to_string());
///     cursor.advance(&node);
/// }
///
/// assert_eq!(visited, ["first", "second", "third"]);
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    keys: Vec<ConfigKey>,
    position: usize,
}

impl Cursor {
    pub(crate) fn new(node: &ConfigNode) -> Self {
        Self {
            keys: node.keys().cloned().collect(),
            position: 0,
        }
    }

    /// Moves back to the first entry, re-reading the node's current keys.
    pub fn rewind(&mut self, node: &ConfigNode) {
        *self = Self::new(node);
    }

    /// Returns true while the cursor points at an entry of the snapshot.
    pub fn valid(&self) -> bool {
        self.position < self.keys.len()
    }

    /// Returns the key the cursor points at.
    pub fn key(&self) -> Option<&ConfigKey> {
        self.keys.get(self.position)
    }

    /// Returns the value the cursor points at, or `None` if it was removed.
    pub fn current<'a>(&self, node: &'a ConfigNode) -> Option<&'a ConfigValue> {
        self.key().and_then(|key| node.value(key))
    }

    /// Moves to the next entry that still exists in `node`.
    pub fn advance(&mut self, node: &ConfigNode) {
        if !self.valid() {
            return;
        }
        self.position += 1;
        while self.key().is_some_and(|key| !node.contains_key(key)) {
            self.position += 1;
        }
    }
}
