// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic merging of two configuration trees.
//!
//! `merge` folds another tree onto `self`, visiting the other tree's entries in their
//! insertion order:
//!
//! - a key missing from `self` is inserted under the same key;
//! - an integer key present on both sides is appended with `self`'s own numbering, so
//!   two independently built sequences concatenate instead of colliding;
//! - a named key holding a node on both sides is merged recursively;
//! - any other named key present on both sides is replaced by the incoming value.
//!
//! Keys that exist only in `self` are never removed, and existing keys keep their
//! relative order.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::node::{advance_index, ConfigNode};
use std::collections::HashSet;

impl ConfigNode {
    /// Merges `other` onto this node in place.
    ///
    /// Nodes copied over from `other` take this node's `allow_modification`. The
    /// operation is all or nothing: if this node, or any nested node the merge would
    /// descend into, is read-only, nothing is changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::domain::{ConfigNode, RawValue, raw_map};
    ///
    /// let mut base = ConfigNode::new(
    ///     raw_map([("foo", RawValue::from(1)), ("list", RawValue::list(["a", "b"]))]),
    ///     true,
    /// );
    /// let overlay = ConfigNode::new(
    ///     raw_map([("foo", RawValue::from(3)), ("list", RawValue::list(["c"]))]),
    ///     false,
    /// );
    ///
    /// base.merge(&overlay).unwrap();
    /// assert_eq!(base.lookup("foo").and_then(|v| v.as_i64()), Some(3));
    /// assert_eq!(base.lookup("list.2").and_then(|v| v.as_str()), Some("c"));
    /// ```
    pub fn merge(&mut self, other: &ConfigNode) -> Result<()> {
        self.check_mergeable(other)?;
        let before = self.count();
        self.merge_unchecked(other);
        tracing::debug!(
            "Merged {} incoming entries ({} new at top level)",
            other.count(),
            self.count() - before
        );
        Ok(())
    }

    /// Returns a copy of this node with `other` merged onto it.
    pub fn merged(&self, other: &ConfigNode) -> Result<ConfigNode> {
        let mut result = self.clone();
        result.merge(other)?;
        Ok(result)
    }

    fn check_mergeable(&self, other: &ConfigNode) -> Result<()> {
        self.ensure_writable("merge")?;
        // Integer keys claimed by this merge so far, replaying the append numbering.
        let mut claimed = HashSet::new();
        let mut next = self.next_index();
        for (key, incoming) in other {
            match key {
                ConfigKey::Index(n) => {
                    let stored = if self.contains_key(key) || claimed.contains(n) {
                        next.ok_or(ConfigError::IndexExhausted { operation: "merge" })?
                    } else {
                        *n
                    };
                    claimed.insert(stored);
                    next = advance_index(next, stored);
                }
                ConfigKey::Name(_) => {
                    if let (Some(ConfigValue::Node(mine)), ConfigValue::Node(theirs)) =
                        (self.value(key), incoming)
                    {
                        mine.check_mergeable(theirs)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_unchecked(&mut self, other: &ConfigNode) {
        let allow_modification = self.allows_modification();
        for (key, incoming) in other {
            let exists = self.contains_key(key);
            if !exists || key.is_index() {
                let target = if exists {
                    // Checked up front; an exhausted counter never gets here.
                    let Some(next) = self.next_index() else {
                        continue;
                    };
                    ConfigKey::Index(next)
                } else {
                    key.clone()
                };
                self.insert_unchecked(target, adopt(incoming, allow_modification));
                continue;
            }
            match (self.value_mut(key), incoming) {
                (Some(ConfigValue::Node(mine)), ConfigValue::Node(theirs)) => {
                    mine.merge_unchecked(theirs)
                }
                (Some(slot), _) => *slot = adopt(incoming, allow_modification),
                (None, _) => {}
            }
        }
    }
}

/// Copies an incoming value, re-flagging copied nodes with the receiver's flag.
fn adopt(value: &ConfigValue, allow_modification: bool) -> ConfigValue {
    match value {
        ConfigValue::Node(node) => {
            let mut copy = node.clone();
            copy.set_allow_modification(allow_modification);
            ConfigValue::Node(copy)
        }
        other => other.clone(),
    }
}
