// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key type for tree navigation.
//!
//! A key is either a name or a non-negative integer. Integer keys are stable identifiers,
//! not dense positions: removing one never renumbers the others.

use serde::{Serialize, Serializer};
use std::fmt;

/// A key inside a [`ConfigNode`](crate::domain::ConfigNode).
///
/// # Examples
///
/// ```
/// use cfgtree::domain::ConfigKey;
///
/// assert_eq!(ConfigKey::from("database"), ConfigKey::Name("database".to_string()));
/// assert_eq!(ConfigKey::from(3u64), ConfigKey::Index(3));
/// assert_eq!(ConfigKey::parse("3"), ConfigKey::Index(3));
/// assert_eq!(ConfigKey::from("3"), ConfigKey::Name("3".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// An integer-like key, as produced by lists and `append`.
    Index(u64),
    /// An associative key.
    Name(String),
}

impl ConfigKey {
    /// Parses a textual key, turning canonical decimal numbers into [`ConfigKey::Index`].
    ///
    /// Only canonical forms qualify: `"0"` and `"42"` become indices, while `"042"`,
    /// `"+1"` and `"-1"` stay names.
    pub fn parse(s: &str) -> Self {
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s == "0" || !s.starts_with('0'));
        if canonical {
            if let Ok(n) = s.parse::<u64>() {
                return ConfigKey::Index(n);
            }
        }
        ConfigKey::Name(s.to_string())
    }

    /// Returns the index if this is an integer-like key.
    pub fn as_index(&self) -> Option<u64> {
        match self {
            ConfigKey::Index(n) => Some(*n),
            ConfigKey::Name(_) => None,
        }
    }

    /// Returns the name if this is an associative key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ConfigKey::Index(_) => None,
            ConfigKey::Name(s) => Some(s),
        }
    }

    /// Returns true for integer-like keys.
    pub fn is_index(&self) -> bool {
        matches!(self, ConfigKey::Index(_))
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey::Name(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey::Name(s.to_string())
    }
}

impl From<&String> for ConfigKey {
    fn from(s: &String) -> Self {
        ConfigKey::Name(s.clone())
    }
}

impl From<&ConfigKey> for ConfigKey {
    fn from(key: &ConfigKey) -> Self {
        key.clone()
    }
}

impl From<u64> for ConfigKey {
    fn from(n: u64) -> Self {
        ConfigKey::Index(n)
    }
}

impl From<u32> for ConfigKey {
    fn from(n: u32) -> Self {
        ConfigKey::Index(u64::from(n))
    }
}

impl From<usize> for ConfigKey {
    fn from(n: usize) -> Self {
        ConfigKey::Index(n as u64)
    }
}

impl From<i64> for ConfigKey {
    fn from(n: i64) -> Self {
        match u64::try_from(n) {
            Ok(n) => ConfigKey::Index(n),
            Err(_) => ConfigKey::Name(n.to_string()),
        }
    }
}

impl From<i32> for ConfigKey {
    fn from(n: i32) -> Self {
        ConfigKey::from(i64::from(n))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKey::Index(n) => write!(f, "{}", n),
            ConfigKey::Name(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for ConfigKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigKey::Index(n) => serializer.serialize_u64(*n),
            ConfigKey::Name(s) => serializer.serialize_str(s),
        }
    }
}
