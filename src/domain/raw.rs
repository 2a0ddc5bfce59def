// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw nested data exchanged with configuration sources.
//!
//! Sources hand the tree plain nested data ([`RawValue`] / [`RawMap`]); the tree hands
//! the same shape back from [`ConfigNode::to_array`](crate::domain::ConfigNode::to_array).

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::{ConfigValue, Opaque};
use crate::domain::node::ConfigNode;
use indexmap::IndexMap;

/// An insertion-ordered map of raw values.
pub type RawMap = IndexMap<ConfigKey, RawValue>;

/// Plain nested configuration data.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{RawValue, raw_map};
///
/// let db = raw_map([("host", RawValue::from("localhost")), ("port", RawValue::from(5432))]);
/// let data = RawValue::map([("db", RawValue::Map(db))]);
/// assert!(data.as_map().is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An external object carried through untouched.
    Opaque(Opaque),
    /// A sequence; its items receive the keys `0..n`.
    List(Vec<RawValue>),
    /// A keyed mapping.
    Map(RawMap),
}

impl RawValue {
    /// Builds a [`RawValue::Map`] from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ConfigKey>,
        V: Into<RawValue>,
    {
        RawValue::Map(raw_map(entries))
    }

    /// Builds a [`RawValue::List`] from items.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the map if this value is a mapping.
    pub fn as_map(&self) -> Option<&RawMap> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for mappings and sequences.
    pub fn is_nested(&self) -> bool {
        matches!(self, RawValue::Map(_) | RawValue::List(_))
    }

    /// Returns a short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Integer(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::Opaque(_) => "object",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "map",
        }
    }
}

/// Builds a [`RawMap`] from key/value pairs.
pub fn raw_map<I, K, V>(entries: I) -> RawMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<ConfigKey>,
    V: Into<RawValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Converts a list into the equivalent index-keyed map.
pub fn list_to_map(items: Vec<RawValue>) -> RawMap {
    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| (ConfigKey::from(i), v))
        .collect()
}

/// Inserts `value` at `path`, creating intermediate maps as needed.
///
/// A non-map value sitting on an intermediate segment is replaced by a map.
pub(crate) fn insert_path(map: &mut RawMap, path: &[ConfigKey], value: RawValue) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = map;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| RawValue::Map(RawMap::new()));
        if !matches!(slot, RawValue::Map(_)) {
            *slot = RawValue::Map(RawMap::new());
        }
        current = match slot {
            RawValue::Map(inner) => inner,
            _ => return,
        };
    }
    current.insert(last.clone(), value);
}

impl From<()> for RawValue {
    fn from(_: ()) -> Self {
        RawValue::Null
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Integer(i64::from(n))
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Integer(n)
    }
}

impl From<u32> for RawValue {
    fn from(n: u32) -> Self {
        RawValue::Integer(i64::from(n))
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Float(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        RawValue::List(items)
    }
}

impl From<RawMap> for RawValue {
    fn from(map: RawMap) -> Self {
        RawValue::Map(map)
    }
}

impl From<Opaque> for RawValue {
    fn from(o: Opaque) -> Self {
        RawValue::Opaque(o)
    }
}

impl From<ConfigNode> for RawValue {
    fn from(node: ConfigNode) -> Self {
        RawValue::Map(node.into_raw())
    }
}

impl From<ConfigValue> for RawValue {
    fn from(value: ConfigValue) -> Self {
        value.into_raw()
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Value> for RawValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                None => RawValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => RawValue::String(s),
            Value::Sequence(seq) => RawValue::List(seq.into_iter().map(Into::into).collect()),
            Value::Mapping(mapping) => {
                let mut map = RawMap::with_capacity(mapping.len());
                for (key, val) in mapping {
                    match yaml_key(&key) {
                        Some(key) => {
                            map.insert(key, val.into());
                        }
                        None => tracing::debug!("Skipping non-scalar YAML mapping key: {:?}", key),
                    }
                }
                RawValue::Map(map)
            }
            Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

#[cfg(feature = "yaml")]
fn yaml_key(key: &serde_yaml::Value) -> Option<ConfigKey> {
    use serde_yaml::Value;
    match key {
        Value::String(s) => Some(ConfigKey::from(s.as_str())),
        Value::Number(n) => Some(match n.as_u64() {
            Some(i) => ConfigKey::Index(i),
            None => ConfigKey::Name(n.to_string()),
        }),
        Value::Bool(b) => Some(ConfigKey::Name(b.to_string())),
        Value::Null => Some(ConfigKey::Name(String::new())),
        Value::Tagged(tagged) => yaml_key(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
