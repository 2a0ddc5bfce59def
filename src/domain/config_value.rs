// SPDX-License-Identifier: MIT OR Apache-2.0

//! Values stored inside a configuration tree.
//!
//! A stored value is a scalar, an opaque external object, or a nested
//! [`ConfigNode`]. There is no type coercion: each accessor only answers for its own
//! variant.

use crate::domain::node::ConfigNode;
use crate::domain::raw::RawValue;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An external object stored in the tree without interpretation.
///
/// Cloning an `Opaque` shares the underlying object. Two opaques are equal when they
/// point at the same object.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::Opaque;
///
/// let handle = Opaque::new(vec![1u8, 2, 3]);
/// assert_eq!(handle.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
/// assert!(handle.downcast_ref::<String>().is_none());
/// assert_eq!(handle, handle.clone());
/// ```
#[derive(Clone)]
pub struct Opaque {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    /// Wraps an arbitrary object.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the object if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns the Rust type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.inner) as *const () == Arc::as_ptr(&other.inner) as *const ()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

/// A value stored under a key of a [`ConfigNode`].
///
/// # Examples
///
/// ```
/// use cfgtree::domain::{ConfigNode, ConfigValue, raw_map};
///
/// let node = ConfigNode::new(raw_map([("port", 5432)]), false);
/// let value = node.get("port").unwrap();
/// assert_eq!(value.as_i64(), Some(5432));
/// assert_eq!(value.as_str(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// An explicit null; distinct from an absent key.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An external object.
    Opaque(Opaque),
    /// A nested subtree.
    Node(ConfigNode),
}

impl ConfigValue {
    /// Wraps raw data, turning nested maps and lists into nodes that carry
    /// `allow_modification`.
    pub fn wrap(raw: RawValue, allow_modification: bool) -> Self {
        match raw {
            RawValue::Null => ConfigValue::Null,
            RawValue::Bool(b) => ConfigValue::Bool(b),
            RawValue::Integer(n) => ConfigValue::Integer(n),
            RawValue::Float(n) => ConfigValue::Float(n),
            RawValue::String(s) => ConfigValue::String(s),
            RawValue::Opaque(o) => ConfigValue::Opaque(o),
            RawValue::List(items) => {
                ConfigValue::Node(ConfigNode::from_list(items, allow_modification))
            }
            RawValue::Map(map) => ConfigValue::Node(ConfigNode::new(map, allow_modification)),
        }
    }

    /// Converts the value back into raw data.
    pub fn into_raw(self) -> RawValue {
        match self {
            ConfigValue::Null => RawValue::Null,
            ConfigValue::Bool(b) => RawValue::Bool(b),
            ConfigValue::Integer(n) => RawValue::Integer(n),
            ConfigValue::Float(n) => RawValue::Float(n),
            ConfigValue::String(s) => RawValue::String(s),
            ConfigValue::Opaque(o) => RawValue::Opaque(o),
            ConfigValue::Node(node) => RawValue::Map(node.into_raw()),
        }
    }

    /// Copies the value into raw data.
    pub fn to_raw(&self) -> RawValue {
        match self {
            ConfigValue::Node(node) => RawValue::Map(node.to_array()),
            other => other.clone().into_raw(),
        }
    }

    /// Returns true for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns true for a nested subtree.
    pub fn is_node(&self) -> bool {
        matches!(self, ConfigValue::Node(_))
    }

    /// Returns the boolean if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the subtree if this is a node.
    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            ConfigValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the external object if it is an opaque value of type `T`.
    pub fn as_opaque<T: Any>(&self) -> Option<&T> {
        match self {
            ConfigValue::Opaque(o) => o.downcast_ref::<T>(),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConfigValue {
                fn from(value: $ty) -> Self {
                    ConfigValue::wrap(RawValue::from(value), true)
                }
            }
        )*
    };
}

impl_from_scalar!(bool, i32, i64, u32, f64, &str, String, Opaque);

impl From<ConfigNode> for ConfigValue {
    fn from(node: ConfigNode) -> Self {
        ConfigValue::Node(node)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(n) => write!(f, "{}", n),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Opaque(o) => write!(f, "<{}>", o.type_name()),
            ConfigValue::Node(node) => write!(f, "<node with {} entries>", node.count()),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(n) => serializer.serialize_i64(*n),
            ConfigValue::Float(n) => serializer.serialize_f64(*n),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Opaque(o) => Err(S::Error::custom(format!(
                "opaque value of type {} cannot be serialized",
                o.type_name()
            ))),
            ConfigValue::Node(node) => node.serialize(serializer),
        }
    }
}
