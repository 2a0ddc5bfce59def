// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the configuration tree and its core types.
//!
//! This module holds the tree itself ([`ConfigNode`]), the key and value types it is
//! made of, the merge algorithm and the traversal cursor. It does not know where data
//! comes from; sources live in the adapters layer.

pub mod config_key;
pub mod config_value;
pub mod cursor;
pub mod errors;
mod merge;
pub mod node;
pub mod raw;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::{ConfigValue, Opaque};
pub use cursor::Cursor;
pub use errors::{ConfigError, Result};
pub use node::ConfigNode;
pub use raw::{list_to_map, raw_map, RawMap, RawValue};
