// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical configuration tree with deterministic merging.
//!
//! This crate holds configuration as a tree of [`ConfigNode`](domain::ConfigNode)s:
//! nested keyed data that can be read, changed, merged with another tree and sealed
//! against further changes. Trees are usually assembled from several sources (YAML
//! files, environment variables, command-line arguments, built-in defaults), where
//! later sources override earlier ones.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The tree and its core types (`ConfigNode`, `ConfigKey`,
//!   `ConfigValue`, `Cursor`, errors) and the merge algorithm
//! - **Ports**: Trait definitions that define interfaces (`RawSource`, `ConfigParser`)
//! - **Adapters**: Implementations for specific sources (YAML, env vars, CLI, static)
//! - **Service**: The source registry and the assembler that merges sources in order
//!
//! # Merge rules
//!
//! Merging `other` onto `self` visits `other`'s entries in order:
//!
//! - a key missing from `self` is inserted;
//! - an integer key present on both sides is appended under `self`'s next index;
//! - a named key holding a subtree on both sides is merged recursively;
//! - anything else is replaced.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `env`: Enable environment variable support (default)
//! - `cli`: Enable command-line argument support and the `cfgtree` binary (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use cfgtree::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = Assembler::builder()
//!     .with_source(StaticSource::new(raw_map([("port", 8080), ("workers", 4)])))
//!     .with_descriptor(SourceDescriptor::new("static", RawValue::map([("port", 9090)])))
//!     .read_only(true)
//!     .build()?
//!     .assemble()?;
//!
//! assert_eq!(config.get("port").and_then(|v| v.as_i64()), Some(9090));
//! assert_eq!(config.get("workers").and_then(|v| v.as_i64()), Some(4));
//! assert!(config.is_read_only());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::StaticSource;
    pub use crate::domain::{
        raw_map, ConfigError, ConfigKey, ConfigNode, ConfigValue, Cursor, Opaque, RawMap,
        RawValue, Result,
    };
    pub use crate::ports::{ConfigParser, RawSource};
    pub use crate::service::{Assembler, SourceDescriptor, SourceRegistry};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineSource;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarSource;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileSource, YamlParser};
}
