// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration source implementations.
//!
//! Each adapter implements the [`RawSource`](crate::ports::RawSource) trait to produce
//! nested raw data from one place: a YAML file, the environment, the command line,
//! or a fixed in-memory map.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
pub mod static_source;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineSource;
#[cfg(feature = "env")]
pub use env_var::EnvVarSource;
pub use static_source::StaticSource;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileSource, YamlParser};
