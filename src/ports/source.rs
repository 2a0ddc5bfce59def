// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `RawSource` trait, the port through which the assembler
//! obtains data. A source knows how to produce one nested map of raw configuration
//! data (from a file, the environment, the command line, ...); it knows nothing about
//! merging or read-only state.

use crate::domain::{RawMap, Result};

/// A producer of nested raw configuration data.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that an assembler holding boxed sources
/// can be shared between threads.
///
/// # Examples
///
/// ```rust
/// use cfgtree::ports::RawSource;
/// use cfgtree::domain::{raw_map, RawMap, Result};
///
/// struct Defaults;
///
/// impl RawSource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn fetch_all(&self) -> Result<RawMap> {
///         Ok(raw_map([("port", 8080)]))
///     }
/// }
///
/// let source = Defaults;
/// assert_eq!(source.fetch_all().unwrap().len(), 1);
/// ```
pub trait RawSource: Send + Sync {
    /// Returns the name of this source.
    ///
    /// This name is used for logging and error messages. It should be a short
    /// identifier like "env", "yaml-file" or "cli".
    fn name(&self) -> &str;

    /// Produces the full nested data of this source.
    ///
    /// # Returns
    ///
    /// * `Ok(RawMap)` - The data, possibly empty
    /// * `Err(ConfigError)` - The source could not be read; the assembler aborts
    fn fetch_all(&self) -> Result<RawMap>;
}
