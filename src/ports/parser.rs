// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the text of a
//! configuration file into nested raw data.

use crate::domain::{RawMap, Result};

/// A trait for parsing configuration text.
///
/// Parsers keep the nesting of the document: a YAML mapping becomes a map, a sequence
/// becomes a list. There is no flattening into dotted keys.
///
/// # Examples
///
/// ```rust
/// use cfgtree::ports::ConfigParser;
/// use cfgtree::domain::{raw_map, RawMap, Result};
///
/// struct KeyValueParser;
///
/// impl ConfigParser for KeyValueParser {
///     fn parse(&self, content: &str) -> Result<RawMap> {
///         Ok(raw_map(content.lines().filter_map(|line| line.split_once('='))))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["kv"]
///     }
/// }
///
/// let parsed = KeyValueParser.parse("a=1\nb=2").unwrap();
/// assert_eq!(parsed.len(), 2);
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into a nested map.
    ///
    /// # Returns
    ///
    /// * `Ok(RawMap)` - The parsed document
    /// * `Err(ConfigError::ParseError)` - The content is malformed or its top level
    ///   is not a mapping or sequence
    fn parse(&self, content: &str) -> Result<RawMap>;

    /// Returns the file extensions (without the leading dot) supported by this parser.
    fn supported_extensions(&self) -> &[&str];
}
