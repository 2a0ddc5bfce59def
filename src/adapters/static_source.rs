// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration source.

use crate::domain::{RawMap, Result};
use crate::ports::RawSource;

/// A source that always returns the same data.
///
/// Handy for built-in defaults at the bottom of a layered setup, and for tests.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::StaticSource;
/// use cfgtree::domain::raw_map;
/// use cfgtree::ports::RawSource;
///
/// let defaults = StaticSource::new(raw_map([("port", 8080)])).with_name("defaults");
/// assert_eq!(defaults.name(), "defaults");
/// assert_eq!(defaults.fetch_all().unwrap(), raw_map([("port", 8080)]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    data: RawMap,
}

impl StaticSource {
    /// Creates a source named `static` over `data`.
    pub fn new(data: RawMap) -> Self {
        Self {
            name: "static".to_string(),
            data,
        }
    }

    /// Renames the source, for logs and error messages.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl RawSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_all(&self) -> Result<RawMap> {
        Ok(self.data.clone())
    }
}
