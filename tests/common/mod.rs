// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use cfgtree::domain::{raw_map, ConfigError, ConfigNode, RawMap, RawValue, Result};
use cfgtree::ports::RawSource;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A raw source with predefined data that can be told to fail.
#[derive(Debug, Clone)]
pub struct MockRawSource {
    name: String,
    data: RawMap,
    should_fail: bool,
    fetches: Arc<AtomicUsize>,
}

impl MockRawSource {
    /// Creates an empty mock source with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: RawMap::new(),
            should_fail: false,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds a top-level value.
    pub fn with_value(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Sets whether `fetch_all` fails.
    pub fn with_failure(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    /// Returns a shared counter of `fetch_all` calls.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl RawSource for MockRawSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_all(&self) -> Result<RawMap> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(ConfigError::source_error(&self.name, "Mock fetch failure"));
        }
        Ok(self.data.clone())
    }
}

/// Creates a temporary YAML file with the given content.
///
/// Returns a NamedTempFile that will be automatically deleted when dropped.
pub fn create_temp_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// The nested fixture used throughout the tree tests.
pub fn sample_data() -> RawMap {
    raw_map([
        ("hostname", RawValue::from("all")),
        ("name", RawValue::from("thisname")),
        (
            "db",
            RawValue::map([
                ("host", "127.0.0.1"),
                ("user", "username"),
                ("pass", "password"),
                ("name", "live"),
            ]),
        ),
        (
            "one",
            RawValue::map([("two", RawValue::map([("three", "multi")]))]),
        ),
    ])
}

/// A tree over [`sample_data`].
pub fn sample_tree(allow_modification: bool) -> ConfigNode {
    ConfigNode::new(sample_data(), allow_modification)
}

/// Collects the top-level keys as strings.
pub fn key_names(node: &ConfigNode) -> Vec<String> {
    node.keys().map(ToString::to_string).collect()
}
