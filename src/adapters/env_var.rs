// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! This module provides a source that turns environment variables into a nested tree.
//! `APP_DATABASE__HOST=db` with prefix `APP_` becomes `{database: {host: "db"}}`.

use crate::domain::raw::insert_path;
use crate::domain::{ConfigKey, RawMap, RawValue, Result};
use crate::ports::RawSource;
use std::env;

/// Maximum length for environment variable keys
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (1MB)
const MAX_ENV_VALUE_LEN: usize = 1048576;

/// Default separator between nesting levels in a variable name.
pub const DEFAULT_SEPARATOR: &str = "__";

/// Configuration source for environment variables.
///
/// Variables are filtered by an optional prefix (which is stripped), split into path
/// segments on a separator (`__` by default) and, unless disabled, lowercased. Values
/// are always strings. Variables are processed in the order of their normalized key
/// paths, so a variable whose path is a prefix of another (`APP_DB` and
/// `APP_DB__HOST`) yields the nested map. Variables that are not valid UTF-8 are
/// skipped.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::EnvVarSource;
/// use cfgtree::domain::{ConfigKey, RawValue};
/// use cfgtree::ports::RawSource;
///
/// let source = EnvVarSource::with_values([("APP_DB__HOST", "localhost"), ("OTHER", "x")])
///     .prefix("APP_");
/// let data = source.fetch_all().unwrap();
///
/// assert_eq!(data.len(), 1);
/// assert_eq!(
///     data.get(&ConfigKey::from("db")),
///     Some(&RawValue::map([("host", "localhost")]))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarSource {
    prefix: Option<String>,
    separator: String,
    lowercase_keys: bool,
    /// Fixed variables used instead of the process environment
    values: Option<Vec<(String, String)>>,
}

impl EnvVarSource {
    /// Creates a source reading the whole process environment.
    pub fn new() -> Self {
        Self {
            prefix: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            lowercase_keys: true,
            values: None,
        }
    }

    /// Creates a source reading only variables that start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtree::adapters::EnvVarSource;
    ///
    /// let source = EnvVarSource::with_prefix("MYAPP_");
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new().prefix(prefix)
    }

    /// Creates a source over fixed variables instead of the process environment.
    ///
    /// Useful in tests, where mutating the real environment races with other tests.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Some(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Self::new()
        }
    }

    /// Sets the prefix to filter on; it is stripped from the resulting keys.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the separator between nesting levels. An empty separator disables nesting.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets whether keys are converted to lowercase (enabled by default).
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    fn variables(&self) -> Vec<(String, String)> {
        match &self.values {
            Some(values) => values.clone(),
            None => env::vars_os()
                .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                    (Ok(name), Ok(value)) => Some((name, value)),
                    (name, _) => {
                        tracing::debug!(
                            "Skipping environment variable that is not valid UTF-8: {:?}",
                            name
                        );
                        None
                    }
                })
                .collect(),
        }
    }

    /// Turns a variable name into its normalized path segments, or `None` if it is
    /// filtered out.
    fn segments(&self, name: &str) -> Option<Vec<String>> {
        let name = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix.as_str())?,
            None => name,
        };
        if name.is_empty() {
            return None;
        }

        let name = if self.lowercase_keys {
            name.to_lowercase()
        } else {
            name.to_string()
        };

        if self.separator.is_empty() {
            return Some(vec![name]);
        }
        Some(
            name.split(self.separator.as_str())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl Default for EnvVarSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RawSource for EnvVarSource {
    fn name(&self) -> &str {
        "env"
    }

    fn fetch_all(&self) -> Result<RawMap> {
        let mut entries = Vec::new();
        for (name, value) in self.variables() {
            if name.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    name.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }
            if let Some(segments) = self.segments(&name) {
                entries.push((segments, name, value));
            }
        }

        // Sorted on the normalized path, so a parent path always precedes its children.
        entries.sort();

        let mut data = RawMap::new();
        for (segments, _, value) in entries {
            let path: Vec<ConfigKey> = segments.iter().map(|s| ConfigKey::parse(s)).collect();
            insert_path(&mut data, &path, RawValue::String(value));
        }

        tracing::debug!(
            "Loaded {} top-level entries from environment (prefix={:?}, separator={:?}, lowercase={})",
            data.len(),
            self.prefix,
            self.separator,
            self.lowercase_keys
        );

        Ok(data)
    }
}
