// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.
//!
//! This module provides a source that reads configuration overrides from
//! command-line arguments. Dotted keys become nested maps, so `--database.host=db`
//! yields `{database: {host: "db"}}`.

use crate::domain::raw::insert_path;
use crate::domain::{ConfigKey, RawMap, RawValue, Result};
use crate::ports::RawSource;

/// Configuration source for command-line arguments.
///
/// Supported argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
/// - `-k value`: Short form with space-separated value
///
/// A flag followed by another flag, or by nothing, is ignored. Later occurrences of
/// the same key override earlier ones.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::CommandLineSource;
/// use cfgtree::ports::RawSource;
///
/// let source = CommandLineSource::from_args(vec!["--database.host=localhost", "--port", "5432"]);
/// let data = source.fetch_all().unwrap();
/// assert_eq!(data.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineSource {
    /// Parsed arguments as key path and value, in argument order
    values: Vec<(Vec<ConfigKey>, String)>,
}

impl CommandLineSource {
    /// Creates a source with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source from a list of arguments (without the program name).
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut source = Self::new();
        source.parse_args(&args);
        source
    }

    /// Creates a source from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfgtree::adapters::CommandLineSource;
    ///
    /// let source = CommandLineSource::from_env_args();
    /// ```
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Returns the number of parsed key/value pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no key/value pair was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();

            if let Some(body) = arg.strip_prefix("--") {
                // --key=value
                if let Some((key, value)) = body.split_once('=') {
                    self.push(key, value);
                    i += 1;
                    continue;
                }
                // --key value
                i += self.take_value(body, args.get(i + 1).map(AsRef::as_ref));
            } else if let Some(key) = arg.strip_prefix('-').filter(|k| k.chars().count() == 1) {
                // -k value
                i += self.take_value(key, args.get(i + 1).map(AsRef::as_ref));
            } else {
                tracing::debug!("Ignoring positional argument: {}", arg);
                i += 1;
            }
        }
    }

    /// Records `key` with `next` as its value unless `next` is another flag.
    /// Returns how many arguments were consumed.
    fn take_value(&mut self, key: &str, next: Option<&str>) -> usize {
        match next {
            Some(value) if !value.starts_with('-') => {
                self.push(key, value);
                2
            }
            _ => {
                tracing::debug!("Ignoring flag without value: {}", key);
                1
            }
        }
    }

    fn push(&mut self, key: &str, value: &str) {
        if key.is_empty() {
            return;
        }
        let path = key.split('.').map(ConfigKey::parse).collect();
        self.values.push((path, value.to_string()));
    }
}

impl RawSource for CommandLineSource {
    fn name(&self) -> &str {
        "cli"
    }

    fn fetch_all(&self) -> Result<RawMap> {
        let mut data = RawMap::new();
        for (path, value) in &self.values {
            insert_path(&mut data, path, RawValue::String(value.clone()));
        }
        Ok(data)
    }
}
