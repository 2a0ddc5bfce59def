// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration source adapter.
//!
//! This module provides a parser that turns YAML documents into nested raw data, and
//! a source that reads such a document from a file.

use crate::domain::{list_to_map, ConfigError, RawMap, RawValue, Result};
use crate::ports::{ConfigParser, RawSource};
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum allowed file size for YAML configuration files (10MB)
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "yaml-file";

/// YAML parser implementation.
///
/// Mappings stay mappings and sequences become index-keyed maps. An empty document
/// parses to an empty map.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::YamlParser;
/// use cfgtree::domain::{ConfigKey, RawValue};
/// use cfgtree::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let result = parser.parse("database:\n  host: localhost\n  port: 5432").unwrap();
/// let database = result.get(&ConfigKey::from("database")).and_then(RawValue::as_map).unwrap();
/// assert_eq!(database.get(&ConfigKey::from("port")), Some(&RawValue::from(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<RawMap> {
        if content.trim().is_empty() {
            return Ok(RawMap::new());
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match RawValue::from(value) {
            RawValue::Map(map) => Ok(map),
            RawValue::List(items) => Ok(list_to_map(items)),
            RawValue::Null => Ok(RawMap::new()),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "YAML document must be a mapping or a sequence, found {}",
                    other.kind()
                ),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Configuration source for YAML files.
///
/// The file is checked when the source is created and read again on every
/// [`fetch_all`](RawSource::fetch_all), so a long-lived source always reports the
/// current file contents.
///
/// # Examples
///
/// ```rust,no_run
/// use cfgtree::adapters::YamlFileSource;
///
/// // Load from a specific file
/// let source = YamlFileSource::from_file("/path/to/config.yaml").unwrap();
///
/// // Load from default OS location
/// let source = YamlFileSource::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Clone)]
pub struct YamlFileSource {
    file_path: PathBuf,
    parser: Arc<dyn ConfigParser>,
}

impl YamlFileSource {
    /// Creates a source for a specific file path, parsed with [`YamlParser`].
    ///
    /// Fails with a `SourceError` if the file does not exist, cannot be read, or is
    /// larger than 10MB.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_parser(path, YamlParser::new())
    }

    /// Creates a source for a specific file path with a custom parser.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfgtree::adapters::{YamlFileSource, YamlParser};
    ///
    /// let source = YamlFileSource::with_parser("/etc/myapp/config.yaml", YamlParser::new()).unwrap();
    /// ```
    pub fn with_parser<P, C>(path: P, parser: C) -> Result<Self>
    where
        P: AsRef<Path>,
        C: ConfigParser + 'static,
    {
        let file_path = path.as_ref();

        let canonical_path = file_path.canonicalize().map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Invalid or inaccessible path: {}", display_name(file_path)),
            source: Some(Box::new(e)),
        })?;
        check_size(&canonical_path)?;

        tracing::debug!("Using YAML configuration file {}", canonical_path.display());

        Ok(Self {
            file_path: canonical_path,
            parser: Arc::new(parser),
        })
    }

    /// Creates a source for `config.yaml` in the OS-appropriate configuration
    /// directory of the application.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Creates a source for a custom file name in the default location.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfgtree::adapters::YamlFileSource;
    ///
    /// let source = YamlFileSource::with_filename("myapp", "com.example", "settings.yaml").unwrap();
    /// ```
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            ConfigError::source_error(SOURCE_NAME, "Failed to determine project directories")
        })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the canonical path of the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl fmt::Debug for YamlFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlFileSource")
            .field("file_path", &self.file_path)
            .field("extensions", &self.parser.supported_extensions())
            .finish()
    }
}

impl RawSource for YamlFileSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn fetch_all(&self) -> Result<RawMap> {
        check_size(&self.file_path)?;

        let content = fs::read_to_string(&self.file_path).map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Failed to read configuration file: {}",
                display_name(&self.file_path)
            ),
            source: Some(Box::new(e)),
        })?;

        let data = self.parser.parse(&content).map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Failed to parse {}", display_name(&self.file_path)),
            source: Some(Box::new(e)),
        })?;

        tracing::debug!(
            "Loaded {} top-level entries from {}",
            data.len(),
            self.file_path.display()
        );
        Ok(data)
    }
}

fn check_size(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read file metadata: {}", display_name(path)),
        source: Some(Box::new(e)),
    })?;

    if !metadata.is_file() {
        return Err(ConfigError::source_error(
            SOURCE_NAME,
            format!("Not a regular file: {}", display_name(path)),
        ));
    }

    if metadata.len() > MAX_YAML_FILE_SIZE {
        return Err(ConfigError::source_error(
            SOURCE_NAME,
            format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_YAML_FILE_SIZE
            ),
        ));
    }
    Ok(())
}

// Only the file name ends up in error messages.
fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}
