// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table of source factories, keyed by source type.
//!
//! A [`SourceDescriptor`](crate::service::SourceDescriptor) names a source type and
//! carries raw configuration for it; the registry maps that type to a factory that
//! builds the matching [`RawSource`].

use crate::domain::{list_to_map, ConfigError, ConfigKey, RawMap, RawValue, Result};
use crate::ports::RawSource;
use indexmap::IndexMap;
use std::fmt;

/// Builds a source from the `config` part of a descriptor.
pub type SourceFactory = Box<dyn Fn(&RawValue) -> Result<Box<dyn RawSource>> + Send + Sync>;

/// Registered source factories.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::StaticSource;
/// use cfgtree::domain::{raw_map, RawValue};
/// use cfgtree::service::SourceRegistry;
///
/// let mut registry = SourceRegistry::new();
/// registry
///     .register("defaults", |_config: &RawValue| {
///         Ok(Box::new(StaticSource::new(raw_map([("port", 8080)]))) as _)
///     })
///     .unwrap();
///
/// assert!(registry.contains("defaults"));
/// assert!(registry.register("defaults", |_: &RawValue| unreachable!()).is_err());
/// ```
#[derive(Default)]
pub struct SourceRegistry {
    factories: IndexMap<String, SourceFactory>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in source types.
    ///
    /// | type     | `config`                                                        |
    /// |----------|-----------------------------------------------------------------|
    /// | `static` | the data itself (map or list)                                   |
    /// | `yaml`   | a file path, or `{path}`, or `{app, qualifier, filename}`       |
    /// | `env`    | null, or `{prefix, separator, lowercase}`                       |
    /// | `cli`    | null for the process arguments, a list of arguments, or `{args}`|
    ///
    /// `yaml`, `env` and `cli` are only present when the matching feature is enabled.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert("static", Box::new(static_factory));
        #[cfg(feature = "yaml")]
        registry.insert("yaml", Box::new(yaml_factory));
        #[cfg(feature = "env")]
        registry.insert("env", Box::new(env_factory));
        #[cfg(feature = "cli")]
        registry.insert("cli", Box::new(cli_factory));
        registry
    }

    /// Registers a factory under `source_type`.
    ///
    /// Fails with `InvalidRegistration` if the identifier is blank or already taken.
    pub fn register<F>(&mut self, source_type: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&RawValue) -> Result<Box<dyn RawSource>> + Send + Sync + 'static,
    {
        let source_type = source_type.into();
        if source_type.trim().is_empty() {
            return Err(ConfigError::InvalidRegistration {
                source_type,
                message: "source type must not be empty".to_string(),
            });
        }
        if self.factories.contains_key(&source_type) {
            return Err(ConfigError::InvalidRegistration {
                source_type,
                message: "source type is already registered".to_string(),
            });
        }
        self.insert(source_type, Box::new(factory));
        Ok(())
    }

    /// Returns true if `source_type` has a factory.
    pub fn contains(&self, source_type: &str) -> bool {
        self.factories.contains_key(source_type)
    }

    /// Iterates over the registered source types in registration order.
    pub fn source_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Builds a source of type `source_type` from `config`.
    ///
    /// `position` names the descriptor in errors: an unknown type fails with
    /// `UnknownSourceType`, and a factory error is reported as `InvalidDescriptor`
    /// with the factory's error as its cause.
    pub fn create(
        &self,
        position: &str,
        source_type: &str,
        config: &RawValue,
    ) -> Result<Box<dyn RawSource>> {
        let factory =
            self.factories
                .get(source_type)
                .ok_or_else(|| ConfigError::UnknownSourceType {
                    position: position.to_string(),
                    source_type: source_type.to_string(),
                })?;
        let source = factory(config).map_err(|e| ConfigError::InvalidDescriptor {
            position: position.to_string(),
            message: format!("cannot build '{}' source: {}", source_type, e),
            source: Some(Box::new(e)),
        })?;
        tracing::debug!(
            "Created '{}' source of type '{}' for position {}",
            source.name(),
            source_type,
            position
        );
        Ok(source)
    }

    fn insert(&mut self, source_type: impl Into<String>, factory: SourceFactory) {
        self.factories.insert(source_type.into(), factory);
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("source_types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn invalid_config(source_type: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::source_error(source_type, message)
}

#[cfg_attr(not(any(feature = "yaml", feature = "env", feature = "cli")), allow(dead_code))]
fn field<'a>(map: &'a RawMap, name: &str) -> Option<&'a RawValue> {
    map.get(&ConfigKey::from(name))
}

#[cfg_attr(not(any(feature = "yaml", feature = "env")), allow(dead_code))]
fn str_field<'a>(map: &'a RawMap, name: &str) -> Option<&'a str> {
    field(map, name).and_then(RawValue::as_str)
}

fn static_factory(config: &RawValue) -> Result<Box<dyn RawSource>> {
    use crate::adapters::StaticSource;

    let data = match config {
        RawValue::Map(map) => map.clone(),
        RawValue::List(items) => list_to_map(items.clone()),
        RawValue::Null => RawMap::new(),
        other => {
            return Err(invalid_config(
                "static",
                format!("expected a map or a list, found {}", other.kind()),
            ))
        }
    };
    Ok(Box::new(StaticSource::new(data)))
}

#[cfg(feature = "yaml")]
fn yaml_factory(config: &RawValue) -> Result<Box<dyn RawSource>> {
    use crate::adapters::YamlFileSource;

    let source = match config {
        RawValue::String(path) => YamlFileSource::from_file(path)?,
        RawValue::Map(map) => match (str_field(map, "path"), str_field(map, "app")) {
            (Some(path), _) => YamlFileSource::from_file(path)?,
            (None, Some(app)) => YamlFileSource::with_filename(
                app,
                str_field(map, "qualifier").unwrap_or(""),
                str_field(map, "filename").unwrap_or("config.yaml"),
            )?,
            (None, None) => {
                return Err(invalid_config("yaml", "expected a 'path' or an 'app' entry"))
            }
        },
        other => {
            return Err(invalid_config(
                "yaml",
                format!("expected a file path or a map, found {}", other.kind()),
            ))
        }
    };
    Ok(Box::new(source))
}

#[cfg(feature = "env")]
fn env_factory(config: &RawValue) -> Result<Box<dyn RawSource>> {
    use crate::adapters::EnvVarSource;

    let mut source = EnvVarSource::new();
    match config {
        RawValue::Null => {}
        RawValue::Map(map) => {
            if let Some(prefix) = str_field(map, "prefix") {
                source = source.prefix(prefix);
            }
            if let Some(separator) = str_field(map, "separator") {
                source = source.separator(separator);
            }
            match field(map, "lowercase") {
                None => {}
                Some(RawValue::Bool(enabled)) => source = source.lowercase_keys(*enabled),
                Some(other) => {
                    return Err(invalid_config(
                        "env",
                        format!("'lowercase' must be a boolean, found {}", other.kind()),
                    ))
                }
            }
        }
        other => {
            return Err(invalid_config(
                "env",
                format!("expected null or a map, found {}", other.kind()),
            ))
        }
    }
    Ok(Box::new(source))
}

#[cfg(feature = "cli")]
fn cli_factory(config: &RawValue) -> Result<Box<dyn RawSource>> {
    use crate::adapters::CommandLineSource;

    fn arguments(items: &[RawValue]) -> Result<Vec<&str>> {
        items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    invalid_config(
                        "cli",
                        format!("arguments must be strings, found {}", item.kind()),
                    )
                })
            })
            .collect()
    }

    let source = match config {
        RawValue::Null => CommandLineSource::from_env_args(),
        RawValue::List(items) => CommandLineSource::from_args(arguments(items)?),
        RawValue::Map(map) => match field(map, "args") {
            Some(RawValue::List(items)) => CommandLineSource::from_args(arguments(items)?),
            _ => return Err(invalid_config("cli", "expected an 'args' list")),
        },
        other => {
            return Err(invalid_config(
                "cli",
                format!("expected null, a list or a map, found {}", other.kind()),
            ))
        }
    };
    Ok(Box::new(source))
}
