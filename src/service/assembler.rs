// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds one configuration tree out of several sources.
//!
//! Sources are described either as ready [`RawSource`] values or as
//! [`SourceDescriptor`]s resolved through a [`SourceRegistry`]. Every descriptor is
//! resolved when the assembler is built, before any source is read. Assembling then
//! fetches each source in order and merges it onto the result, so later sources
//! override earlier ones.

use crate::domain::{ConfigError, ConfigKey, ConfigNode, RawValue, Result};
use crate::ports::RawSource;
use crate::service::registry::SourceRegistry;
use std::fmt;

/// Names a source type and carries the raw configuration for its factory.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceDescriptor {
    /// Registered source type, such as `yaml` or `env`
    pub source_type: String,
    /// Configuration handed to the factory
    pub config: RawValue,
}

impl SourceDescriptor {
    /// Creates a descriptor.
    pub fn new(source_type: impl Into<String>, config: impl Into<RawValue>) -> Self {
        Self {
            source_type: source_type.into(),
            config: config.into(),
        }
    }

    /// Reads a descriptor list from raw data shaped like
    /// `{sources: [{type: ..., config: ...}, ...]}`.
    ///
    /// Errors name the offending position: `sources` for a problem with the list
    /// itself, the entry's key for a problem with one entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgtree::domain::RawValue;
    /// use cfgtree::service::SourceDescriptor;
    ///
    /// let raw = RawValue::map([(
    ///     "sources",
    ///     RawValue::list([RawValue::map([
    ///         ("type", RawValue::from("env")),
    ///         ("config", RawValue::map([("prefix", "APP_")])),
    ///     ])]),
    /// )]);
    ///
    /// let descriptors = SourceDescriptor::list_from_raw(&raw).unwrap();
    /// assert_eq!(descriptors[0].source_type, "env");
    ///
    /// let err = SourceDescriptor::list_from_raw(&RawValue::map([("sources", 1)])).unwrap_err();
    /// assert!(err.to_string().contains("sources"));
    /// ```
    pub fn list_from_raw(raw: &RawValue) -> Result<Vec<SourceDescriptor>> {
        Ok(Self::positioned_from_raw(raw)?
            .into_iter()
            .map(|(_, descriptor)| descriptor)
            .collect())
    }

    /// Like [`list_from_raw`](Self::list_from_raw), keeping each entry's key.
    fn positioned_from_raw(raw: &RawValue) -> Result<Vec<(ConfigKey, SourceDescriptor)>> {
        let root = raw.as_map().ok_or_else(|| {
            ConfigError::invalid_descriptor(
                "root",
                format!("expected a map with a 'sources' entry, found {}", raw.kind()),
            )
        })?;

        let entries: Vec<(ConfigKey, &RawValue)> = match root.get(&ConfigKey::from("sources")) {
            None => {
                return Err(ConfigError::invalid_descriptor(
                    "sources",
                    "missing 'sources' entry",
                ))
            }
            Some(RawValue::List(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| (ConfigKey::from(i), item))
                .collect(),
            Some(RawValue::Map(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Some(other) => {
                return Err(ConfigError::invalid_descriptor(
                    "sources",
                    format!("expected a list of descriptors, found {}", other.kind()),
                ))
            }
        };

        entries
            .into_iter()
            .map(|(position, entry)| {
                Self::from_entry(&position, entry).map(|descriptor| (position, descriptor))
            })
            .collect()
    }

    fn from_entry(position: &ConfigKey, entry: &RawValue) -> Result<Self> {
        let map = entry.as_map().ok_or_else(|| {
            ConfigError::invalid_descriptor(
                position,
                format!("expected a map, found {}", entry.kind()),
            )
        })?;

        let source_type = match map.get(&ConfigKey::from("type")) {
            None => {
                return Err(ConfigError::invalid_descriptor(
                    position,
                    "missing 'type' entry",
                ))
            }
            Some(RawValue::String(s)) => s.clone(),
            Some(other) => {
                return Err(ConfigError::invalid_descriptor(
                    position,
                    format!("'type' must be a string, found {}", other.kind()),
                ))
            }
        };

        let config = map.get(&ConfigKey::from("config")).ok_or_else(|| {
            ConfigError::invalid_descriptor(position, "missing 'config' entry")
        })?;

        Ok(Self {
            source_type,
            config: config.clone(),
        })
    }
}

/// An ordered list of resolved sources.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::StaticSource;
/// use cfgtree::domain::{raw_map, RawValue};
/// use cfgtree::service::{Assembler, SourceDescriptor};
///
/// # fn main() -> cfgtree::domain::Result<()> {
/// let assembler = Assembler::builder()
///     .with_source(StaticSource::new(raw_map([("port", 8080), ("debug", 0)])))
///     .with_descriptor(SourceDescriptor::new("static", RawValue::map([("debug", 1)])))
///     .read_only(true)
///     .build()?;
///
/// let config = assembler.assemble()?;
/// assert_eq!(config.get("debug").and_then(|v| v.as_i64()), Some(1));
/// assert!(config.is_read_only());
/// # Ok(())
/// # }
/// ```
pub struct Assembler {
    sources: Vec<Box<dyn RawSource>>,
    read_only: bool,
}

impl Assembler {
    /// Creates a builder using the built-in registry.
    pub fn builder() -> AssemblerBuilder {
        AssemblerBuilder::new()
    }

    /// Resolves a raw descriptor list (see [`SourceDescriptor::list_from_raw`])
    /// through `registry`.
    pub fn from_raw(raw: &RawValue, registry: &SourceRegistry) -> Result<Self> {
        let descriptors = SourceDescriptor::positioned_from_raw(raw)?;
        let sources = descriptors
            .iter()
            .map(|(position, d)| registry.create(&position.to_string(), &d.source_type, &d.config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            sources,
            read_only: false,
        })
    }

    /// Returns the source names in merge order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if there are no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetches every source in order and merges the results into one tree.
    ///
    /// The first failing source aborts the whole operation; no partial tree is
    /// returned. The tree is writable unless the assembler was built with
    /// `read_only(true)`.
    pub fn assemble(&self) -> Result<ConfigNode> {
        let mut config = ConfigNode::empty(true);

        for source in &self.sources {
            let data = source.fetch_all().map_err(|e| match e {
                e @ ConfigError::SourceError { .. } => e,
                other => ConfigError::SourceError {
                    source_name: source.name().to_string(),
                    message: "Failed to fetch configuration".to_string(),
                    source: Some(Box::new(other)),
                },
            })?;
            tracing::debug!(
                "Fetched {} top-level entries from source '{}'",
                data.len(),
                source.name()
            );
            config.merge(&ConfigNode::new(data, true))?;
        }

        if self.read_only {
            config.set_read_only();
        }

        tracing::info!(
            "Assembled configuration from {} sources ({} top-level entries)",
            self.sources.len(),
            config.count()
        );
        Ok(config)
    }
}

impl fmt::Debug for Assembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembler")
            .field("sources", &self.source_names())
            .field("read_only", &self.read_only)
            .finish()
    }
}

enum PendingSource {
    Descriptor(SourceDescriptor),
    Ready(Box<dyn RawSource>),
}

/// Builder for an [`Assembler`].
///
/// Sources keep the order in which they were added, whether they were given as
/// descriptors or as ready sources.
#[derive(Default)]
pub struct AssemblerBuilder {
    registry: Option<SourceRegistry>,
    pending: Vec<PendingSource>,
    read_only: bool,
}

impl AssemblerBuilder {
    /// Creates a builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves descriptors through `registry` instead of the built-in one.
    pub fn with_registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Adds a source by descriptor.
    pub fn with_descriptor(mut self, descriptor: SourceDescriptor) -> Self {
        self.pending.push(PendingSource::Descriptor(descriptor));
        self
    }

    /// Adds every descriptor of a list.
    pub fn with_descriptors(
        mut self,
        descriptors: impl IntoIterator<Item = SourceDescriptor>,
    ) -> Self {
        self.pending
            .extend(descriptors.into_iter().map(PendingSource::Descriptor));
        self
    }

    /// Adds a ready source.
    pub fn with_source(mut self, source: impl RawSource + 'static) -> Self {
        self.pending.push(PendingSource::Ready(Box::new(source)));
        self
    }

    /// Adds a ready, boxed source.
    pub fn with_boxed_source(mut self, source: Box<dyn RawSource>) -> Self {
        self.pending.push(PendingSource::Ready(source));
        self
    }

    /// Seals the assembled tree when set.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Resolves every descriptor and returns the assembler.
    ///
    /// Fails on the first descriptor whose type is unknown or whose factory rejects
    /// its configuration; the error names the descriptor's position among all added
    /// sources. No source is fetched here.
    pub fn build(self) -> Result<Assembler> {
        let registry = self.registry.unwrap_or_else(SourceRegistry::with_defaults);

        let sources = self
            .pending
            .into_iter()
            .enumerate()
            .map(|(i, pending)| match pending {
                PendingSource::Ready(source) => Ok(source),
                PendingSource::Descriptor(d) => {
                    registry.create(&i.to_string(), &d.source_type, &d.config)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Built assembler with {} sources", sources.len());
        Ok(Assembler {
            sources,
            read_only: self.read_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticSource;
    use crate::domain::{raw_map, ConfigValue, RawMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn descriptor_list(entries: Vec<RawValue>) -> RawValue {
        RawValue::map([("sources", RawValue::List(entries))])
    }

    fn static_entry(data: RawValue) -> RawValue {
        RawValue::map([("type", RawValue::from("static")), ("config", data)])
    }

    fn position_of(err: &ConfigError) -> Option<&str> {
        match err {
            ConfigError::InvalidDescriptor { position, .. } => Some(position),
            ConfigError::UnknownSourceType { position, .. } => Some(position),
            _ => None,
        }
    }

    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl RawSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch_all(&self) -> Result<RawMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawMap::new())
        }
    }

    struct ParseFailure;

    impl RawSource for ParseFailure {
        fn name(&self) -> &str {
            "parse-failure"
        }

        fn fetch_all(&self) -> Result<RawMap> {
            Err(ConfigError::ParseError {
                message: "bad".to_string(),
                source: None,
            })
        }
    }

    #[test]
    fn test_list_from_raw_reads_entries_in_order() {
        let raw = descriptor_list(vec![
            static_entry(RawValue::map([("a", 1)])),
            RawValue::map([
                ("type", RawValue::from("env")),
                ("config", RawValue::Null),
            ]),
        ]);
        let descriptors = SourceDescriptor::list_from_raw(&raw).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0], SourceDescriptor::new("static", RawValue::map([("a", 1)])));
        assert_eq!(descriptors[1].source_type, "env");
        assert_eq!(descriptors[1].config, RawValue::Null);
    }

    #[test]
    fn test_list_from_raw_accepts_keyed_entries() {
        let raw = RawValue::map([(
            "sources",
            RawValue::map([("defaults", static_entry(RawValue::Null))]),
        )]);
        assert_eq!(SourceDescriptor::list_from_raw(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_list_from_raw_errors_name_position() {
        let cases = vec![
            (RawValue::from("scalar"), "root"),
            (RawValue::map([("other", 1)]), "sources"),
            (RawValue::map([("sources", "nope")]), "sources"),
            (descriptor_list(vec![RawValue::from(1)]), "0"),
            (
                descriptor_list(vec![
                    static_entry(RawValue::Null),
                    RawValue::map([("config", RawValue::Null)]),
                ]),
                "1",
            ),
            (
                descriptor_list(vec![RawValue::map([
                    ("type", RawValue::from(7)),
                    ("config", RawValue::Null),
                ])]),
                "0",
            ),
            (
                descriptor_list(vec![RawValue::map([("type", "static")])]),
                "0",
            ),
        ];

        for (raw, expected) in cases {
            let err = SourceDescriptor::list_from_raw(&raw).unwrap_err();
            assert_eq!(position_of(&err), Some(expected), "{:?}", raw);
        }
    }

    #[test]
    fn test_from_raw_unknown_type() {
        let raw = descriptor_list(vec![
            static_entry(RawValue::Null),
            RawValue::map([("type", RawValue::from("nope")), ("config", RawValue::Null)]),
        ]);
        let err = Assembler::from_raw(&raw, &SourceRegistry::with_defaults()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSourceType { .. }));
        assert_eq!(position_of(&err), Some("1"));
    }

    #[test]
    fn test_factory_rejection_names_list_position() {
        let result = Assembler::builder()
            .with_descriptor(SourceDescriptor::new("static", RawValue::map([("a", 1)])))
            .with_descriptor(SourceDescriptor::new("static", 5))
            .build();

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDescriptor { .. }));
        assert_eq!(position_of(&err), Some("1"));
    }

    #[test]
    fn test_from_raw_reports_keyed_positions() {
        let raw = RawValue::map([(
            "sources",
            RawValue::map([
                ("defaults", static_entry(RawValue::Null)),
                ("broken", static_entry(RawValue::from(5))),
            ]),
        )]);
        let err = Assembler::from_raw(&raw, &SourceRegistry::with_defaults()).unwrap_err();
        assert_eq!(position_of(&err), Some("broken"));

        let raw = RawValue::map([(
            "sources",
            RawValue::map([
                ("defaults", static_entry(RawValue::Null)),
                (
                    "custom",
                    RawValue::map([("type", RawValue::from("nope")), ("config", RawValue::Null)]),
                ),
            ]),
        )]);
        let err = Assembler::from_raw(&raw, &SourceRegistry::with_defaults()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSourceType { .. }));
        assert_eq!(position_of(&err), Some("custom"));
    }

    #[test]
    fn test_null_config_is_accepted() {
        let raw = descriptor_list(vec![static_entry(RawValue::Null)]);
        let assembler = Assembler::from_raw(&raw, &SourceRegistry::with_defaults()).unwrap();
        assert!(assembler.assemble().unwrap().is_empty());
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let raw = descriptor_list(vec![
            static_entry(RawValue::map([
                ("name", RawValue::from("base")),
                ("db", RawValue::map([("host", "a"), ("port", "1")])),
            ])),
            static_entry(RawValue::map([
                ("name", RawValue::from("override")),
                ("db", RawValue::map([("host", "b")])),
            ])),
        ]);
        let config = Assembler::from_raw(&raw, &SourceRegistry::with_defaults())
            .unwrap()
            .assemble()
            .unwrap();

        assert_eq!(config.get("name").and_then(ConfigValue::as_str), Some("override"));
        assert_eq!(config.lookup("db.host").and_then(ConfigValue::as_str), Some("b"));
        assert_eq!(config.lookup("db.port").and_then(ConfigValue::as_str), Some("1"));
        assert!(!config.is_read_only());
    }

    #[test]
    fn test_build_resolves_before_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = Assembler::builder()
            .with_source(CountingSource {
                calls: Arc::clone(&calls),
            })
            .with_descriptor(SourceDescriptor::new("missing", RawValue::Null))
            .build();

        assert!(matches!(result, Err(ConfigError::UnknownSourceType { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_source_aborts() {
        let assembler = Assembler::builder()
            .with_source(StaticSource::new(raw_map([("a", 1)])))
            .with_source(ParseFailure)
            .build()
            .unwrap();

        let err = assembler.assemble().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SourceError { ref source_name, .. } if source_name == "parse-failure"
        ));
    }

    #[test]
    fn test_read_only_result() {
        let config = Assembler::builder()
            .with_source(StaticSource::new(raw_map([("a", RawValue::map([("b", 1)]))])))
            .read_only(true)
            .build()
            .unwrap()
            .assemble()
            .unwrap();

        assert!(config.is_read_only());
        assert!(config.get_node("a").unwrap().is_read_only());
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = SourceRegistry::new();
        registry
            .register("answer", |_: &RawValue| {
                Ok(Box::new(StaticSource::new(raw_map([("answer", 42)]))) as Box<dyn RawSource>)
            })
            .unwrap();

        let assembler = Assembler::builder()
            .with_registry(registry)
            .with_descriptors(vec![SourceDescriptor::new("answer", RawValue::Null)])
            .build()
            .unwrap();
        assert_eq!(assembler.source_names(), ["static"]);

        let config = assembler.assemble().unwrap();
        assert_eq!(config.get("answer").and_then(ConfigValue::as_i64), Some(42));

        let err = Assembler::builder()
            .with_registry(SourceRegistry::new())
            .with_descriptor(SourceDescriptor::new("static", RawValue::Null))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSourceType { .. }));
    }

    #[test]
    fn test_empty_assembler() {
        let assembler = Assembler::builder().build().unwrap();
        assert!(assembler.is_empty());
        assert!(assembler.assemble().unwrap().is_empty());
    }

    #[test]
    fn test_list_sources_concatenate() {
        let config = Assembler::builder()
            .with_source(StaticSource::new(raw_map([("hosts", RawValue::list(["a", "b"]))])))
            .with_boxed_source(Box::new(StaticSource::new(raw_map([(
                "hosts",
                RawValue::list(["c"]),
            )]))))
            .build()
            .unwrap()
            .assemble()
            .unwrap();

        let hosts = config.get_node("hosts").unwrap();
        assert_eq!(hosts.count(), 3);
        assert_eq!(hosts.get(2).and_then(ConfigValue::as_str), Some("c"));
    }
}
