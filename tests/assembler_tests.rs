// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for assembling trees from source descriptors.

mod common;

use cfgtree::prelude::*;
use common::*;
use std::sync::atomic::Ordering;

fn sources(entries: Vec<RawValue>) -> RawValue {
    RawValue::map([("sources", RawValue::List(entries))])
}

fn entry(source_type: &str, config: impl Into<RawValue>) -> RawValue {
    RawValue::map([
        ("type", RawValue::from(source_type)),
        ("config", config.into()),
    ])
}

#[test]
#[cfg(feature = "yaml")]
fn test_files_merge_in_descriptor_order() {
    let base = create_temp_yaml("app:\n  name: base\n  port: 1\nlist:\n  - a\n");
    let overlay = create_temp_yaml("app:\n  name: overlay\nlist:\n  - b\n");

    let raw = sources(vec![
        entry("yaml", base.path().display().to_string()),
        entry(
            "yaml",
            RawValue::map([("path", overlay.path().display().to_string())]),
        ),
    ]);
    let config = Assembler::from_raw(&raw, &SourceRegistry::with_defaults())
        .unwrap()
        .assemble()
        .unwrap();

    assert_eq!(config.lookup("app.name").and_then(ConfigValue::as_str), Some("overlay"));
    assert_eq!(config.lookup("app.port").and_then(ConfigValue::as_i64), Some(1));
    assert_eq!(config.get_node("list").unwrap().count(), 2);
}

#[test]
#[cfg(feature = "yaml")]
fn test_descriptor_list_from_yaml_document() {
    let data = create_temp_yaml("answer: 42\n");
    let document = format!(
        "sources:\n  - type: static\n    config:\n      answer: 0\n      keep: true\n  - type: yaml\n    config: {}\n",
        data.path().display()
    );
    let raw = RawValue::Map(YamlParser::new().parse(&document).unwrap());

    let config = Assembler::from_raw(&raw, &SourceRegistry::with_defaults())
        .unwrap()
        .assemble()
        .unwrap();

    assert_eq!(config.get("answer").and_then(ConfigValue::as_i64), Some(42));
    assert_eq!(config.get("keep").and_then(ConfigValue::as_bool), Some(true));
}

#[test]
#[cfg(feature = "yaml")]
fn test_missing_file_fails_at_build_time() {
    let raw = sources(vec![
        entry("static", RawValue::Null),
        entry("yaml", "/nonexistent/cfgtree/config.yaml"),
    ]);
    let err = Assembler::from_raw(&raw, &SourceRegistry::with_defaults()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDescriptor { ref position, .. } if position == "1"));

    let cause = std::error::Error::source(&err).unwrap();
    assert!(cause.to_string().contains("yaml-file"));
}

#[test]
fn test_malformed_descriptors_name_position() {
    let registry = SourceRegistry::with_defaults();

    let err = Assembler::from_raw(&RawValue::map([("other", 1)]), &registry).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDescriptor { ref position, .. } if position == "sources"));

    let raw = sources(vec![entry("static", RawValue::Null), RawValue::from("bad")]);
    let err = Assembler::from_raw(&raw, &registry).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDescriptor { ref position, .. } if position == "1"));

    let raw = sources(vec![RawValue::map([("config", RawValue::Null)])]);
    let err = Assembler::from_raw(&raw, &registry).unwrap_err();
    assert!(err.to_string().contains("'type'"));

    let raw = sources(vec![RawValue::map([("type", "static")])]);
    let err = Assembler::from_raw(&raw, &registry).unwrap_err();
    assert!(err.to_string().contains("'config'"));

    let raw = sources(vec![entry("static", RawValue::Null), entry("unheard-of", RawValue::Null)]);
    let err = Assembler::from_raw(&raw, &registry).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownSourceType { ref position, ref source_type }
            if position == "1" && source_type == "unheard-of"
    ));
}

#[test]
fn test_failing_source_aborts_without_partial_result() {
    let first = MockRawSource::new("first").with_value("a", 1);
    let broken = MockRawSource::new("broken").with_failure(true);
    let after = MockRawSource::new("after").with_value("b", 2);
    let after_fetches = after.fetch_counter();

    let assembler = Assembler::builder()
        .with_source(first)
        .with_source(broken)
        .with_source(after)
        .build()
        .unwrap();
    let err = assembler.assemble().unwrap_err();

    assert!(matches!(err, ConfigError::SourceError { ref source_name, .. } if source_name == "broken"));
    assert_eq!(after_fetches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_type_is_reported_before_any_fetch() {
    let source = MockRawSource::new("mock").with_value("a", 1);
    let fetches = source.fetch_counter();

    let result = Assembler::builder()
        .with_source(source)
        .with_descriptor(SourceDescriptor::new("nope", RawValue::Null))
        .build();

    assert!(matches!(result, Err(ConfigError::UnknownSourceType { .. })));
    assert_eq!(fetches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_assemble_can_run_repeatedly() {
    let source = MockRawSource::new("mock").with_value("a", RawValue::list(["x"]));
    let fetches = source.fetch_counter();
    let assembler = Assembler::builder().with_source(source).build().unwrap();

    let first = assembler.assemble().unwrap();
    let second = assembler.assemble().unwrap();

    assert_eq!(first, second);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[test]
fn test_read_only_option() {
    let writable = Assembler::builder()
        .with_source(MockRawSource::new("m").with_value("a", 1))
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert!(!writable.is_read_only());

    let mut sealed = Assembler::builder()
        .with_source(MockRawSource::new("m").with_value("a", RawValue::map([("b", 1)])))
        .read_only(true)
        .build()
        .unwrap()
        .assemble()
        .unwrap();
    assert!(sealed.is_read_only());
    assert!(sealed.get_node("a").unwrap().is_read_only());
    assert!(sealed.set("a", 2).unwrap_err().is_read_only());
}

#[test]
fn test_custom_source_type() {
    let mut registry = SourceRegistry::new();
    registry
        .register("mock", |config: &RawValue| {
            let value = config.as_str().unwrap_or("none").to_string();
            Ok(Box::new(MockRawSource::new("mock").with_value("from", value)) as Box<dyn RawSource>)
        })
        .unwrap();

    let raw = sources(vec![entry("mock", "first"), entry("mock", "second")]);
    let config = Assembler::from_raw(&raw, &registry).unwrap().assemble().unwrap();

    assert_eq!(config.get("from").and_then(ConfigValue::as_str), Some("second"));
}
