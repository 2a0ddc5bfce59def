// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for merging configuration trees.

mod common;

use cfgtree::domain::{raw_map, ConfigKey, ConfigNode, ConfigValue, RawMap, RawValue};
use common::*;

fn node(data: RawMap) -> ConfigNode {
    ConfigNode::new(data, true)
}

#[test]
fn test_new_keys_go_after_existing_keys() {
    let mut target = node(raw_map([("b", 2)]));
    target.merge(&node(raw_map([("a", 1)]))).unwrap();
    assert_eq!(target.to_array(), raw_map([("b", 2), ("a", 1)]));
    assert_eq!(key_names(&target), ["b", "a"]);

    let mut target = node(raw_map([("a", 1)]));
    target.merge(&node(raw_map([("b", 2)]))).unwrap();
    assert_eq!(key_names(&target), ["a", "b"]);
}

#[test]
fn test_scalar_is_replaced_in_place() {
    let mut target = node(raw_map([("foo", 1), ("bar", 2)]));
    target.merge(&node(raw_map([("foo", 3)]))).unwrap();
    assert_eq!(target.to_array(), raw_map([("foo", 3), ("bar", 2)]));
}

#[test]
fn test_null_overrides_value_but_key_stays() {
    let mut target = node(raw_map([("x", "bar")]));
    target.merge(&node(raw_map([("x", RawValue::Null)]))).unwrap();

    assert!(target.has("x"));
    assert_eq!(target.get("x"), Some(&ConfigValue::Null));
}

#[test]
fn test_sequences_concatenate() {
    let mut target = node(raw_map([(
        "numerical",
        RawValue::list([
            RawValue::from("first"),
            RawValue::from("second"),
            RawValue::list(["third"]),
        ]),
    )]));
    let other = node(raw_map([(
        "numerical",
        RawValue::list([
            RawValue::from("fourth"),
            RawValue::from("fifth"),
            RawValue::list(["sixth"]),
        ]),
    )]));
    target.merge(&other).unwrap();

    let expected = raw_map([
        (ConfigKey::Index(0), RawValue::from("first")),
        (ConfigKey::Index(1), RawValue::from("second")),
        (ConfigKey::Index(2), RawValue::map([(0, "third")])),
        (ConfigKey::Index(3), RawValue::from("fourth")),
        (ConfigKey::Index(4), RawValue::from("fifth")),
        (ConfigKey::Index(5), RawValue::map([(0, "sixth")])),
    ]);
    assert_eq!(target.get_node("numerical").unwrap().to_array(), expected);
}

#[test]
fn test_top_level_sequences_concatenate() {
    let mut target = ConfigNode::from_list(vec![RawValue::from("a"), RawValue::from("b")], true);
    target
        .merge(&ConfigNode::from_list(vec![RawValue::from("c")], false))
        .unwrap();

    assert_eq!(target.to_array(), raw_map([(0, "a"), (1, "b"), (2, "c")]));
}

#[test]
fn test_sparse_integer_keys() {
    let mut target = node(raw_map([(2, "foo"), (3, "bar")]));
    target.merge(&node(raw_map([(3, "baz"), (0, "zero")]))).unwrap();

    assert_eq!(
        target.to_array(),
        raw_map([(2, "foo"), (3, "bar"), (4, "baz"), (0, "zero")])
    );
}

#[test]
fn test_nested_maps_merge_recursively() {
    let mut target = sample_tree(true);
    target
        .merge(&node(raw_map([(
            "db",
            RawValue::map([("host", "10.0.0.1"), ("port", "5432")]),
        )])))
        .unwrap();

    let db = target.get_node("db").unwrap();
    assert_eq!(key_names(db), ["host", "user", "pass", "name", "port"]);
    assert_eq!(db.get("host").and_then(ConfigValue::as_str), Some("10.0.0.1"));
    assert_eq!(db.get("user").and_then(ConfigValue::as_str), Some("username"));
}

#[test]
fn test_merge_never_drops_receiver_keys() {
    let mut target = sample_tree(true);
    target.merge(&ConfigNode::empty(true)).unwrap();
    target.merge(&node(raw_map([("extra", 1)]))).unwrap();

    assert_eq!(key_names(&target), ["hostname", "name", "db", "one", "extra"]);
}

#[test]
fn test_merge_into_clone_leaves_original_subtree() {
    let original = sample_tree(true);
    let mut copy = original.clone();

    copy.get_node_mut("one")
        .unwrap()
        .unwrap()
        .merge(&node(raw_map([("two", RawValue::map([("three", "changed")]))])))
        .unwrap();

    assert_eq!(copy.lookup("one.two.three").and_then(ConfigValue::as_str), Some("changed"));
    assert_eq!(original.lookup("one.two.three").and_then(ConfigValue::as_str), Some("multi"));
}

#[test]
fn test_read_only_source_yields_writable_subtrees() {
    let source = sample_tree(false);
    let mut target = ConfigNode::empty(true);
    target.merge(&source).unwrap();

    target
        .get_node_mut("db")
        .unwrap()
        .unwrap()
        .set("host", "changed")
        .unwrap();
    assert_eq!(target.lookup("db.host").and_then(ConfigValue::as_str), Some("changed"));
    assert_eq!(source.lookup("db.host").and_then(ConfigValue::as_str), Some("127.0.0.1"));
}

#[test]
fn test_merge_onto_read_only_tree_fails() {
    let mut target = sample_tree(false);
    let before = target.to_array();

    let err = target.merge(&node(raw_map([("x", 1)]))).unwrap_err();
    assert!(err.is_read_only());
    assert_eq!(target.to_array(), before);
}

#[test]
fn test_merge_blocked_by_read_only_child_changes_nothing() {
    let mut target = sample_tree(true);
    target.get_node_mut("one").unwrap().unwrap().set_read_only();
    let before = target.to_array();

    let incoming = node(raw_map([
        ("added", RawValue::from(1)),
        ("hostname", RawValue::from("changed")),
        (
            "one",
            RawValue::map([("two", RawValue::map([("three", "changed")]))]),
        ),
    ]));
    let err = target.merge(&incoming).unwrap_err();

    assert!(err.is_read_only());
    assert_eq!(target.to_array(), before);
    assert!(!target.has("added"));
}

#[test]
fn test_scalar_may_replace_read_only_child() {
    let mut target = sample_tree(true);
    target.get_node_mut("one").unwrap().unwrap().set_read_only();

    target.merge(&node(raw_map([("one", "flat")]))).unwrap();
    assert_eq!(target.get("one").and_then(ConfigValue::as_str), Some("flat"));
}

#[test]
fn test_merged_leaves_both_inputs_untouched() {
    let base = sample_tree(false);
    let overlay = node(raw_map([("hostname", "override")]));

    // The copy keeps the read-only flag.
    let err = base.merged(&overlay).unwrap_err();
    assert!(err.is_read_only());

    let writable = sample_tree(true);
    let result = writable.merged(&overlay).unwrap();
    assert_eq!(result.get("hostname").and_then(ConfigValue::as_str), Some("override"));
    assert_eq!(writable.get("hostname").and_then(ConfigValue::as_str), Some("all"));
}

#[test]
fn test_count_matches_to_array_after_merge() {
    let mut target = sample_tree(true);
    target
        .merge(&node(raw_map([("hostname", RawValue::from("x")), ("new", RawValue::from(1))])))
        .unwrap();

    assert_eq!(target.count(), 5);
    assert_eq!(target.count(), target.to_array().len());
}
