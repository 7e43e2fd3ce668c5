//! Integration tests for the stringifier
//!
//! Tests rendering of nested, shared, cyclic and host-owned value graphs.

use evalconsole_foundation::{Array, Error, HostObject, HostRef, Object, Promise, Result, Value};
use evalconsole_render::{CIRCULAR, stringify};
use proptest::prelude::*;

// =============================================================================
// Helper Types
// =============================================================================

/// A host object that refuses enumeration outright.
struct Sealed;

impl HostObject for Sealed {
    fn class_name(&self) -> &str {
        "Sealed"
    }

    fn property_names(&self) -> Result<Vec<String>> {
        Err(Error::property_access("*", "enumeration denied"))
    }

    fn get(&self, name: &str) -> Result<Value> {
        Err(Error::property_access(name, "access denied"))
    }
}

/// A host object exposing a plain object and a nested host object.
struct Document;

impl HostObject for Document {
    fn class_name(&self) -> &str {
        "Document"
    }

    fn property_names(&self) -> Result<Vec<String>> {
        Ok(vec!["meta".into(), "body".into(), "count".into()])
    }

    fn get(&self, name: &str) -> Result<Value> {
        match name {
            "meta" => Ok(Value::Object(Object::from_pairs([("lang", Value::from("en"))]))),
            "body" => Ok(Value::Host(HostRef::new(Sealed))),
            "count" => Ok(Value::from(3)),
            _ => Ok(Value::Undefined),
        }
    }
}

// =============================================================================
// Nested Values
// =============================================================================

#[test]
fn nested_object_and_array() {
    let inner = Object::from_pairs([("z", Value::from(true)), ("y", Value::Null)]);
    let list = Array::from_vec(vec![Value::from(1), Value::Object(inner)]);
    let outer = Object::from_pairs([("list", Value::Array(list)), ("name", Value::from("n"))]);
    assert_eq!(
        stringify(&Value::Object(outer)),
        r#"{"list": [1, {"y": null, "z": true}], "name": "n"}"#
    );
}

#[test]
fn empty_object() {
    assert_eq!(stringify(&Value::Object(Object::new())), "{}");
}

#[test]
fn promise_is_opaque() {
    let promise = Promise::resolved(Value::from(1));
    assert_eq!(stringify(&Value::Promise(promise)), "[object Promise]");
}

#[test]
fn deep_nesting_terminates() {
    let mut value = Value::from("leaf");
    for _ in 0..200 {
        value = Value::from(vec![value]);
    }
    let text = stringify(&value);
    assert!(text.starts_with("[[[["));
    assert!(text.contains("\"leaf\""));
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn mutual_references_are_circular() {
    let a = Object::new();
    let b = Object::new();
    a.set("peer", Value::Object(b.clone()));
    b.set("peer", Value::Object(a.clone()));
    assert_eq!(
        stringify(&Value::Object(a)),
        format!(r#"{{"peer": {{"peer": {CIRCULAR}}}}}"#)
    );
}

#[test]
fn object_in_array_in_object_cycle() {
    let root = Object::new();
    root.set("items", Value::from(vec![Value::Object(root.clone())]));
    assert_eq!(stringify(&Value::Object(root)), r#"{"items": [[circular]]}"#);
}

// =============================================================================
// Host Objects
// =============================================================================

#[test]
fn host_object_refusing_enumeration_renders_empty() {
    let text = stringify(&Value::Host(HostRef::new(Sealed)));
    assert_eq!(text, "[object Sealed]{\n\n}");
}

#[test]
fn host_object_properties_render_one_level_deep() {
    let text = stringify(&Value::Host(HostRef::new(Document)));
    assert_eq!(
        text,
        "[object Document]{\nbody: [object Sealed],\ncount: 3,\nmeta: {\"lang\": \"en\"}\n}"
    );
}

// =============================================================================
// Property Tests
// =============================================================================

/// Builds an object graph with `links` back-edges into earlier nodes.
fn graph(size: usize, links: &[(usize, usize)]) -> Value {
    let nodes: Vec<Object> = (0..size).map(|_| Object::new()).collect();
    for (i, node) in nodes.iter().enumerate() {
        node.set("id", Value::from(i32::try_from(i).unwrap()));
        if i + 1 < size {
            node.set("next", Value::Object(nodes[i + 1].clone()));
        }
    }
    for &(from, to) in links {
        nodes[from % size].set(&format!("link{to}"), Value::Object(nodes[to % size].clone()));
    }
    Value::Object(nodes[0].clone())
}

proptest! {
    #[test]
    fn arbitrary_graphs_render_deterministically(
        size in 1usize..12,
        links in prop::collection::vec((0usize..12, 0usize..12), 0..16),
    ) {
        let value = graph(size, &links);
        let first = stringify(&value);
        prop_assert_eq!(&first, &stringify(&value));
        prop_assert!(first.starts_with('{'), "first line should start with an opening brace");
    }
}
