//! Integration tests for Value, Promise and Rendered
//!
//! Tests value construction, identity, truthiness, and promise settlement.

use std::rc::Rc;

use evalconsole_foundation::{Array, Object, Promise, Rendered, TypeTag, Value};
use futures::channel::oneshot;
use futures::executor::block_on;
use proptest::prelude::*;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn from_conversions() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(1.5), Value::Number(1.5));
    assert_eq!(Value::from(7), Value::Number(7.0));
    assert_eq!(Value::from("a"), Value::from(String::from("a")));
}

#[test]
fn vec_becomes_array() {
    let Value::Array(array) = Value::from(vec!["x", "y"]) else {
        panic!("expected an array");
    };
    assert_eq!(array.len(), 2);
    assert_eq!(array.get(1), Some(Value::from("y")));
}

#[test]
fn type_names() {
    assert_eq!(Value::Undefined.type_name(), "undefined");
    assert_eq!(Value::Null.type_name(), "object");
    assert_eq!(Value::from(1).type_name(), "number");
    assert_eq!(Value::from("s").type_name(), "string");
    assert_eq!(Value::Array(Array::new()).type_name(), "object");
}

#[test]
fn truthiness() {
    for falsy in [
        Value::Undefined,
        Value::Null,
        Value::from(false),
        Value::from(0),
        Value::from(f64::NAN),
        Value::from(""),
    ] {
        assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
    }
    assert!(Value::Object(Object::new()).is_truthy());
    assert!(Value::from("0").is_truthy());
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn shared_handles_see_mutation() {
    let object = Object::new();
    let alias = object.clone();
    alias.set("k", Value::from(1));
    assert_eq!(object.get("k"), Some(Value::from(1)));
    assert_eq!(Value::Object(object.clone()), Value::Object(alias));
    assert_ne!(Value::Object(object), Value::Object(Object::new()));
}

#[test]
fn self_reference_is_representable() {
    let object = Object::new();
    object.set("self", Value::Object(object.clone()));
    let Some(Value::Object(inner)) = object.get("self") else {
        panic!("expected an object");
    };
    assert_eq!(inner.identity(), object.identity());
}

#[test]
fn scalars_have_no_identity() {
    assert!(Value::from(1).identity().is_none());
    assert!(Value::from("s").identity().is_none());
    assert!(Value::Array(Array::new()).identity().is_some());
}

// =============================================================================
// Promises
// =============================================================================

#[test]
fn promise_settles_once_for_every_clone() {
    let (tx, rx) = oneshot::channel::<i32>();
    let promise = Promise::new(async move {
        rx.await.map(Value::from).map_err(|_| Rc::<str>::from("dropped"))
    });
    let other = promise.clone();
    assert!(promise.peek().is_none());

    tx.send(5).unwrap();
    assert_eq!(block_on(promise.settled()), Ok(Value::from(5)));
    assert_eq!(other.peek(), Some(&Ok(Value::from(5))));
    assert!(promise.ptr_eq(&other));
}

#[test]
fn rejected_promise_carries_reason() {
    let promise = Promise::rejected("nope");
    assert_eq!(block_on(promise.settled()), Err(Rc::<str>::from("nope")));
}

// =============================================================================
// Rendered
// =============================================================================

#[test]
fn rendered_constructors() {
    assert_eq!(Rendered::builtin("x").tag, TypeTag::Builtin);
    assert_eq!(Rendered::untagged("x").tag, TypeTag::None);
    assert_eq!(Rendered::new("1", TypeTag::Number).to_string(), "1");
}

proptest! {
    #[test]
    fn array_set_pads_with_undefined(index in 0usize..64) {
        let array = Array::new();
        array.set(index, Value::from(1)).unwrap();
        prop_assert_eq!(array.len(), index + 1);
        for i in 0..index {
            prop_assert_eq!(array.get(i), Some(Value::Undefined));
        }
    }
}
