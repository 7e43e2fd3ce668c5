//! Integration tests for result classification
//!
//! Tests tag assignment for every value shape and failure tagging.

use evalconsole_foundation::{
    Array, Error, HostRef, Object, Promise, Rendered, TypeTag, Value,
};
use evalconsole_render::ResultClassifier;
use evalconsole_sandbox::{EnvironmentObject, ScriptSandbox};

#[test]
fn dedicated_tags() {
    let c = ResultClassifier::new();
    let cases = [
        (Value::Undefined, TypeTag::Undefined),
        (Value::from(1), TypeTag::Number),
        (Value::from("s"), TypeTag::String),
        (Value::Object(Object::new()), TypeTag::Object),
        (Value::Array(Array::new()), TypeTag::Array),
    ];
    for (value, tag) in cases {
        assert_eq!(c.classify(&value), tag, "{value:?}");
    }
}

#[test]
fn everything_else_is_untagged() {
    let c = ResultClassifier::new();
    let env = EnvironmentObject::from_vars([("A", Some("1"))]);
    for value in [
        Value::Null,
        Value::from(false),
        Value::Host(HostRef::new(env)),
        Value::Promise(Promise::resolved(Value::Null)),
    ] {
        assert_eq!(c.classify(&value), TypeTag::None, "{value:?}");
    }
}

#[test]
fn sandbox_function_is_tagged_function() {
    let sandbox = ScriptSandbox::new();
    let value = sandbox.run("(a, b) => a + b").unwrap();
    assert!(matches!(value, Value::Function(_)));
    let rendered = ResultClassifier::new().render(&value);
    assert_eq!(rendered, Rendered::new("(a, b) => a + b", TypeTag::Function));
}

#[test]
fn native_function_renders_its_signature() {
    let sandbox = ScriptSandbox::new();
    let Some(Value::Function(f)) = sandbox.global("later") else {
        panic!("later should be a function");
    };
    let rendered = ResultClassifier::new().render(&Value::Function(f));
    assert_eq!(rendered.result, "function later() { [native code] }");
}

#[test]
fn failures_are_untagged_unless_enabled() {
    let err = Error::type_error("x is not a function");
    let plain = ResultClassifier::new().render_failure(&err);
    assert_eq!(plain, Rendered::untagged("TypeError: x is not a function"));

    let tagged = ResultClassifier::new().with_error_tag(true).render_failure(&err);
    assert_eq!(tagged.tag, TypeTag::Error);
    assert_eq!(tagged.result, plain.result);
}
