//! Integration tests for host bindings
//!
//! Tests the registry, the environment host object, and binding into a sandbox.

use evalconsole_foundation::{ErrorKind, HostRef, Result, Value};
use evalconsole_render::stringify;
use evalconsole_sandbox::{
    EnvironmentObject, NameResolver, Registry, SandboxBinder, SandboxExecutor, ScriptSandbox,
};

fn environment() -> HostRef {
    HostRef::new(EnvironmentObject::from_vars([
        ("HOME", Some("/home/me")),
        ("RAW", None),
    ]))
}

#[test]
fn registry_resolves_registered_names() {
    let registry = Registry::new().with("answer", 42).with("env", environment());
    assert_eq!(registry.resolve("answer").unwrap(), Value::from(42));
    assert!(matches!(registry.resolve("env").unwrap(), Value::Host(_)));
    assert_eq!(registry.names(), vec!["answer", "env"]);
}

#[test]
fn registry_rejects_unknown_names() {
    let err = Registry::new().resolve("ghost").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Bind { .. }));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn closures_resolve_names() {
    let resolver = |name: &str| -> Result<Value> { Ok(Value::from(name.to_uppercase())) };
    assert_eq!(resolver.resolve("four").unwrap(), Value::from("FOUR"));
}

#[test]
fn bound_environment_is_readable_from_scripts() {
    let mut sandbox = ScriptSandbox::new();
    sandbox.bind("env", Value::Host(environment())).unwrap();
    assert_eq!(sandbox.execute("env.HOME").unwrap(), Value::from("/home/me"));
    assert_eq!(sandbox.execute("env.UNSET").unwrap(), Value::Undefined);
}

#[test]
fn unreadable_environment_value_is_a_type_error() {
    let mut sandbox = ScriptSandbox::new();
    sandbox.bind("env", Value::Host(environment())).unwrap();
    let err = sandbox.execute("env.RAW").unwrap_err();
    assert!(err.to_string().starts_with("TypeError:"));
    assert!(err.to_string().contains("RAW"));
}

#[test]
fn bound_environment_renders_without_unreadable_values() {
    let mut sandbox = ScriptSandbox::new();
    sandbox.bind("env", Value::Host(environment())).unwrap();
    let value = sandbox.execute("env").unwrap();
    assert_eq!(
        stringify(&value),
        "[object Environment]{\nHOME: \"/home/me\"\n}"
    );
}

#[test]
fn host_objects_are_read_only() {
    let mut sandbox = ScriptSandbox::new();
    sandbox.bind("env", Value::Host(environment())).unwrap();
    assert!(sandbox.execute("env.HOME = \"/tmp\"").is_err());
}
