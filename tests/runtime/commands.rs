//! Integration tests for command evaluation
//!
//! Tests every evaluation outcome through a running console: values,
//! failures, promises, and the special commands.

use std::path::PathBuf;

use evalconsole_foundation::{HostRef, Rendered, TypeTag};
use evalconsole_runtime::{Console, ConsoleConfig, DEFAULT_HELP_TEXT, Evaluation};
use evalconsole_sandbox::{EnvironmentObject, Registry, ScriptSandbox};
use futures::executor::block_on;

fn console_with(config: ConsoleConfig) -> Console {
    let sandbox = ScriptSandbox::new();
    let loader = sandbox.loader();
    let registry = Registry::new()
        .with("answer", 42)
        .with("greeting", "hello")
        .with(
            "env",
            HostRef::new(EnvironmentObject::from_vars([("USER", Some("ada"))])),
        );
    block_on(Console::start(config, sandbox, loader, registry)).unwrap()
}

fn console() -> Console {
    console_with(ConsoleConfig::default())
}

/// Submits a command, drives it, and returns its settled result.
fn run(console: &mut Console, command: &str) -> Option<Rendered> {
    let evaluation = console.submit(command);
    console.run_until_stalled();
    evaluation.result().and_then(|r| r.peek().cloned())
}

// =============================================================================
// Values and Failures
// =============================================================================

#[test]
fn values_are_classified() {
    let mut c = console();
    assert_eq!(run(&mut c, "1 + 1"), Some(Rendered::new("2", TypeTag::Number)));
    assert_eq!(
        run(&mut c, "\"a\" + 1"),
        Some(Rendered::new("\"a1\"", TypeTag::String))
    );
    assert_eq!(run(&mut c, "[1, [2]]"), Some(Rendered::new("[1, [2]]", TypeTag::Array)));
    assert_eq!(run(&mut c, "null"), Some(Rendered::untagged("null")));
    assert_eq!(
        run(&mut c, "let u = 1"),
        Some(Rendered::new("undefined", TypeTag::Undefined))
    );
}

#[test]
fn failure_text_is_untagged_by_default() {
    let mut c = console();
    assert_eq!(
        run(&mut c, "missing"),
        Some(Rendered::untagged("ReferenceError: missing is not defined"))
    );
}

#[test]
fn failure_is_tagged_when_enabled() {
    let mut c = console_with(ConsoleConfig::new().with_tag_errors(true));
    let rendered = run(&mut c, "fail(\"bad\")").unwrap();
    assert_eq!(rendered, Rendered::new("Error: bad", TypeTag::Error));
}

#[test]
fn self_referential_object_in_console() {
    let mut c = console();
    run(&mut c, "let node = {id: 1}");
    run(&mut c, "node.parent = node");
    assert_eq!(
        run(&mut c, "node"),
        Some(Rendered::new(
            r#"{"id": 1, "parent": [circular]}"#,
            TypeTag::Object
        ))
    );
}

#[test]
fn cyclic_array_converts_to_string() {
    let mut c = console();
    run(&mut c, "let a = [1]");
    run(&mut c, "a[1] = a");
    assert_eq!(
        run(&mut c, "str(a)"),
        Some(Rendered::new("\"1,\"", TypeTag::String))
    );
    assert_eq!(
        run(&mut c, "fail(a)"),
        Some(Rendered::untagged("Error: 1,"))
    );
    assert_eq!(run(&mut c, "a.length"), Some(Rendered::new("2", TypeTag::Number)));
}

#[test]
fn far_array_writes_fail_and_leave_the_array_alone() {
    let mut c = console();
    run(&mut c, "let b = [1]");
    assert_eq!(
        run(&mut c, "b[4000000000] = 1"),
        Some(Rendered::untagged("RangeError: Invalid array length"))
    );
    assert_eq!(
        run(&mut c, "b[\"18446744073709551615\"] = 1"),
        Some(Rendered::untagged(
            "TypeError: Cannot set property '18446744073709551615' of an array"
        ))
    );
    assert_eq!(run(&mut c, "b.length"), Some(Rendered::new("1", TypeTag::Number)));
}

#[test]
fn deeply_nested_command_is_a_syntax_error() {
    let mut c = console();
    assert_eq!(
        run(&mut c, &"[".repeat(50_000)),
        Some(Rendered::untagged("SyntaxError: expression too deeply nested"))
    );
    assert_eq!(run(&mut c, "1 + 1"), Some(Rendered::new("2", TypeTag::Number)));
}

// =============================================================================
// Promises
// =============================================================================

#[test]
fn promise_is_pending_until_driven() {
    let mut c = console();
    let evaluation = c.submit("later({ok: true})");
    let result = evaluation.result().unwrap().clone();
    assert!(!result.is_settled());
    assert_eq!(c.history().len(), 1);

    c.run_until_stalled();
    assert_eq!(
        result.peek(),
        Some(&Rendered::new(r#"{"ok": true}"#, TypeTag::Object))
    );
}

#[test]
fn rejected_promise_becomes_failure_text() {
    let mut c = console();
    assert_eq!(run(&mut c, "reject(\"denied\")"), Some(Rendered::untagged("denied")));
}

#[test]
fn promise_of_promise_is_not_flattened() {
    let mut c = console();
    assert_eq!(
        run(&mut c, "later(later(1))"),
        Some(Rendered::untagged("[object Promise]"))
    );
}

// =============================================================================
// Special Commands
// =============================================================================

#[test]
fn help_shows_configured_text() {
    let mut c = console();
    assert_eq!(run(&mut c, ":help"), Some(Rendered::builtin(DEFAULT_HELP_TEXT)));

    let mut custom = console_with(ConsoleConfig::new().with_help_text("ask someone"));
    assert_eq!(run(&mut custom, "  :help  "), Some(Rendered::builtin("ask someone")));
}

#[test]
fn clear_is_not_recorded() {
    let mut c = console();
    run(&mut c, "1");
    assert!(matches!(c.submit(":clear"), Evaluation::Cleared));
    assert!(c.history().is_empty());
}

#[test]
fn inject_binds_registered_values() {
    let mut c = console();
    assert_eq!(
        run(&mut c, ":inject answer, greeting"),
        Some(Rendered::builtin(
            "Injected the following into the current scope: answer, greeting"
        ))
    );
    assert_eq!(
        run(&mut c, "greeting + answer"),
        Some(Rendered::new("\"hello42\"", TypeTag::String))
    );
}

#[test]
fn injected_environment_is_readable() {
    let mut c = console();
    run(&mut c, ":inject env");
    assert_eq!(
        run(&mut c, "env.USER"),
        Some(Rendered::new("\"ada\"", TypeTag::String))
    );
    assert_eq!(
        run(&mut c, "env"),
        Some(Rendered::untagged("[object Environment]{\nUSER: \"ada\"\n}"))
    );
}

#[test]
fn inject_of_unknown_name_keeps_earlier_bindings() {
    let mut c = console();
    let rendered = run(&mut c, ":inject answer, nobody, greeting").unwrap();
    assert_eq!(rendered.tag, TypeTag::Builtin);
    assert!(rendered.result.starts_with("Error: Injection failed:"));
    assert!(rendered.result.contains("nobody"));

    assert_eq!(run(&mut c, "answer"), Some(Rendered::new("42", TypeTag::Number)));
    assert_eq!(
        run(&mut c, "greeting"),
        Some(Rendered::untagged("ReferenceError: greeting is not defined"))
    );
}

#[test]
fn inject_without_names_shows_usage() {
    let mut c = console();
    let rendered = run(&mut c, ":inject").unwrap();
    assert!(rendered.result.contains("Usage: :inject"));
}

#[test]
fn load_runs_a_script_file() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "evalconsole_runtime_it_{}_load.js",
        std::process::id()
    ));
    std::fs::write(&path, "let loaded = \"yes\"\nlet twice = (x) => x + x\n").unwrap();
    let src = path.to_string_lossy().into_owned();

    let mut c = console();
    assert_eq!(
        run(&mut c, &format!(":load {src}")),
        Some(Rendered::builtin(format!("Loaded {src}")))
    );
    assert_eq!(
        run(&mut c, "twice(loaded)"),
        Some(Rendered::new("\"yesyes\"", TypeTag::String))
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_of_missing_file_never_settles() {
    let mut c = console();
    assert_eq!(run(&mut c, ":load /missing/file.js"), None);
    assert_eq!(c.history().len(), 1);
    assert!(!c.history()[0].result.is_settled());
}
