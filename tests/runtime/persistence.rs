//! Integration tests for history persistence
//!
//! Tests saving a console's history and restoring it into a new console.

use evalconsole_foundation::{ErrorKind, Rendered, TypeTag};
use evalconsole_runtime::serialize::{self, HistorySnapshot};
use evalconsole_runtime::{Console, ConsoleConfig, Direction};
use evalconsole_sandbox::{Registry, ScriptSandbox};
use futures::executor::block_on;

fn console() -> Console {
    let sandbox = ScriptSandbox::new();
    let loader = sandbox.loader();
    block_on(Console::start(
        ConsoleConfig::default(),
        sandbox,
        loader,
        Registry::new(),
    ))
    .unwrap()
}

#[test]
fn restored_history_is_navigable_and_settled() {
    let mut first = console();
    first.submit("1 + 2");
    first.submit("\"text\"");
    first.submit(":load /never/there.js");
    let snapshot = HistorySnapshot::capture(first.history());
    assert_eq!(snapshot.entries.len(), 2);

    let bytes = serialize::to_bytes(&snapshot).unwrap();
    let mut second = console();
    second.restore_history(serialize::from_bytes(&bytes).unwrap().into_entries());

    assert_eq!(second.history().len(), 2);
    assert_eq!(
        second.history()[0].result.peek(),
        Some(&Rendered::new("3", TypeTag::Number))
    );
    assert_eq!(second.navigate(Direction::Older), "\"text\"");
}

#[test]
fn history_file_round_trip() {
    let path = std::env::temp_dir().join(format!(
        "evalconsole_history_it_{}.msgpack",
        std::process::id()
    ));
    let mut c = console();
    c.submit(":help");
    serialize::save_to_file(&HistorySnapshot::capture(c.history()), &path).unwrap();

    let loaded = serialize::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.entries[0].command, ":help");
    assert_eq!(loaded.entries[0].result.tag, TypeTag::Builtin);
}

#[test]
fn corrupt_history_is_a_serialization_error() {
    let err = serialize::from_bytes(&[0xc1, 0x00, 0xff]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Serialization(_)));
}

#[test]
fn missing_history_file_is_an_io_error() {
    let err = serialize::load_from_file("/no/such/history.msgpack").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}
