//! Integration tests for console startup
//!
//! Tests that scripts load fully and in order before injections are bound
//! and before any command runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use evalconsole_foundation::{Error, Result, Rendered, TypeTag, Value};
use evalconsole_runtime::{Console, ConsoleConfig};
use evalconsole_sandbox::{Registry, ScriptLoader, ScriptSandbox};
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use futures::FutureExt;

// =============================================================================
// Helper Types
// =============================================================================

type Log = Rc<RefCell<Vec<String>>>;

/// A loader whose loads finish only when the test says so.
struct GatedLoader {
    log: Log,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
}

impl GatedLoader {
    fn new(log: &Log, srcs: &[&str]) -> (Self, HashMap<String, oneshot::Sender<()>>) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        for src in srcs {
            let (tx, rx) = oneshot::channel();
            gates.insert((*src).to_string(), rx);
            senders.insert((*src).to_string(), tx);
        }
        let loader = Self {
            log: Rc::clone(log),
            gates: RefCell::new(gates),
        };
        (loader, senders)
    }
}

impl ScriptLoader for GatedLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, ()> {
        self.log.borrow_mut().push(format!("load {src}"));
        match self.gates.borrow_mut().remove(src) {
            Some(gate) => gate.map(|_| ()).boxed_local(),
            None => futures::future::ready(()).boxed_local(),
        }
    }
}

fn recording_resolver(log: &Log) -> impl Fn(&str) -> Result<Value> + use<> {
    let log = Rc::clone(log);
    move |name: &str| {
        log.borrow_mut().push(format!("resolve {name}"));
        Ok(Value::from(name.len() as f64))
    }
}

fn start(config: ConsoleConfig) -> Result<Console> {
    let sandbox = ScriptSandbox::new();
    let loader = sandbox.loader();
    block_on(Console::start(config, sandbox, loader, Registry::new().with("seven", 7)))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn scripts_load_in_order_before_injections() {
    let log: Log = Rc::default();
    let (loader, mut gates) = GatedLoader::new(&log, &["a.js", "b.js"]);
    let config = ConsoleConfig::new()
        .with_initial_scripts(["a.js", "b.js"])
        .with_initial_injections(["name"]);
    let mut starting = Box::pin(Console::start(
        config,
        ScriptSandbox::new(),
        loader,
        recording_resolver(&log),
    ));

    assert!((&mut starting).now_or_never().is_none());
    assert_eq!(*log.borrow(), ["load a.js"]);

    gates.remove("a.js").unwrap().send(()).unwrap();
    assert!((&mut starting).now_or_never().is_none());
    assert_eq!(*log.borrow(), ["load a.js", "load b.js"]);

    gates.remove("b.js").unwrap().send(()).unwrap();
    let mut console = (&mut starting).now_or_never().unwrap().unwrap();
    assert_eq!(*log.borrow(), ["load a.js", "load b.js", "resolve name"]);

    let result = console.submit("name").result().unwrap().peek().cloned();
    assert_eq!(result, Some(Rendered::new("4", TypeTag::Number)));
}

#[test]
fn prelude_loads_before_initial_scripts() {
    let log: Log = Rc::default();
    let (loader, _) = GatedLoader::new(&log, &[]);
    let config = ConsoleConfig::new()
        .with_src("prelude.js")
        .with_initial_scripts(["one.js"]);
    block_on(Console::start(config, ScriptSandbox::new(), loader, Registry::new())).unwrap();
    assert_eq!(*log.borrow(), ["load prelude.js", "load one.js"]);
}

#[test]
fn duplicate_injections_resolve_once() {
    let log: Log = Rc::default();
    let (loader, _) = GatedLoader::new(&log, &[]);
    let config = ConsoleConfig::new().with_initial_injections(["x", "y", "x"]);
    block_on(Console::start(
        config,
        ScriptSandbox::new(),
        loader,
        recording_resolver(&log),
    ))
    .unwrap();
    assert_eq!(*log.borrow(), ["resolve x", "resolve y"]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn unknown_initial_injection_fails_startup() {
    let err = start(ConsoleConfig::new().with_initial_injections(["seven", "eight"]))
        .err()
        .unwrap();
    assert!(err.to_string().contains("eight"));
}

#[test]
fn invalid_configuration_fails_startup() {
    let err: Error = start(ConsoleConfig::new().with_initial_scripts([""]))
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("invalid configuration"));
}

// =============================================================================
// Transcript Replay
// =============================================================================

#[test]
fn transcript_replays_into_history() {
    let transcript = "let base = seven * 2\n// => undefined\nbase + 1\n// => 15\n";
    let console = start(
        ConsoleConfig::new()
            .with_initial_injections(["seven"])
            .with_transcript(transcript),
    )
    .unwrap();

    let entries = console.history();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].command, "base + 1");
    assert_eq!(
        entries[1].result.peek(),
        Some(&Rendered::new("15", TypeTag::Number))
    );
}
