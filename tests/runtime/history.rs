//! Integration tests for history handling
//!
//! Tests ordering, navigation, clearing, and results that settle late.

use evalconsole_foundation::{Rendered, TypeTag};
use evalconsole_runtime::transcript::{format_entries, split_commands};
use evalconsole_runtime::{Console, ConsoleConfig, Direction};
use evalconsole_sandbox::{Registry, ScriptSandbox};
use futures::executor::block_on;
use proptest::prelude::*;

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

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn entries_keep_submission_order_regardless_of_settlement() {
    let mut c = console();
    c.submit("later(\"slow\")");
    c.submit("\"fast\"");
    assert!(!c.history()[0].result.is_settled());
    assert!(c.history()[1].result.is_settled());

    c.run_until_stalled();
    let results: Vec<_> = c
        .history()
        .iter()
        .map(|e| e.result.peek().cloned())
        .collect();
    assert_eq!(
        results,
        vec![
            Some(Rendered::new("\"slow\"", TypeTag::String)),
            Some(Rendered::new("\"fast\"", TypeTag::String)),
        ]
    );
}

#[test]
fn blank_input_is_not_recorded() {
    let mut c = console();
    c.submit("");
    c.submit("   \t");
    assert!(c.history().is_empty());
}

#[test]
fn commands_are_stored_trimmed() {
    let mut c = console();
    c.submit("   1 + 1   ");
    assert_eq!(c.history()[0].command, "1 + 1");
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn navigation_walks_back_and_forth() {
    let mut c = console();
    for command in ["first", "second", "third"] {
        c.submit(&format!("\"{command}\""));
    }

    assert_eq!(c.navigate(Direction::Older), "\"third\"");
    assert_eq!(c.navigate(Direction::Older), "\"second\"");
    assert_eq!(c.navigate(Direction::Older), "\"first\"");
    assert_eq!(c.navigate(Direction::Older), "\"first\"");
    assert_eq!(c.navigate(Direction::Newer), "\"second\"");
    assert_eq!(c.navigate(Direction::Newer), "\"third\"");
    assert_eq!(c.navigate(Direction::Newer), "");
    assert_eq!(c.navigate(Direction::Newer), "");
}

#[test]
fn submitting_resets_navigation() {
    let mut c = console();
    c.submit("1");
    c.submit("2");
    c.navigate(Direction::Older);
    c.navigate(Direction::Older);
    c.submit("3");
    assert_eq!(c.navigate(Direction::Older), "3");
}

#[test]
fn navigation_on_empty_history() {
    let mut c = console();
    assert_eq!(c.navigate(Direction::Older), "");
    assert_eq!(c.navigate(Direction::Newer), "");
}

// =============================================================================
// Clearing
// =============================================================================

#[test]
fn clear_discards_late_results() {
    let mut c = console();
    let pending = c.submit("later(1)").result().unwrap().clone();
    c.submit(":clear");
    c.submit("2");
    c.run_until_stalled();

    assert!(pending.is_settled());
    assert_eq!(c.history().len(), 1);
    assert_eq!(c.history()[0].command, "2");
}

#[test]
fn clear_keeps_sandbox_state() {
    let mut c = console();
    c.submit("let kept = 5");
    c.submit(":clear");
    let result = c.submit("kept").result().unwrap().peek().cloned();
    assert_eq!(result, Some(Rendered::new("5", TypeTag::Number)));
}

// =============================================================================
// Transcripts
// =============================================================================

#[test]
fn history_formats_back_into_a_transcript() {
    let mut c = console();
    c.submit("let o = {\n  a: 1\n}");
    c.submit("o.a");
    let text = format_entries(
        c.history()
            .iter()
            .map(|e| (e.command.as_str(), e.result.peek().map(|r| r.result.as_str()))),
    );
    assert_eq!(text, "let o = {\n  a: 1\n}\n// => undefined\no.a\n// => 1\n");
    assert_eq!(split_commands(&text), vec!["let o = {\n  a: 1\n}", "o.a"]);
}

proptest! {
    #[test]
    fn cursor_stays_in_range(moves in prop::collection::vec(any::<bool>(), 0..40), n in 0usize..5) {
        let mut c = console();
        for i in 0..n {
            c.submit(&i.to_string());
        }
        for older in moves {
            let shown = c.navigate(if older { Direction::Older } else { Direction::Newer });
            prop_assert!(shown.is_empty() || shown.parse::<usize>().is_ok_and(|v| v < n));
        }
    }
}
