//! Evaluator, history, console, REPL, and CLI for Evalconsole.
//!
//! This crate provides:
//! - [`Evaluator`] - Runs commands in a sandbox and normalises every outcome
//!   into a [`PendingResult`]
//! - [`HistoryController`] - Ordered history and input navigation
//! - [`Console`] - Startup sequence plus a local executor for pending results
//! - [`ConsoleConfig`] - JSON-loadable configuration
//! - [`Repl`] - Terminal front end
//! - History persistence in `MessagePack`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod console;
pub mod editor;
pub mod evaluator;
pub mod highlight;
pub mod history;
pub mod pending;
pub mod repl;
pub mod serialize;
pub mod special;
pub mod transcript;

pub use config::{ConsoleConfig, DEFAULT_HELP_TEXT};
pub use console::Console;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use evaluator::{Evaluation, Evaluator};
pub use history::{Direction, HistoryController, HistoryEntry};
pub use pending::PendingResult;
pub use repl::Repl;
pub use serialize::HistorySnapshot;
pub use special::SpecialCommand;
