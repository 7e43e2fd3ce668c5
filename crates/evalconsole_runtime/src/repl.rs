//! The terminal front end.

use std::io::{self, Write};

use evalconsole_foundation::{Error, ErrorKind, Rendered, Result};
use evalconsole_sandbox::builtins;

use crate::console::Console;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::evaluator::Evaluation;
use crate::highlight::tag_style;
use crate::history::HistoryEntry;
use crate::transcript::is_complete;

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The console commands are submitted to.
    console: Console,

    /// Entries printed as pending, waiting to be printed again once settled.
    waiting: Vec<HistoryEntry>,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL over `console` with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(console: Console) -> Result<Self> {
        let editor = RustylineEditor::new(builtins::names().map(String::from).collect())?;
        Ok(Self::with_editor(console, editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor.
    pub fn with_editor(console: Console, editor: E) -> Self {
        Self {
            editor,
            console,
            waiting: Vec::new(),
            show_banner: true,
            prompt: "> ".to_string(),
            continuation_prompt: ".. ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Adds completion words, such as the names the host can inject.
    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        let mut all: Vec<String> = builtins::names().map(String::from).collect();
        all.extend(keywords);
        self.editor.set_keywords(all);
        self
    }

    /// Returns the console.
    #[must_use]
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// Consumes the REPL, returning its console.
    #[must_use]
    pub fn into_console(self) -> Console {
        self.console
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            self.print_settled();
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => eprintln!("\x1b[31mError: {e}\x1b[0m"),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        if let Some(line) = self.eval_and_format(&input) {
            println!("{line}");
        }
        Ok(true)
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let read = if first_line {
                self.editor.read_line(&self.prompt)?
            } else {
                self.editor.read_continuation(&self.continuation_prompt)?
            };

            match read {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);

                    if is_complete(&input) {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    /// Submits `input` and drives it as far as it goes.
    ///
    /// Returns the settled result, or `None` if the command was skipped,
    /// cleared the history, or is still pending.
    pub fn eval(&mut self, input: &str) -> Option<Rendered> {
        let evaluation = self.console.submit(input);
        self.console.run_until_stalled();
        evaluation.result().and_then(|result| result.peek().cloned())
    }

    /// Submits `input` and returns the line to print, if any.
    fn eval_and_format(&mut self, input: &str) -> Option<String> {
        let evaluation = self.console.submit(input);
        self.console.run_until_stalled();

        match evaluation {
            Evaluation::Skipped => None,
            Evaluation::Cleared => {
                self.waiting.clear();
                Some("\x1b[2mHistory cleared.\x1b[0m".to_string())
            }
            Evaluation::Pending(result) => match result.peek() {
                Some(rendered) => Some(self.format_result(rendered)),
                None => {
                    if let Some(entry) = self.console.history().last() {
                        self.waiting.push(entry.clone());
                    }
                    Some("\x1b[2m(pending)\x1b[0m".to_string())
                }
            },
        }
    }

    /// Prints results that settled since they were reported as pending.
    fn print_settled(&mut self) {
        self.console.run_until_stalled();
        let (settled, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.waiting)
            .into_iter()
            .partition(|entry| entry.result.is_settled());
        self.waiting = waiting;

        for entry in settled {
            if let Some(rendered) = entry.result.peek() {
                println!("\x1b[2m{}\x1b[0m", entry.command);
                println!("{}", self.format_result(rendered));
            }
        }
    }

    /// Formats a result with the configured prefix and a tag colour.
    fn format_result(&self, rendered: &Rendered) -> String {
        let prefix = self.console.result_prefix();
        let style = tag_style(rendered.tag);
        if style.is_empty() {
            format!("{prefix}{}", rendered.result)
        } else {
            format!("{prefix}{style}{}\x1b[0m", rendered.result)
        }
    }

    /// Prints the welcome banner.
    fn print_banner(&self) {
        println!("\x1b[1;36mEvalconsole v{}\x1b[0m", env!("CARGO_PKG_VERSION"));
        let placeholder = self.console.placeholder();
        if placeholder.is_empty() {
            println!("Type expressions to evaluate, :help for commands. Use Ctrl+D to exit.\n");
        } else {
            println!("{placeholder}\n");
        }

        let _ = io::stdout().flush();
    }
}
