//! Line editing for the REPL.
//!
//! [`LineEditor`] is the seam between the REPL loop and the terminal; the
//! REPL tests drive it with scripted input, the binary with rustyline.

use std::borrow::Cow;

use evalconsole_foundation::{Error, ErrorKind, Result};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator as RLValidator};

use crate::highlight::ScriptHighlighter;
use crate::special::SpecialCommand;
use crate::transcript::is_complete;

/// What a read produced.
#[derive(Debug)]
pub enum ReadResult {
    /// A line of input, without its line terminator.
    Line(String),
    /// Ctrl+C: discard whatever is being typed.
    Interrupted,
    /// Ctrl+D: the input stream is closed.
    Eof,
}

/// Source of REPL input.
pub trait LineEditor {
    /// Reads one line after printing `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the terminal cannot be read.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Reads a line that continues an incomplete command.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the terminal cannot be read.
    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    /// Records a submitted command for arrow-key recall.
    fn add_history(&mut self, line: &str);

    /// Replaces the completion words (special commands are always offered).
    fn set_keywords(&mut self, keywords: Vec<String>);
}

#[derive(Helper, Completer, Hinter, RLValidator)]
struct ConsoleHelper {
    #[rustyline(Completer)]
    completer: KeywordCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Validator)]
    validator: CompletenessValidator,
    highlighter: ScriptHighlighter,
}

impl Highlighter for ConsoleHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;36m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2;3m{hint}\x1b[0m"))
    }

    fn highlight_char(&self, line: &str, _pos: usize, kind: CmdKind) -> bool {
        // Styles depend on the whole line (strings, comments, special commands)
        !line.is_empty() || matches!(kind, CmdKind::ForcedRefresh)
    }
}

/// Completes words from a fixed list; after `:load`, completes file paths.
struct KeywordCompleter {
    paths: FilenameCompleter,
    words: Vec<String>,
}

impl KeywordCompleter {
    fn new(extra: Vec<String>) -> Self {
        let mut words: Vec<String> = SpecialCommand::KEYWORDS.map(String::from).to_vec();
        words.extend(extra);
        Self {
            paths: FilenameCompleter::new(),
            words,
        }
    }
}

impl Completer for KeywordCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if matches!(SpecialCommand::parse(line), Some(SpecialCommand::Load(_))) {
            return self.paths.complete(line, pos, ctx);
        }

        let before = &line[..pos];
        let start = before
            .char_indices()
            .rev()
            .find(|&(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '$' | ':')))
            .map_or(0, |(i, c)| i + c.len_utf8());
        let prefix = &before[start..];
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }

        let candidates = self
            .words
            .iter()
            .filter(|word| word.starts_with(prefix) && word.as_str() != prefix)
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

/// Keeps Enter from submitting while brackets or a string are still open.
struct CompletenessValidator;

impl Validator for CompletenessValidator {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if is_complete(ctx.input()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

fn editor_error(e: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Io(format!("line editor: {e}")))
}

/// [`LineEditor`] backed by rustyline.
pub struct RustylineEditor {
    editor: Editor<ConsoleHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates an editor that highlights and completes `builtins`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up.
    pub fn new(builtins: Vec<String>) -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .map_err(editor_error)?
            .build();

        let mut editor = Editor::with_config(config).map_err(editor_error)?;
        editor.set_helper(Some(ConsoleHelper {
            completer: KeywordCompleter::new(builtins.clone()),
            hinter: HistoryHinter::new(),
            validator: CompletenessValidator,
            highlighter: ScriptHighlighter::new(builtins),
        }));
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(editor_error(e)),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %e, "could not record history entry");
        }
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer = KeywordCompleter::new(keywords);
        }
    }
}
