//! Command evaluation.
//!
//! The [`Evaluator`] owns the sandbox for the whole life of a console. Each
//! command is either skipped, recognised as a special command, or executed
//! in the sandbox; whatever happens, the outcome is normalised into a
//! [`PendingResult`] so front ends have a single rendering path.
//!
//! ```text
//! Received ── empty ──────────────────────────────▶ Skipped
//!    │
//!    ├── special ── :clear ───────────────────────▶ Cleared
//!    │             :help / :load / :inject ──────▶ Pending (builtin)
//!    │
//!    └── execute ── value ───────────────────────▶ Pending (settled)
//!                   promise ── settles ──────────▶ Pending (resolves later)
//!                   error ───────────────────────▶ Pending (failure text)
//! ```

use std::rc::Rc;

use evalconsole_foundation::{Rendered, Result, Value};
use evalconsole_render::ResultClassifier;
use evalconsole_sandbox::{NameResolver, Sandbox, ScriptLoader};
use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::config::DEFAULT_HELP_TEXT;
use crate::pending::PendingResult;
use crate::special::SpecialCommand;

/// Outcome of [`Evaluator::evaluate`].
#[derive(Clone, Debug)]
pub enum Evaluation {
    /// The command was empty; nothing happened.
    Skipped,
    /// The command asked for the history to be cleared.
    Cleared,
    /// The command produced a result, possibly still in flight.
    Pending(PendingResult),
}

impl Evaluation {
    /// Returns the result, if the command produced one.
    #[must_use]
    pub fn result(&self) -> Option<&PendingResult> {
        match self {
            Self::Pending(result) => Some(result),
            Self::Skipped | Self::Cleared => None,
        }
    }
}

/// Executes commands against one sandbox.
pub struct Evaluator {
    sandbox: Box<dyn Sandbox>,
    loader: Rc<dyn ScriptLoader>,
    resolver: Rc<dyn NameResolver>,
    classifier: ResultClassifier,
    help_text: String,
}

impl Evaluator {
    /// Creates an evaluator owning `sandbox`.
    pub fn new(
        sandbox: impl Sandbox + 'static,
        loader: impl ScriptLoader + 'static,
        resolver: impl NameResolver + 'static,
    ) -> Self {
        Self {
            sandbox: Box::new(sandbox),
            loader: Rc::new(loader),
            resolver: Rc::new(resolver),
            classifier: ResultClassifier::new(),
            help_text: DEFAULT_HELP_TEXT.to_string(),
        }
    }

    /// Builder method to set the `:help` text.
    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Builder method to set the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: ResultClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Returns the `:help` text.
    #[must_use]
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Evaluates one command.
    ///
    /// Never fails: errors become the text of the result.
    pub fn evaluate(&mut self, command: &str) -> Evaluation {
        let command = command.trim();
        if command.is_empty() {
            return Evaluation::Skipped;
        }

        let Some(special) = SpecialCommand::parse(command) else {
            debug!(command, "evaluating");
            return Evaluation::Pending(self.execute(command));
        };

        debug!(command, ?special, "dispatching special command");
        match special {
            SpecialCommand::Clear => Evaluation::Cleared,
            SpecialCommand::Help => {
                Evaluation::Pending(PendingResult::ready(Rendered::builtin(&self.help_text)))
            }
            SpecialCommand::Load(src) => Evaluation::Pending(self.load_command(src)),
            SpecialCommand::Inject(names) => Evaluation::Pending(self.inject_command(&names)),
        }
    }

    /// Starts loading a script. The future settles once it has run.
    pub fn load(&self, src: &str) -> LocalBoxFuture<'static, ()> {
        self.loader.load(src)
    }

    /// Resolves and binds each name in order, stopping at the first failure.
    ///
    /// Names bound before a failure stay bound.
    ///
    /// # Errors
    ///
    /// Returns the resolution or binding error of the first failing name.
    pub fn inject<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for name in names {
            let name = name.as_ref();
            let value = self.resolver.resolve(name)?;
            self.sandbox.bind(name, value)?;
            debug!(name, "injected");
        }
        Ok(())
    }

    fn execute(&mut self, command: &str) -> PendingResult {
        let classifier = self.classifier;
        match self.sandbox.execute(command) {
            Ok(Value::Promise(promise)) => PendingResult::new(async move {
                match promise.settled().await {
                    Ok(value) => classifier.render(&value),
                    Err(reason) => classifier.render_failure(reason),
                }
            }),
            Ok(value) => PendingResult::ready(classifier.render(&value)),
            Err(e) => {
                debug!(command, error = %e, "evaluation failed");
                PendingResult::ready(classifier.render_failure(e))
            }
        }
    }

    fn load_command(&self, src: &str) -> PendingResult {
        if src.is_empty() {
            return PendingResult::ready(Rendered::builtin(format!(
                "Usage: {} <script>",
                SpecialCommand::LOAD
            )));
        }
        let loading = self.load(src);
        let message = format!("Loaded {src}");
        PendingResult::new(async move {
            loading.await;
            Rendered::builtin(message)
        })
    }

    fn inject_command(&mut self, names: &[&str]) -> PendingResult {
        if names.is_empty() {
            return PendingResult::ready(Rendered::builtin(format!(
                "Error: Injection failed: no names given\nUsage: {} name1, name2",
                SpecialCommand::INJECT
            )));
        }

        let rendered = match self.inject(names) {
            Ok(()) => Rendered::builtin(format!(
                "Injected the following into the current scope: {}",
                names.join(", ")
            )),
            Err(e) => {
                warn!(error = %e, "injection failed");
                Rendered::builtin(format!(
                    "Error: Injection failed: {e}\nIs the name registered with the host?"
                ))
            }
        };
        PendingResult::ready(rendered)
    }
}
