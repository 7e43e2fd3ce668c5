//! The console: history, evaluator and a local executor driving results.
//!
//! A [`Console`] only exists once startup has finished, so no user command
//! can run before the prelude, the initial scripts and the initial
//! injections are in place.
//!
//! Pending results are polled on a [`LocalPool`]. A result settles into the
//! entry that holds it, so one that settles after `:clear` has nowhere to
//! show up; the generation comparison in [`Console::submit`] only decides
//! whether to log that.

use evalconsole_foundation::Result;
use evalconsole_render::ResultClassifier;
use evalconsole_sandbox::{NameResolver, Sandbox, ScriptLoader};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::evaluator::{Evaluation, Evaluator};
use crate::history::{Direction, HistoryController, HistoryEntry};
use crate::transcript::split_commands;

/// An interactive console.
pub struct Console {
    history: HistoryController,
    pool: LocalPool,
    config: ConsoleConfig,
}

impl Console {
    /// Starts a console.
    ///
    /// Startup loads the prelude, then each initial script fully and in
    /// order, then binds the initial injections, then replays the
    /// transcript. The returned future stays pending while a script load is
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns a config error for an invalid configuration, or the error of
    /// the first initial injection that cannot be bound.
    pub async fn start(
        config: ConsoleConfig,
        sandbox: impl Sandbox + 'static,
        loader: impl ScriptLoader + 'static,
        resolver: impl NameResolver + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let mut evaluator = Evaluator::new(sandbox, loader, resolver)
            .with_help_text(config.help_text.clone())
            .with_classifier(ResultClassifier::new().with_error_tag(config.tag_errors));

        if let Some(src) = &config.src {
            info!(src, "loading sandbox prelude");
            evaluator.load(src).await;
        }
        for src in &config.initial_scripts {
            info!(src, "loading initial script");
            evaluator.load(src).await;
        }
        let names = config.injection_names();
        if !names.is_empty() {
            info!(names = %names.join(", "), "binding initial injections");
            evaluator.inject(&names)?;
        }

        let mut console = Self {
            history: HistoryController::new(evaluator),
            pool: LocalPool::new(),
            config,
        };

        if let Some(transcript) = console.config.transcript.clone() {
            let commands = split_commands(&transcript);
            info!(commands = commands.len(), "replaying transcript");
            for command in &commands {
                console.submit(command);
            }
        }

        info!("console ready");
        Ok(console)
    }

    /// Submits a command. Pending results are driven by
    /// [`run_until_stalled`](Self::run_until_stalled).
    pub fn submit(&mut self, command: &str) -> Evaluation {
        let evaluation = self.history.submit(command);

        if let Evaluation::Pending(result) = &evaluation {
            if !result.is_settled() {
                let result = result.clone();
                let generation = self.history.generation();
                let current = self.history.generation_handle();
                let command = command.trim().to_string();
                let spawned = self.pool.spawner().spawn_local(async move {
                    result.await;
                    // Logging only; the cleared entry is already unreachable
                    if current.get() != generation {
                        debug!(command, "result settled after the history was cleared");
                    }
                });
                if let Err(e) = spawned {
                    warn!(error = %e, "failed to drive pending result");
                }
            }
        }

        evaluation
    }

    /// Moves through the history and returns the command to show.
    pub fn navigate(&mut self, direction: Direction) -> String {
        self.history.navigate(direction)
    }

    /// Returns the history entries, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Replaces the history with saved entries.
    pub fn restore_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history.restore(entries);
    }

    /// Drives pending results until none can make progress.
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Returns the text printed before each result.
    #[must_use]
    pub fn result_prefix(&self) -> &str {
        &self.config.result_prefix
    }

    /// Returns the input placeholder.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }
}
