//! The reference sandbox: one isolated global scope running the script
//! language.

use std::rc::Rc;

use evalconsole_foundation::{Error, Result, Value};
use tracing::debug;

use crate::builtins;
use crate::interpreter::Interpreter;
use crate::loader::FileScriptLoader;
use crate::traits::{SandboxBinder, SandboxExecutor};

/// A clonable handle over one interpreter and its global scope.
///
/// Clones share the same globals, so a [`FileScriptLoader`] created with
/// [`loader`](Self::loader) runs scripts in the scope the console evaluates
/// in.
#[derive(Clone)]
pub struct ScriptSandbox {
    interp: Rc<Interpreter>,
}

impl Default for ScriptSandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptSandbox {
    /// Creates a sandbox with the built-in globals installed.
    #[must_use]
    pub fn new() -> Self {
        let interp = Interpreter::new();
        builtins::install(&interp);
        Self {
            interp: Rc::new(interp),
        }
    }

    /// Runs `source` in the global scope.
    ///
    /// # Errors
    ///
    /// Returns the error the script raised.
    pub fn run(&self, source: &str) -> Result<Value> {
        self.interp.run(source)
    }

    /// Reads a global.
    #[must_use]
    pub fn global(&self, name: &str) -> Option<Value> {
        self.interp.global(name)
    }

    /// Returns a loader that executes script files in this sandbox.
    #[must_use]
    pub fn loader(&self) -> FileScriptLoader {
        FileScriptLoader::new(self.clone())
    }
}

impl SandboxExecutor for ScriptSandbox {
    fn execute(&mut self, source: &str) -> Result<Value> {
        self.run(source)
    }
}

impl SandboxBinder for ScriptSandbox {
    fn bind(&mut self, name: &str, value: Value) -> Result<()> {
        if !is_identifier(name) {
            return Err(Error::bind(name, "not a valid identifier"));
        }
        debug!(name, "binding global");
        self.interp.define(name, value);
        Ok(())
    }
}

/// Returns true if `name` can be used as a script variable name.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !matches!(
            name,
            "let" | "var" | "const" | "true" | "false" | "null" | "undefined"
        )
}
