//! Collaborator interfaces consumed by the console core.
//!
//! The core never assumes how a sandbox is implemented: a scripting engine
//! embedding, a subprocess, or the reference [`ScriptSandbox`] all plug in
//! through these traits.
//!
//! [`ScriptSandbox`]: crate::ScriptSandbox

use evalconsole_foundation::{Result, Value};
use futures::future::LocalBoxFuture;

/// Runs source text inside the sandbox's global scope.
pub trait SandboxExecutor {
    /// Executes `source` and returns its completion value.
    ///
    /// A result may itself be a [`Value::Promise`]; the caller decides when
    /// to await it.
    ///
    /// # Errors
    ///
    /// Returns an evaluation error if the source is invalid or throws.
    fn execute(&mut self, source: &str) -> Result<Value>;
}

/// Injects named values into the sandbox's global scope.
pub trait SandboxBinder {
    /// Binds `name` to `value` as a global.
    ///
    /// # Errors
    ///
    /// Returns a bind error if the name cannot be bound.
    fn bind(&mut self, name: &str, value: Value) -> Result<()>;
}

/// An execution context the console owns for its whole lifetime.
pub trait Sandbox: SandboxExecutor + SandboxBinder {}

impl<T: SandboxExecutor + SandboxBinder> Sandbox for T {}

/// Loads external scripts into the sandbox.
pub trait ScriptLoader {
    /// Starts loading `src`.
    ///
    /// The returned future settles once the script has been loaded and run.
    /// A source that cannot be reached may leave it pending forever.
    fn load(&self, src: &str) -> LocalBoxFuture<'static, ()>;
}

/// Looks up host values by name for injection.
pub trait NameResolver {
    /// Resolves `name` to the value the host registered for it.
    ///
    /// # Errors
    ///
    /// Returns a bind error if nothing is registered under `name`.
    fn resolve(&self, name: &str) -> Result<Value>;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> Result<Value>,
{
    fn resolve(&self, name: &str) -> Result<Value> {
        self(name)
    }
}
