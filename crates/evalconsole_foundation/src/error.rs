//! Error types for the Evalconsole system.
//!
//! Uses `thiserror` for ergonomic error definition. Errors raised inside the
//! sandbox carry a script-style name (`ReferenceError`, `SyntaxError`, ...)
//! so their display form reads like a thrown exception.

use thiserror::Error;

/// Result type used throughout Evalconsole.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Evalconsole operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a generic evaluation error (`Error: message`).
    #[must_use]
    pub fn eval(message: impl Into<String>) -> Self {
        Self::eval_named("Error", message)
    }

    /// Creates an evaluation error with an explicit script error name.
    #[must_use]
    pub fn eval_named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Eval {
            name: name.into(),
            message: message.into(),
        })
    }

    /// Creates a `SyntaxError`.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::eval_named("SyntaxError", message)
    }

    /// Creates a `ReferenceError` for an undefined name.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self::eval_named("ReferenceError", format!("{name} is not defined"))
    }

    /// Creates a `TypeError`.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::eval_named("TypeError", message)
    }

    /// Creates a `RangeError`.
    #[must_use]
    pub fn range(message: impl Into<String>) -> Self {
        Self::eval_named("RangeError", message)
    }

    /// Creates a binding error for a name the host could not resolve.
    #[must_use]
    pub fn bind(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Bind {
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Creates a script loading error.
    #[must_use]
    pub fn load(src: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load {
            src: src.into(),
            reason: reason.into(),
        })
    }

    /// Creates a property access error.
    #[must_use]
    pub fn property_access(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::PropertyAccess {
            property: property.into(),
            reason: reason.into(),
        })
    }

    /// Returns true if this error was raised by sandbox evaluation.
    #[must_use]
    pub const fn is_eval(&self) -> bool {
        matches!(self.kind, ErrorKind::Eval { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Code executed in the sandbox threw.
    #[error("{name}: {message}")]
    Eval {
        /// Script error name, e.g. `ReferenceError`.
        name: String,
        /// Human readable message.
        message: String,
    },

    /// A name could not be injected into the sandbox.
    #[error("cannot inject '{name}': {reason}")]
    Bind {
        /// The name that was requested.
        name: String,
        /// Why resolution or binding failed.
        reason: String,
    },

    /// A script could not be loaded.
    #[error("failed to load {src}: {reason}")]
    Load {
        /// The script source.
        src: String,
        /// Why loading failed.
        reason: String,
    },

    /// Reading a property of a host object failed.
    #[error("cannot read property '{property}': {reason}")]
    PropertyAccess {
        /// The property being read.
        property: String,
        /// Why the read failed.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
