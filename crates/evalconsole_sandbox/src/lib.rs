//! Sandbox collaborators and the reference script sandbox for Evalconsole.
//!
//! The console core only talks to a sandbox through the traits in
//! [`traits`]. This crate also ships a small expression language so the
//! console works out of the box:
//! - [`ScriptSandbox`] - An isolated global scope that executes scripts
//! - [`FileScriptLoader`] - Loads script files into a sandbox
//! - [`Registry`] - Host values that `:inject` can bind by name
//! - [`EnvironmentObject`] - A host object over process environment variables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod builtins;
pub mod convert;
pub mod env;
pub mod interpreter;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod registry;
pub mod sandbox;
pub mod token;
pub mod traits;

pub use env::EnvironmentObject;
pub use interpreter::Interpreter;
pub use loader::FileScriptLoader;
pub use parser::parse;
pub use registry::Registry;
pub use sandbox::ScriptSandbox;
pub use traits::{NameResolver, Sandbox, SandboxBinder, SandboxExecutor, ScriptLoader};
