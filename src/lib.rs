//! Evalconsole - Embeddable interactive evaluation console
//!
//! This crate re-exports all layers of the Evalconsole system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: evalconsole_runtime    - Evaluator, history, console, REPL, CLI
//! Layer 2: evalconsole_sandbox    - Sandbox traits, reference script sandbox
//! Layer 1: evalconsole_render     - Safe stringification, result classification
//! Layer 0: evalconsole_foundation - Core types (Value, TypeTag, Rendered, Error)
//! ```

pub use evalconsole_foundation as foundation;
pub use evalconsole_render as render;
pub use evalconsole_runtime as runtime;
pub use evalconsole_sandbox as sandbox;
