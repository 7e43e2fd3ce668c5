//! Core value model, type tags, and errors for Evalconsole.
//!
//! This crate provides:
//! - [`Value`] - The closed set of values a sandbox can hand back to the console
//! - [`TypeTag`] and [`Rendered`] - The presentation record of an evaluation
//! - [`Error`] - Rich error types shared by every layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod tag;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use tag::{Rendered, TypeTag};
pub use value::{
    Array, Callable, Function, HostObject, HostRef, Identity, MAX_ARRAY_GROWTH, Object, Promise,
    PromiseOutcome, Value,
};
