//! Safe stringification and result classification for Evalconsole.
//!
//! This crate provides:
//! - [`stringify`] - Bounded, deterministic, cycle-safe rendering of any [`Value`]
//! - [`ResultClassifier`] - Assigns a [`TypeTag`] and renders an evaluation outcome
//!
//! [`Value`]: evalconsole_foundation::Value
//! [`TypeTag`]: evalconsole_foundation::TypeTag

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classify;
pub mod stringify;

pub use classify::ResultClassifier;
pub use stringify::{CIRCULAR, VisitedSet, format_number, quote, stringify, stringify_with};
