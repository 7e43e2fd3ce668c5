//! Integration tests for Layer 3: Runtime
//!
//! Tests for console startup, command evaluation, history, transcripts,
//! and history persistence.

mod commands;
mod history;
mod persistence;
mod startup;
