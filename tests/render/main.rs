//! Integration tests for Layer 1: Render
//!
//! Tests for stringification and result classification of value graphs.

mod classify;
mod stringify;
