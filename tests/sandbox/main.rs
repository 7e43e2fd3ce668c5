//! Integration tests for Layer 2: Sandbox
//!
//! Tests for the reference script sandbox, host bindings, and script loading.

mod bindings;
