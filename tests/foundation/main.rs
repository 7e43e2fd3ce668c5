//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Promise, TypeTag, Rendered, and Error.

mod errors;
mod values;
