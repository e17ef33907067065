//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Object, Type, Error, and task dependency graphs.

mod errors;
mod graphs;
mod values;
