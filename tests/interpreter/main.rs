//! Integration tests for Layer 3: Interpreter
//!
//! Tests for scenario builder storage, program evaluation through the
//! runtime session, and the standard library natives.

mod runtime;
mod stdlib;
mod storage;
