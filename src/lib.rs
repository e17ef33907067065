//! taskforge - Task-content DSL for quest and dungeon generation
//!
//! This crate re-exports all layers of the taskforge system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: taskforge_runtime     - CLI, logging setup, artifact export
//!          taskforge_stdlib      - Standard host classes and native functions
//! Layer 3: taskforge_interpreter - Evaluation, artifacts, scenario builder storage
//! Layer 2: taskforge_language    - Lexer, parser, environment, semantic analysis
//! Layer 1: taskforge_types       - Host type registration, type registry
//! Layer 0: taskforge_foundation  - Core types (Value, Type, Error, graphs)
//! ```

pub use taskforge_foundation as foundation;
pub use taskforge_interpreter as interpreter;
pub use taskforge_language as language;
pub use taskforge_runtime as runtime;
pub use taskforge_stdlib as stdlib;
pub use taskforge_types as types;
