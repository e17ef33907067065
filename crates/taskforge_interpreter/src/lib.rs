//! Evaluation and scenario builder registration for taskforge.
//!
//! This crate provides:
//! - [`Interpreter`] - Tree-walking evaluation of analyzed programs
//! - [`Artifacts`] - Prototypes, graphs, objects and dungeon configs produced by evaluation
//! - [`ScenarioBuilderStorage`] - Builder functions indexed by task type
//! - [`Runtime`] - A load-time session tying compilation, evaluation and storage together
//! - [`RuntimeConfig`] - Seed and evaluation limits

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod artifacts;
pub mod config;
pub mod interpreter;
mod ops;
pub mod runtime;
pub mod storage;

pub use artifacts::Artifacts;
pub use config::RuntimeConfig;
pub use interpreter::{Globals, Interpreter};
pub use runtime::Runtime;
pub use storage::{ScenarioBuilderStorage, SlotState};
