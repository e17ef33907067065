//! Core values, types, artifacts and errors for taskforge.
//!
//! This crate provides:
//! - [`Value`] - The runtime value type produced by the interpreter
//! - [`Type`] - The DSL type lattice (scalars, collections, functions, aggregates)
//! - [`Object`] - Instances of host-bound aggregate types
//! - [`Prototype`], [`TaskDependencyGraph`] and [`DungeonConfig`] - Artifacts handed to the game runtime
//! - [`Error`] - The error taxonomy shared by every layer
//! - Persistent collections ([`LtVec`], [`LtSet`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod config;
pub mod error;
pub mod graph;
pub mod location;
pub mod prototype;
pub mod types;
pub mod value;

#[cfg(feature = "serde")]
mod serde_support;

pub use collections::{LtMap, LtSet, LtVec};
pub use config::DungeonConfig;
pub use error::{
    Diagnostics, Error, ErrorContext, ErrorKind, InterpretationError, InterpretationErrorKind,
    ParseError, RegistryError, SemanticError, SemanticErrorKind, TypeRegistrationError,
};
pub use graph::{EdgeKind, TaskDependencyGraph, TaskEdge, TaskNode};
pub use location::SourceLocation;
pub use prototype::Prototype;
pub use types::{AggregateRef, FunctionType, Type};
pub use value::{Object, Value};

/// Result type alias using the taskforge [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
