//! Standard host bindings and native functions for the taskforge DSL.
//!
//! This crate provides what a game host registers before loading content:
//! - [`bindings`] - Host classes (dungeon config, entity, components, task types)
//!   and the entity's component extension properties
//! - [`natives`] - Native functions (`print`, `len`, `push`, `get`, `range`, `str`,
//!   `instantiate`)
//!
//! [`standard_environment`] returns an [`Environment`] with all of them registered.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bindings;
pub mod natives;

use taskforge_foundation::Result;
use taskforge_language::Environment;
use tracing::debug;

pub use bindings::{COMPONENTS, ENTITY_HOST, register_host_classes};
pub use natives::register_natives;

/// Registers every standard host class, extension property and native function.
///
/// # Errors
///
/// Returns an error if any of the names is already bound in `env`.
pub fn register_standard_library(env: &mut Environment) -> Result<()> {
    register_host_classes(env)?;
    register_natives(env)?;
    debug!(
        types = env.registry().aggregates().count(),
        "registered standard library"
    );
    Ok(())
}

/// Creates an environment with the standard library registered.
///
/// # Errors
///
/// Only fails if the standard library itself is inconsistent.
pub fn standard_environment() -> Result<Environment> {
    let mut env = Environment::new();
    register_standard_library(&mut env)?;
    Ok(env)
}
