//! CLI, logging setup and artifact export for taskforge.
//!
//! This crate provides:
//! - [`cli`] - Command-line argument parsing for the `taskforge` binary
//! - [`logging`] - `tracing` subscriber installation for binaries
//! - [`serialize`] - `MessagePack` export of loaded artifacts
//!
//! Libraries in the workspace only emit `tracing` events; installing a
//! subscriber is left to the binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod logging;
pub mod serialize;

pub use cli::{CliConfig, CliError, parse_args};
pub use logging::init_logging;
pub use serialize::{save_to_file, to_bytes};
