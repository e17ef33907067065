//! Command-line arguments for the `taskforge` binary.

use std::path::PathBuf;

use taskforge_interpreter::RuntimeConfig;
use thiserror::Error;

/// Log filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// CLI configuration parsed from arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Programs to load, in order.
    pub files: Vec<PathBuf>,
    /// Seed for scenario builder selection.
    pub seed: Option<u64>,
    /// Log filter directive, e.g. `debug` or `taskforge::print=info`.
    pub log_level: Option<String>,
    /// Where to write the `MessagePack` artifact export.
    pub export: Option<PathBuf>,
    /// Print the loaded artifacts after loading.
    pub dump: bool,
    /// Print usage and exit.
    pub show_help: bool,
    /// Print the version and exit.
    pub show_version: bool,
}

impl CliConfig {
    /// The runtime configuration these arguments select.
    #[must_use]
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::default().with_seed(self.seed)
    }

    /// The log filter to install.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// A malformed command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// A flag that takes a value was last.
    #[error("{0} requires a value")]
    MissingValue(String),

    /// A flag value did not parse.
    #[error("invalid {flag} value: {value}")]
    InvalidValue {
        /// The flag.
        flag: String,
        /// What was given.
        value: String,
    },

    /// An unrecognized flag.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// Parses `args`, skipping the program name in `args[0]`.
///
/// # Errors
///
/// Returns a [`CliError`] for unknown flags and missing or malformed values.
pub fn parse_args(args: &[String]) -> Result<CliConfig, CliError> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--dump" => config.dump = true,
            flag @ ("--seed" | "--log-level" | "--export") => {
                i += 1;
                let Some(value) = args.get(i) else {
                    return Err(CliError::MissingValue(flag.to_string()));
                };
                match flag {
                    "--seed" => {
                        config.seed = Some(value.parse().map_err(|_| CliError::InvalidValue {
                            flag: flag.to_string(),
                            value: value.clone(),
                        })?);
                    }
                    "--log-level" => config.log_level = Some(value.clone()),
                    _ => config.export = Some(PathBuf::from(value)),
                }
            }
            arg if arg.starts_with('-') => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(config)
}

/// Prints usage information.
pub fn print_help() {
    println!(
        "\x1b[1mtaskforge\x1b[0m - Task-content DSL loader

\x1b[1mUSAGE:\x1b[0m
    taskforge [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Programs to load, in order

\x1b[1mOPTIONS:\x1b[0m
    -h, --help           Print help information
    -V, --version        Print version information
    --seed N             Seed scenario builder selection
    --log-level FILTER   Log filter (default: {DEFAULT_LOG_LEVEL}; RUST_LOG wins)
    --export PATH        Write the artifacts as MessagePack
    --dump               Print the artifacts after loading

\x1b[1mEXAMPLES:\x1b[0m
    taskforge quests.dsl                      Check and load quests.dsl
    taskforge --dump monsters.dsl dungeon.dsl Load two programs, print artifacts
    taskforge --seed 7 --export out.mpk *.dsl Export a reproducible build"
    );
}
