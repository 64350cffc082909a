//! Command-line interface for levelscout.
//!
//! Subcommands for running the extraction pipeline on video IDs and for
//! querying the authority directly.

mod commands;

pub use commands::{Cli, Commands, run_command};
