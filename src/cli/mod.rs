//! Command-line interface: one-shot query execution and record counting.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
