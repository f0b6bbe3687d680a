//! Structured diagnostics for the CLI.

mod logger;

pub use logger::{Logger, Severity};
