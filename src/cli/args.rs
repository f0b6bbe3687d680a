//! CLI argument definitions using clap
//!
//! Commands:
//! - adtquery query --db <dir> [--encoding <label>] <sql>
//! - adtquery count --db <dir> <table>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// adtquery - SQL queries over legacy ADT table files
#[derive(Parser, Debug)]
#[command(name = "adtquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a query and print one JSON row per line
    Query {
        /// Directory containing the .adt table files
        #[arg(long, default_value = ".")]
        db: PathBuf,

        /// Encoding label for 8-bit character columns (WHATWG labels,
        /// e.g. "iso-8859-1", "windows-1251")
        #[arg(long)]
        encoding: Option<String>,

        /// SQL text
        sql: String,
    },

    /// Print a table's record count, deleted records included
    Count {
        /// Directory containing the .adt table files
        #[arg(long, default_value = ".")]
        db: PathBuf,

        /// Table name without the .adt suffix
        table: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
