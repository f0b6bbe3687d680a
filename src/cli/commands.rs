//! CLI command implementations.
//!
//! Query results go to stdout as one JSON object per line; diagnostics go
//! to stderr through the structured logger.

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use encoding_rs::Encoding;

use crate::api;
use crate::observability::Logger;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parses the process arguments and runs the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Query { db, encoding, sql } => query(&db, encoding.as_deref(), &sql),
        Command::Count { db, table } => count(&db, &table),
    }
}

fn query(db: &Path, encoding: Option<&str>, sql: &str) -> CliResult<()> {
    let started = Instant::now();
    let rows = match encoding {
        Some(label) => api::execute_with_encoding(db, sql, resolve_encoding(label)?)?,
        None => api::execute(db, sql)?,
    };
    Logger::info(
        "query_executed",
        &[
            ("elapsed_ms", &started.elapsed().as_millis().to_string()),
            ("rows", &rows.len().to_string()),
        ],
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for row in &rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn count(db: &Path, table: &str) -> CliResult<()> {
    let count = api::count(db, table)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{count}")?;
    Ok(())
}

/// Resolves a WHATWG encoding label ("iso-8859-1", "windows-1251", ...).
fn resolve_encoding(label: &str) -> CliResult<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| CliError::UnknownEncoding(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_common_encoding_labels() {
        assert_eq!(resolve_encoding("utf-8").unwrap(), encoding_rs::UTF_8);
        // the WHATWG table folds latin-1 into windows-1252
        assert_eq!(
            resolve_encoding("iso-8859-1").unwrap(),
            encoding_rs::WINDOWS_1252
        );
        assert!(matches!(
            resolve_encoding("no-such-charset"),
            Err(CliError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn query_command_propagates_parse_errors() {
        let dir = TempDir::new().unwrap();
        let err = run_command(Command::Query {
            db: dir.path().to_path_buf(),
            encoding: None,
            sql: "select".into(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Query(api::Error::Parse(_))));
    }

    #[test]
    fn count_command_propagates_missing_tables() {
        let dir = TempDir::new().unwrap();
        let err = run_command(Command::Count {
            db: dir.path().to_path_buf(),
            table: "absent".into(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Query(api::Error::Execute(_))));
    }
}
