//! Library entry points: parse-and-execute over a database directory, plus
//! record counting straight off the table header.

use std::path::Path;

use encoding_rs::Encoding;
use thiserror::Error;

use crate::adt::AdtFile;
use crate::executor::{execute_query, table_path, ExecutorError, QueryOptions, Row};
use crate::parser::{parse_sql, ParseError};

/// Errors surfaced by the public entry points
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Execute(#[from] ExecutorError),
}

/// Parses `sql` and executes it against the tables under `database_path`.
pub fn execute(database_path: &Path, sql: &str) -> Result<Vec<Row>, Error> {
    run(database_path, sql, &QueryOptions::default())
}

/// Like [`execute`] but decoding 8-bit text columns with `encoding`.
pub fn execute_with_encoding(
    database_path: &Path,
    sql: &str,
    encoding: &'static Encoding,
) -> Result<Vec<Row>, Error> {
    run(
        database_path,
        sql,
        &QueryOptions {
            encoding: Some(encoding),
        },
    )
}

fn run(database_path: &Path, sql: &str, options: &QueryOptions) -> Result<Vec<Row>, Error> {
    let ast = parse_sql(sql)?;
    Ok(execute_query(database_path, &ast, options)?)
}

/// Record slots in a table per its header, deleted records included.
/// No record data is read.
pub fn count(database_path: &Path, table_name: &str) -> Result<u32, Error> {
    let mut file = AdtFile::open(&table_path(database_path, table_name), None)
        .map_err(ExecutorError::from)?;
    let count = file.record_count();
    file.close();
    Ok(count)
}
