//! Per-table rowset scans with guaranteed decoder cleanup.
//!
//! This is the only path the executor uses to read whole tables: the decoder
//! is always closed before the result or error propagates, so a failing
//! filter or a corrupt file cannot leak an open handle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::adt::{AdtFile, AdtResult, FetchOptions, Record};

use super::filter::TableFilter;

/// Execution-time row shape: table name to that table's decoded record.
/// Stays table-keyed until the final projection flattens it.
pub type Tuple = HashMap<String, Record>;

/// Ordered tuples scanned from one table, or merged from several by joins
pub type Rowset = Vec<Tuple>;

/// Resolves a table name against the database directory (`<db>/<name>.adt`)
pub fn table_path(database_path: &Path, table_name: &str) -> PathBuf {
    database_path.join(format!("{table_name}.adt"))
}

/// Scans all non-deleted records of one table into a filtered rowset.
pub fn fetch_rowset(
    table_path: &Path,
    table_name: &str,
    filter: &TableFilter,
    encoding: Option<&'static Encoding>,
) -> AdtResult<Rowset> {
    let mut table = AdtFile::open(table_path, encoding)?;
    let result = scan(&mut table, table_name, filter);
    table.close();
    result
}

fn scan(table: &mut AdtFile, table_name: &str, filter: &TableFilter) -> AdtResult<Rowset> {
    let records = table.fetch_records(&FetchOptions::default())?;
    Ok(records
        .into_iter()
        .filter(|record| filter.matches(record))
        .map(|record| Tuple::from([(table_name.to_string(), record)]))
        .collect())
}
