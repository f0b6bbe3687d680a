//! Query executor.
//!
//! Consumes the parsed AST and produces result rows:
//!
//! 1. Single-table queries without predicates go straight to the decoder
//!    with offset/limit/column hints, so unneeded rows and fields are never
//!    materialized.
//! 2. Otherwise: partition restrictions into per-table filters and a join
//!    work queue, fetch one filtered rowset per table, reduce the rowsets
//!    with hash joins, then project.
//! 3. Every restriction must be consumed by exactly one filter or join
//!    application; a mismatch fails the query instead of silently returning
//!    a partial result.
//!
//! `limit`/`offset` are honored only on the single-table, predicate-free
//! path; joined queries scan their inputs in full. This mirrors the legacy
//! behavior and is load-bearing for compatibility.

use std::collections::HashMap;
use std::path::Path;
use std::thread;

use encoding_rs::Encoding;

use crate::adt::{AdtFile, FetchOptions, Record, Value};
use crate::parser::ast::{split_qualified, Ast, Projection, Restriction};

use super::errors::{ExecutorError, ExecutorResult};
use super::fetch::{fetch_rowset, table_path, Rowset, Tuple};
use super::filter::{Predicate, TableFilter};
use super::join::{join_values_equal, try_hash_join, JoinAttempt};

/// One result row: output alias to value
pub type Row = HashMap<String, Value>;

/// Per-query execution options
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Encoding for 8-bit text columns; `None` uses the default
    pub encoding: Option<&'static Encoding>,
}

/// Executes a parsed query against a database directory.
pub fn execute_query(
    database_path: &Path,
    ast: &Ast,
    options: &QueryOptions,
) -> ExecutorResult<Vec<Row>> {
    if ast.tables.len() == 1 && ast.restrictions.is_empty() {
        execute_single_table(database_path, ast, options)
    } else {
        execute_general(database_path, ast, options)
    }
}

/// Fast path: one table, no predicates. Pagination and column selection
/// happen at decode time.
fn execute_single_table(
    database_path: &Path,
    ast: &Ast,
    options: &QueryOptions,
) -> ExecutorResult<Vec<Row>> {
    let table = &ast.tables[0];
    let fetch = FetchOptions {
        offset: ast.offset,
        limit: ast.limit,
        columns: projected_columns(&ast.projections),
    };

    let mut file = AdtFile::open(&table_path(database_path, table), options.encoding)?;
    let result = file.fetch_records(&fetch);
    file.close();
    let records = result?;

    let mut rows: Vec<Row> = if aliases_match_columns(&ast.projections) {
        records
    } else {
        records
            .iter()
            .map(|record| project_record(record, &ast.projections))
            .collect()
    };
    apply_row_index(&mut rows, ast);
    Ok(rows)
}

fn execute_general(
    database_path: &Path,
    ast: &Ast,
    options: &QueryOptions,
) -> ExecutorResult<Vec<Row>> {
    let total = ast.restrictions.len();
    let mut consumed = 0usize;

    // Partition restrictions into per-table filters and a join work queue
    // owned by this invocation.
    let mut filters: HashMap<String, TableFilter> = ast
        .tables
        .iter()
        .map(|table| (table.clone(), TableFilter::default()))
        .collect();
    let mut joins: Vec<JoinClause> = Vec::new();
    for restriction in &ast.restrictions {
        match restriction {
            Restriction::Join { column, column2 } => {
                joins.push(JoinClause::parse(column, column2));
            }
            Restriction::Value { column, op, value } => {
                let (table, column) = split_qualified(column);
                if let Some(filter) = filters.get_mut(table) {
                    filter.push(Predicate::new(column, *op, value.clone()));
                    consumed += 1;
                }
                // predicates on tables outside the FROM list are caught by
                // the consumption check below
            }
        }
    }

    let mut rowsets = fetch_all(database_path, &ast.tables, &filters, options.encoding)?;

    // Join reduction, most-recently-added clause first. Each step replaces
    // two rowsets with their merge; once any rowset is empty the result is
    // empty and iteration stops.
    while !joins.is_empty() {
        if rowsets.iter().any(|rowset| rowset.is_empty()) {
            return Ok(Vec::new());
        }
        let join = match joins.pop() {
            Some(join) => join,
            None => break,
        };

        let lhs = position_of(&rowsets, &join.table);
        let rhs = position_of(&rowsets, &join.table2);
        match (lhs, rhs) {
            (Some(l), Some(r)) if l == r => {
                // both sides already merged into one rowset: the clause
                // degenerates to an equality filter over that rowset
                rowsets[l].retain(|tuple| {
                    join_values_equal(tuple, &join.table, &join.column, &join.table2, &join.column2)
                });
                consumed += 1;
            }
            (Some(l), Some(r)) => {
                let joined = join_rowsets(&join, &rowsets[l], &rowsets[r])?;
                let (hi, lo) = if l > r { (l, r) } else { (r, l) };
                rowsets.swap_remove(hi);
                rowsets.swap_remove(lo);
                rowsets.push(joined);
                consumed += 1;
            }
            // a side references a table that was never fetched; leave it
            // for the consumption check
            _ => {}
        }
    }

    if consumed != total {
        return Err(ExecutorError::RestrictionMismatch { consumed, total });
    }

    // a disconnected join graph leaves several rowsets; defined as empty
    let rowset = match rowsets.pop() {
        Some(rowset) if rowsets.is_empty() => rowset,
        _ => return Ok(Vec::new()),
    };

    let mut rows: Vec<Row> = rowset
        .iter()
        .map(|tuple| project_tuple(tuple, &ast.projections))
        .collect();
    apply_row_index(&mut rows, ast);
    Ok(rows)
}

/// Fetches one filtered rowset per table; scans are independent and run on
/// their own threads when the query names several tables.
fn fetch_all(
    database_path: &Path,
    tables: &[String],
    filters: &HashMap<String, TableFilter>,
    encoding: Option<&'static Encoding>,
) -> ExecutorResult<Vec<Rowset>> {
    if let [table] = tables {
        let rowset = fetch_rowset(
            &table_path(database_path, table),
            table,
            &filters[table.as_str()],
            encoding,
        )?;
        return Ok(vec![rowset]);
    }

    let rowsets = thread::scope(|scope| {
        let handles: Vec<_> = tables
            .iter()
            .map(|table| {
                let path = table_path(database_path, table);
                let filter = &filters[table.as_str()];
                scope.spawn(move || fetch_rowset(&path, table, filter, encoding))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    Ok(rowsets)
}

/// One join clause with both references split into table and column parts
#[derive(Debug, Clone)]
struct JoinClause {
    table: String,
    column: String,
    table2: String,
    column2: String,
}

impl JoinClause {
    fn parse(column: &str, column2: &str) -> Self {
        let (table, column) = split_qualified(column);
        let (table2, column2) = split_qualified(column2);
        Self {
            table: table.to_string(),
            column: column.to_string(),
            table2: table2.to_string(),
            column2: column2.to_string(),
        }
    }
}

/// Joins two rowsets, treating the right side as the unique key first and
/// retrying reversed, so either side of `A.col = B.col` may serve as the
/// key.
fn join_rowsets(join: &JoinClause, lhs: &Rowset, rhs: &Rowset) -> ExecutorResult<Rowset> {
    match try_hash_join(rhs, &join.table2, &join.column2, lhs, &join.table, &join.column) {
        JoinAttempt::Joined(joined) => Ok(joined),
        JoinAttempt::NotUnique { .. } => {
            match try_hash_join(lhs, &join.table, &join.column, rhs, &join.table2, &join.column2) {
                JoinAttempt::Joined(joined) => Ok(joined),
                JoinAttempt::NotUnique { table, column } => {
                    Err(ExecutorError::NotUniqueKey { table, column })
                }
            }
        }
    }
}

fn position_of(rowsets: &[Rowset], table: &str) -> Option<usize> {
    rowsets
        .iter()
        .position(|rowset| rowset.first().is_some_and(|tuple| tuple.contains_key(table)))
}

/// Column hints for the decoder: projection source columns in SELECT order,
/// deduplicated case-insensitively.
fn projected_columns(projections: &[Projection]) -> Option<Vec<String>> {
    if projections.is_empty() {
        return None;
    }
    let mut columns: Vec<String> = Vec::with_capacity(projections.len());
    for projection in projections {
        let (_, column) = split_qualified(&projection.column);
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            columns.push(column.to_string());
        }
    }
    Some(columns)
}

fn aliases_match_columns(projections: &[Projection]) -> bool {
    projections
        .iter()
        .all(|p| split_qualified(&p.column).1 == p.alias)
}

fn project_record(record: &Record, projections: &[Projection]) -> Row {
    projections
        .iter()
        .map(|projection| {
            let (_, column) = split_qualified(&projection.column);
            (projection.alias.clone(), lookup(record, column))
        })
        .collect()
}

fn project_tuple(tuple: &Tuple, projections: &[Projection]) -> Row {
    projections
        .iter()
        .map(|projection| {
            let (table, column) = split_qualified(&projection.column);
            let value = tuple
                .get(table)
                .map(|record| lookup(record, column))
                .unwrap_or(Value::Null);
            (projection.alias.clone(), value)
        })
        .collect()
}

/// Record lookup with a case-insensitive fallback, since projection
/// references need not match the catalog's case.
fn lookup(record: &Record, column: &str) -> Value {
    if let Some(value) = record.get(column) {
        return value.clone();
    }
    record
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(column))
        .map(|(_, value)| value.clone())
        .unwrap_or(Value::Null)
}

fn apply_row_index(rows: &mut [Row], ast: &Ast) {
    if let Some(alias) = &ast.row_index_alias {
        for (index, row) in rows.iter_mut().enumerate() {
            row.insert(alias.clone(), Value::Integer(index as i64));
        }
    }
}
