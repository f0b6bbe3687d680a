//! Query execution over decoded tables: per-table filtering, hash joins,
//! projection.

pub mod errors;
mod executor;
mod fetch;
mod filter;
mod join;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::{execute_query, QueryOptions, Row};
pub use fetch::{fetch_rowset, table_path, Rowset, Tuple};
pub use filter::{Predicate, TableFilter};
