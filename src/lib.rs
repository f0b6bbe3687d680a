//! adtquery - SQL queries over legacy ADT table files
//!
//! Reads fixed-record `.adt` tables directly and executes a small SQL
//! subset over them: qualified projections with aliases, conjunctive WHERE
//! restrictions, equality joins, LIMIT and OFFSET.

pub mod adt;
pub mod api;
pub mod cli;
pub mod executor;
pub mod observability;
pub mod parser;

pub use api::{count, execute, execute_with_encoding, Error};
