//! Executor error types.

use thiserror::Error;

use crate::adt::AdtError;

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Errors raised while executing a query
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Decoder failure while scanning a table (I/O, format, bad column name)
    #[error(transparent)]
    Adt(#[from] AdtError),

    /// Neither side of a join clause is a unique key over its rowset
    #[error("{table}.{column} is not a unique key: joins require one side of the equality to have no duplicate values within its rowset")]
    NotUniqueKey { table: String, column: String },

    /// The plan did not consume every restriction the AST supplied.
    ///
    /// This is a contract violation in the executor or the query (a
    /// restriction references a table the join graph never reaches), not a
    /// data error.
    #[error("internal error: only {consumed} of {total} restrictions were applied; a restriction references a table the executed plan never reached")]
    RestrictionMismatch { consumed: usize, total: usize },
}

impl ExecutorError {
    /// True for contract violations, as opposed to I/O or data errors
    pub fn is_internal(&self) -> bool {
        matches!(self, ExecutorError::RestrictionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_key_error_names_table_and_column() {
        let err = ExecutorError::NotUniqueKey {
            table: "orders".into(),
            column: "OrderNo".into(),
        };
        assert!(err.to_string().contains("orders.OrderNo"));
        assert!(!err.is_internal());
    }

    #[test]
    fn restriction_mismatch_is_internal() {
        let err = ExecutorError::RestrictionMismatch {
            consumed: 1,
            total: 2,
        };
        assert!(err.is_internal());
        assert!(err.to_string().contains("internal error"));
    }
}
