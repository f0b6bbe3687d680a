//! Error types for the ADT table decoder.

use std::io;

use thiserror::Error;

/// Result type for decoder operations
pub type AdtResult<T> = Result<T, AdtError>;

/// Errors raised while opening or reading an ADT table file
#[derive(Debug, Error)]
pub enum AdtError {
    /// Underlying file could not be opened or read
    #[error("table file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Header fields imply a negative or fractional column count
    #[error("corrupt header: data offset {data_offset} does not describe a whole number of column descriptors")]
    InvalidColumnCount { data_offset: u32 },

    /// Column descriptors declare more field bytes than fit in one record
    #[error("corrupt column catalog: declared field widths exceed the record length {record_length}")]
    InvalidRecordLayout { record_length: u32 },

    /// A typed column declares fewer bytes than its type's fixed layout
    #[error("corrupt column catalog: column {column} declares width {length}, below the {expected} bytes its type occupies")]
    InvalidFieldWidth {
        column: String,
        length: usize,
        expected: usize,
    },

    /// A record index beyond the table's record count was requested
    #[error("record number {index} is greater than the record count ({record_count})")]
    RecordOutOfRange { index: u32, record_count: u32 },

    /// A requested column whitelist entry has no case-insensitive match
    #[error("invalid column name(s): {}", .0.join(", "))]
    InvalidColumnNames(Vec<String>),

    /// The table was used after `close`
    #[error("table file is closed")]
    Closed,
}
