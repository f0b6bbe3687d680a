//! ADT file header parsing.
//!
//! The first 400 bytes of a table file describe the whole layout: total
//! record count (including logically deleted records), the byte offset where
//! record data begins, and the fixed per-record length. The column count is
//! derived from the data offset, since 200 descriptor bytes follow the header
//! for each column.

use super::bytes::u32_at;
use super::errors::{AdtError, AdtResult};

/// Fixed size of the header region
pub const HEADER_LENGTH: usize = 400;
/// Size of one column descriptor
pub const COLUMN_DESCRIPTOR_LENGTH: usize = 200;
/// Status bytes preceding every record's field data
pub const RECORD_PREFIX_LENGTH: usize = 5;
/// First prefix byte of a logically deleted record
pub const DELETED_MARKER: u8 = 0x05;

/// Parsed ADT header, immutable after open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Total records in the file, deleted records included
    pub record_count: u32,
    /// Byte offset where record data begins
    pub data_offset: u32,
    /// Bytes per record, status prefix included
    pub record_length: u32,
    /// Number of column descriptors following the header
    pub column_count: usize,
}

impl Header {
    /// Parses the fixed 400-byte header region.
    ///
    /// Fails when the data offset implies a negative or fractional column
    /// count.
    pub fn parse(buf: &[u8; HEADER_LENGTH]) -> AdtResult<Self> {
        let record_count = u32_at(buf, 24);
        let data_offset = u32_at(buf, 32);
        let record_length = u32_at(buf, 36);

        let header_len = HEADER_LENGTH as u32;
        let descriptor_len = COLUMN_DESCRIPTOR_LENGTH as u32;
        if data_offset < header_len || (data_offset - header_len) % descriptor_len != 0 {
            return Err(AdtError::InvalidColumnCount { data_offset });
        }
        let column_count = ((data_offset - header_len) / descriptor_len) as usize;

        Ok(Self {
            record_count,
            data_offset,
            record_length,
            column_count,
        })
    }
}
