//! ADT table file decoder.
//!
//! Opens one table file, parses its header and column catalog once, and
//! serves bulk or random-access record reads. Records whose first status
//! byte carries the deleted marker are skipped during scans; a scan limit
//! bounds records read, so deleted records still consume limit slots.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use encoding_rs::Encoding;

use super::column::{parse_columns, Column};
use super::errors::{AdtError, AdtResult};
use super::header::{Header, COLUMN_DESCRIPTOR_LENGTH, DELETED_MARKER, HEADER_LENGTH, RECORD_PREFIX_LENGTH};
use super::value::{decode_field, Value};

/// One decoded record: column name to typed value
pub type Record = HashMap<String, Value>;

/// Encoding used for 8-bit text columns when none is configured.
///
/// The WHATWG lookup resolves the ISO-8859-1 label to windows-1252.
pub fn default_encoding() -> &'static Encoding {
    encoding_rs::WINDOWS_1252
}

/// Options for a bulk record scan
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// First record index to read; clamped to `[0, record_count]`
    pub offset: Option<u32>,
    /// How many records to read (not return; deleted records are read but
    /// skipped). Default: all remaining.
    pub limit: Option<u32>,
    /// Column whitelist, matched case-insensitively. Restricts which fields
    /// are decoded and which keys each record carries, in this order.
    pub columns: Option<Vec<String>>,
}

/// An open ADT table file.
///
/// Header and column catalog are parsed at open and immutable thereafter.
/// The file handle is released by [`AdtFile::close`] (idempotent) or on drop.
#[derive(Debug)]
pub struct AdtFile {
    file: Option<File>,
    encoding: &'static Encoding,
    header: Header,
    columns: Vec<Column>,
}

impl AdtFile {
    /// Opens a table file and parses its header and column descriptors.
    pub fn open(path: &Path, encoding: Option<&'static Encoding>) -> AdtResult<Self> {
        let encoding = encoding.unwrap_or_else(default_encoding);
        let mut file = File::open(path)?;

        let mut header_buf = [0u8; HEADER_LENGTH];
        file.read_exact(&mut header_buf)?;
        let header = Header::parse(&header_buf)?;

        let mut catalog = vec![0u8; COLUMN_DESCRIPTOR_LENGTH * header.column_count];
        file.read_exact(&mut catalog)?;
        let columns = parse_columns(&catalog, header.column_count, encoding);

        let field_bytes: usize = columns.iter().map(|c| c.length).sum();
        if RECORD_PREFIX_LENGTH + field_bytes > header.record_length as usize {
            return Err(AdtError::InvalidRecordLayout {
                record_length: header.record_length,
            });
        }
        for column in &columns {
            if let Some(expected) = column.field_type.fixed_width() {
                if column.length < expected {
                    return Err(AdtError::InvalidFieldWidth {
                        column: column.name.clone(),
                        length: column.length,
                        expected,
                    });
                }
            }
        }

        Ok(Self {
            file: Some(file),
            encoding,
            header,
            columns,
        })
    }

    /// Total records in the file, deleted records included
    pub fn record_count(&self) -> u32 {
        self.header.record_count
    }

    /// The column catalog in file order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Reads records in file-physical order.
    ///
    /// Deleted records are skipped and do not appear in the result; they do
    /// count against `limit`, which bounds how many records are read.
    pub fn fetch_records(&mut self, options: &FetchOptions) -> AdtResult<Vec<Record>> {
        let record_count = self.header.record_count;
        let start = options.offset.unwrap_or(0).min(record_count);
        let end = match options.limit {
            Some(limit) => start.saturating_add(limit).min(record_count),
            None => record_count,
        };

        let selected = self.select_columns(options.columns.as_deref())?;

        let record_length = self.header.record_length as usize;
        let data_offset = self.header.data_offset as u64;
        let file = self.file.as_mut().ok_or(AdtError::Closed)?;
        file.seek(SeekFrom::Start(
            data_offset + record_length as u64 * start as u64,
        ))?;

        let mut records = Vec::new();
        let mut buf = vec![0u8; record_length];
        for _ in start..end {
            file.read_exact(&mut buf)?;
            if buf[0] == DELETED_MARKER {
                continue;
            }
            records.push(decode_record(&buf, &selected, &self.columns, self.encoding));
        }
        Ok(records)
    }

    /// Reads a single record by physical index.
    ///
    /// Unlike scans, this does not skip deleted records.
    pub fn fetch_record(&mut self, index: u32) -> AdtResult<Record> {
        if index > self.header.record_count {
            return Err(AdtError::RecordOutOfRange {
                index,
                record_count: self.header.record_count,
            });
        }

        let record_length = self.header.record_length as usize;
        let data_offset = self.header.data_offset as u64;
        let file = self.file.as_mut().ok_or(AdtError::Closed)?;
        file.seek(SeekFrom::Start(
            data_offset + record_length as u64 * index as u64,
        ))?;

        let mut buf = vec![0u8; record_length];
        file.read_exact(&mut buf)?;
        let all: Vec<usize> = (0..self.columns.len()).collect();
        Ok(decode_record(&buf, &all, &self.columns, self.encoding))
    }

    /// Releases the file handle. Safe to call more than once.
    pub fn close(&mut self) {
        self.file.take();
    }

    /// Resolves a column whitelist to catalog indices, in caller order.
    ///
    /// Every unmatched name is collected into one error.
    fn select_columns(&self, names: Option<&[String]>) -> AdtResult<Vec<usize>> {
        let names = match names {
            Some(names) => names,
            None => return Ok((0..self.columns.len()).collect()),
        };

        let mut selected = Vec::with_capacity(names.len());
        let mut unmatched = Vec::new();
        for name in names {
            match self
                .columns
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(name))
            {
                Some(index) => selected.push(index),
                None => unmatched.push(name.clone()),
            }
        }
        if !unmatched.is_empty() {
            return Err(AdtError::InvalidColumnNames(unmatched));
        }
        Ok(selected)
    }
}

fn decode_record(
    buf: &[u8],
    selected: &[usize],
    columns: &[Column],
    encoding: &'static Encoding,
) -> Record {
    let mut record = Record::with_capacity(selected.len());
    for &index in selected {
        let column = &columns[index];
        let field = &buf[column.offset..column.offset + column.length];
        record.insert(
            column.name.clone(),
            decode_field(field, column.field_type, encoding),
        );
    }
    record
}
