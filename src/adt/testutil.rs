//! Builders for synthetic ADT table images used by decoder tests.

use std::io;
use std::path::Path;

use super::header::{COLUMN_DESCRIPTOR_LENGTH, DELETED_MARKER, HEADER_LENGTH, RECORD_PREFIX_LENGTH};

/// In-memory image of a complete table file
pub(crate) struct TableImage {
    columns: Vec<(String, u16, u16)>,
    records: Vec<Vec<u8>>,
}

impl TableImage {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Declares a column with a raw type code and field width
    pub fn column(mut self, name: &str, type_code: u16, length: u16) -> Self {
        self.columns.push((name.to_string(), type_code, length));
        self
    }

    /// Appends a live record; fields are padded or truncated to the declared widths
    pub fn push_record(&mut self, fields: Vec<Vec<u8>>) {
        self.records.push(self.record_image(0, fields));
    }

    /// Appends a logically deleted record
    pub fn push_deleted_record(&mut self, fields: Vec<Vec<u8>>) {
        self.records.push(self.record_image(DELETED_MARKER, fields));
    }

    fn record_image(&self, status: u8, fields: Vec<Vec<u8>>) -> Vec<u8> {
        assert_eq!(fields.len(), self.columns.len(), "one field per column");
        let mut image = vec![0u8; RECORD_PREFIX_LENGTH];
        image[0] = status;
        for (field, (_, _, length)) in fields.into_iter().zip(&self.columns) {
            let mut field = field;
            field.resize(*length as usize, 0);
            image.extend_from_slice(&field);
        }
        image
    }

    fn record_length(&self) -> u32 {
        (RECORD_PREFIX_LENGTH + self.columns.iter().map(|c| c.2 as usize).sum::<usize>()) as u32
    }

    /// Assembles the full file image: header, catalog, record data
    pub fn bytes(&self) -> Vec<u8> {
        let data_offset = (HEADER_LENGTH + COLUMN_DESCRIPTOR_LENGTH * self.columns.len()) as u32;
        let mut out = vec![0u8; data_offset as usize];
        out[24..28].copy_from_slice(&(self.records.len() as u32).to_le_bytes());
        out[32..36].copy_from_slice(&data_offset.to_le_bytes());
        out[36..40].copy_from_slice(&self.record_length().to_le_bytes());

        for (i, (name, type_code, length)) in self.columns.iter().enumerate() {
            let base = HEADER_LENGTH + i * COLUMN_DESCRIPTOR_LENGTH;
            out[base..base + name.len()].copy_from_slice(name.as_bytes());
            out[base + 129..base + 131].copy_from_slice(&type_code.to_le_bytes());
            out[base + 135..base + 137].copy_from_slice(&length.to_le_bytes());
        }

        for record in &self.records {
            out.extend_from_slice(record);
        }
        out
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.bytes())
    }
}

pub(crate) fn text_field(text: &str, length: u16) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(length as usize, b' ');
    bytes
}

pub(crate) fn int_field(value: i32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

pub(crate) fn double_field(value: f64) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

#[allow(dead_code)]
pub(crate) fn short_field(value: i16) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

#[allow(dead_code)]
pub(crate) fn logical_field(byte: u8) -> Vec<u8> {
    vec![byte]
}
