//! Column descriptor catalog.
//!
//! Each column is described by 200 bytes following the header: the first 128
//! bytes hold the encoded column name, byte 129 a 16-bit field type code and
//! byte 135 a 16-bit field width. Field offsets within a record are
//! precomputed once at open so bulk scans never re-parse the catalog.

use encoding_rs::Encoding;

use super::bytes::u16_at;
use super::header::{COLUMN_DESCRIPTOR_LENGTH, RECORD_PREFIX_LENGTH};
use super::value::decode_text;

/// ADT field type codes.
///
/// Reference: Advantage Database Server field types and specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Logical,
    Date,
    Character,
    Double,
    Integer,
    Short,
    Time,
    Timestamp,
    Autoincrement,
    CiCharacter,
    NChar,
    /// Any code this decoder does not know; fields decode to null
    Unknown(u16),
}

impl FieldType {
    /// Maps a raw 16-bit type code to a field type
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => FieldType::Logical,
            3 => FieldType::Date,
            4 => FieldType::Character,
            10 => FieldType::Double,
            11 => FieldType::Integer,
            12 => FieldType::Short,
            13 => FieldType::Time,
            14 => FieldType::Timestamp,
            15 => FieldType::Autoincrement,
            20 => FieldType::CiCharacter,
            26 => FieldType::NChar,
            other => FieldType::Unknown(other),
        }
    }

    /// Bytes a field of this type must at least occupy, for types decoded
    /// with a fixed layout. Text types are variable-width; TIME and unknown
    /// codes are never read.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldType::Logical => Some(1),
            FieldType::Short => Some(2),
            FieldType::Date | FieldType::Integer | FieldType::Autoincrement => Some(4),
            FieldType::Double | FieldType::Timestamp => Some(8),
            FieldType::Character
            | FieldType::CiCharacter
            | FieldType::NChar
            | FieldType::Time
            | FieldType::Unknown(_) => None,
        }
    }
}

/// One column of the table, fixed at open time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Trimmed, NUL-stripped column name
    pub name: String,
    /// Decoded field type
    pub field_type: FieldType,
    /// Byte offset of this column's data within a record
    pub offset: usize,
    /// Byte width of the field
    pub length: usize,
}

/// Parses the column catalog region.
///
/// `buf` must hold `column_count` consecutive 200-byte descriptors. Offsets
/// start after the record status prefix and accumulate the preceding field
/// widths.
pub(super) fn parse_columns(
    buf: &[u8],
    column_count: usize,
    encoding: &'static Encoding,
) -> Vec<Column> {
    let mut columns = Vec::with_capacity(column_count);
    let mut offset = RECORD_PREFIX_LENGTH;

    for i in 0..column_count {
        let descriptor = &buf[i * COLUMN_DESCRIPTOR_LENGTH..(i + 1) * COLUMN_DESCRIPTOR_LENGTH];
        let name = decode_text(&descriptor[..128], encoding);
        let field_type = FieldType::from_code(u16_at(descriptor, 129));
        let length = u16_at(descriptor, 135) as usize;
        columns.push(Column {
            name,
            field_type,
            offset,
            length,
        });
        offset += length;
    }

    columns
}
