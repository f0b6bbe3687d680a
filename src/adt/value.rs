//! Typed field values and fixed-width field decoding.
//!
//! Every field decodes directly into a [`Value`] in one pass; no untyped
//! byte representation survives past a record read. Null sentinels are
//! type-specific: INTEGER uses the minimum 32-bit value, DATE uses julian
//! day zero, TIMESTAMP uses julian zero with millisecond -1.

use chrono::{DateTime, NaiveDate, Utc};
use encoding_rs::Encoding;
use serde::ser::{Serialize, Serializer};

use super::bytes::{f64_at, i16_at, i32_at, u32_at};
use super::column::FieldType;

/// Julian day number of the Unix epoch (1970-01-01)
const JULIAN_UNIX_EPOCH: i32 = 2_440_588;
/// Days from chrono's CE epoch to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;
const MS_PER_DAY: i64 = 86_400_000;
/// INTEGER bit pattern reserved for null
const INTEGER_NULL: i32 = i32::MIN;

/// A decoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Field-level null, from a type's null sentinel or an unknown type code
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    /// Date-only instant
    Date(NaiveDate),
    /// Date-time instant
    Timestamp(DateTime<Utc>),
    /// Marker for field types this decoder does not support (TIME);
    /// distinguishable from null and from every usable value
    Unsupported,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::Text(t) => serializer.serialize_str(t),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            Value::Unsupported => serializer.serialize_str("<unsupported>"),
        }
    }
}

/// Decodes text bytes with the given encoding, stripping NUL padding and
/// surrounding whitespace.
pub(super) fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.replace('\0', "").trim().to_string()
}

/// Decodes one fixed-width field into a typed value.
pub(super) fn decode_field(bytes: &[u8], field_type: FieldType, encoding: &'static Encoding) -> Value {
    match field_type {
        FieldType::Character | FieldType::CiCharacter => Value::Text(decode_text(bytes, encoding)),
        FieldType::NChar => Value::Text(decode_text(bytes, encoding_rs::UTF_16LE)),
        FieldType::Double => Value::Double(f64_at(bytes, 0)),
        FieldType::Autoincrement => Value::Integer(u32_at(bytes, 0) as i64),
        FieldType::Integer => match i32_at(bytes, 0) {
            INTEGER_NULL => Value::Null,
            v => Value::Integer(v as i64),
        },
        FieldType::Short => Value::Integer(i16_at(bytes, 0) as i64),
        FieldType::Logical => Value::Bool(matches!(
            bytes.first(),
            Some(b'T' | b't' | b'1' | b'Y' | b'y')
        )),
        FieldType::Date => match i32_at(bytes, 0) {
            0 => Value::Null,
            julian => julian_date(julian),
        },
        FieldType::Timestamp => {
            let julian = i32_at(bytes, 0);
            let ms = i32_at(bytes, 4);
            if julian == 0 && ms == -1 {
                Value::Null
            } else {
                julian_timestamp(julian, ms)
            }
        }
        FieldType::Time => Value::Unsupported,
        FieldType::Unknown(_) => Value::Null,
    }
}

fn julian_date(julian: i32) -> Value {
    let days_from_ce = UNIX_EPOCH_DAYS_FROM_CE + (julian - JULIAN_UNIX_EPOCH);
    match NaiveDate::from_num_days_from_ce_opt(days_from_ce) {
        Some(date) => Value::Date(date),
        None => Value::Null,
    }
}

fn julian_timestamp(julian: i32, ms: i32) -> Value {
    let millis = (julian - JULIAN_UNIX_EPOCH) as i64 * MS_PER_DAY + ms as i64;
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(instant) => Value::Timestamp(instant),
        None => Value::Null,
    }
}
