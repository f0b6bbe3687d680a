//! Decoder for ADT fixed-record binary table files.
//!
//! An ADT file is a 400-byte header, a 200-byte descriptor per column, and a
//! data region of fixed-width records, each prefixed by status bytes. The
//! decoder parses the layout once at open and then serves typed record reads.

mod bytes;
mod column;
mod errors;
mod file;
mod header;
#[cfg(test)]
pub(crate) mod testutil;
mod value;

pub use column::{Column, FieldType};
pub use errors::{AdtError, AdtResult};
pub use file::{default_encoding, AdtFile, FetchOptions, Record};
pub use header::{Header, DELETED_MARKER};
pub use value::Value;
