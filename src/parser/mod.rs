//! SQL-text to AST parsing for the supported query subset.

pub mod ast;
mod errors;
mod parser;

pub use ast::Ast;
pub use errors::{ParseError, ParseResult};
pub use parser::parse_sql;
