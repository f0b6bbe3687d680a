//! AST for the supported SQL subset.
//!
//! These are data-only structures: the parser produces them and the executor
//! consumes them. Column references are qualified `table.column` strings;
//! table aliases from the SQL text are resolved away during parsing.

/// A parsed query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    /// Tables in FROM-clause order
    pub tables: Vec<String>,
    /// Every WHERE conjunct: joins and single-table comparisons
    pub restrictions: Vec<Restriction>,
    /// Output columns in SELECT order
    pub projections: Vec<Projection>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// When set, each result row also carries its 0-based ordinal under this
    /// alias. Never produced by the textual grammar.
    pub row_index_alias: Option<String>,
}

/// Comparison operators usable against a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

/// A literal comparison operand
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(f64),
}

/// One WHERE conjunct
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// Equality between two qualified column references
    Join { column: String, column2: String },
    /// Comparison between a qualified column reference and a literal
    Value {
        column: String,
        op: CompareOp,
        value: Literal,
    },
}

impl Restriction {
    pub fn join(column: impl Into<String>, column2: impl Into<String>) -> Self {
        Restriction::Join {
            column: column.into(),
            column2: column2.into(),
        }
    }

    pub fn value(column: impl Into<String>, op: CompareOp, value: Literal) -> Self {
        Restriction::Value {
            column: column.into(),
            op,
            value,
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(self, Restriction::Join { .. })
    }
}

/// One SELECT output column
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Qualified source reference (`table.column`)
    pub column: String,
    /// Output name
    pub alias: String,
}

impl Projection {
    pub fn new(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            alias: alias.into(),
        }
    }
}

/// Splits a qualified reference at the first `.` into table and column parts.
///
/// An unqualified reference yields an empty table part.
pub fn split_qualified(reference: &str) -> (&str, &str) {
    match reference.find('.') {
        Some(pos) => (&reference[..pos], &reference[pos + 1..]),
        None => ("", reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_uses_first_dot() {
        assert_eq!(split_qualified("orders.OrderNo"), ("orders", "OrderNo"));
        assert_eq!(split_qualified("t.a.b"), ("t", "a.b"));
        assert_eq!(split_qualified("bare"), ("", "bare"));
    }
}
