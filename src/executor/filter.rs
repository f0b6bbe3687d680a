//! Typed predicate evaluation over decoded records.
//!
//! Predicates are compiled once per table from the AST's value restrictions
//! and interpreted against each record. Strict matching: a missing field or
//! a null value never matches, and values of a different shape than the
//! literal do not compare (no type coercion).

use std::cmp::Ordering;

use crate::adt::{Record, Value};
use crate::parser::ast::{CompareOp, Literal};

/// One compiled comparison against an unqualified column of a single table
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub value: Literal,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CompareOp, value: Literal) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }

    fn matches(&self, record: &Record) -> bool {
        let value = match record.get(&self.column) {
            Some(v) => v,
            None => return false,
        };
        if value.is_null() {
            return false;
        }
        match compare(value, &self.value) {
            Some(ordering) => match self.op {
                CompareOp::Eq => ordering == Ordering::Equal,
                CompareOp::Ne => ordering != Ordering::Equal,
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Ge => ordering != Ordering::Less,
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
            },
            None => false,
        }
    }
}

/// Conjunction of predicates over one table; empty accepts everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    predicates: Vec<Predicate>,
}

impl TableFilter {
    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

fn compare(value: &Value, literal: &Literal) -> Option<Ordering> {
    match (value, literal) {
        (Value::Integer(i), Literal::Number(n)) => (*i as f64).partial_cmp(n),
        (Value::Double(d), Literal::Number(n)) => d.partial_cmp(n),
        (Value::Text(t), Literal::Text(s)) => Some(t.as_str().cmp(s.as_str())),
        _ => None,
    }
}
