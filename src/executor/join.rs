//! Hash-join of two rowsets on one equality clause.
//!
//! One side (the build side) must be a unique key over its rowset: its
//! tuples are indexed by join value, then the probe side is scanned once.
//! A probe hit produces a new merged tuple; a miss drops the tuple
//! (inner-join semantics, never null-padded). Uniqueness violations are an
//! ordinary outcome so the caller can retry with the sides reversed.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::adt::Value;

use super::fetch::{Rowset, Tuple};

/// Hashable stand-in for a join-column value.
///
/// Doubles are keyed by bit pattern; null and unsupported values have no
/// key and never participate in a join.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JoinKey {
    Bool(bool),
    Integer(i64),
    Bits(u64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

fn join_key(value: &Value) -> Option<JoinKey> {
    match value {
        Value::Null | Value::Unsupported => None,
        Value::Bool(b) => Some(JoinKey::Bool(*b)),
        Value::Integer(i) => Some(JoinKey::Integer(*i)),
        Value::Double(d) => Some(JoinKey::Bits(d.to_bits())),
        Value::Text(t) => Some(JoinKey::Text(t.clone())),
        Value::Date(d) => Some(JoinKey::Date(*d)),
        Value::Timestamp(ts) => Some(JoinKey::Timestamp(*ts)),
    }
}

/// True when two tuples carry the same joinable value in the given columns.
/// Nulls are never equal to anything, including each other.
pub(super) fn join_values_equal(
    tuple: &Tuple,
    table: &str,
    column: &str,
    table2: &str,
    column2: &str,
) -> bool {
    let lhs = tuple.get(table).and_then(|r| r.get(column)).and_then(join_key);
    let rhs = tuple
        .get(table2)
        .and_then(|r| r.get(column2))
        .and_then(join_key);
    matches!((lhs, rhs), (Some(a), Some(b)) if a == b)
}

/// Outcome of one join orientation
pub(super) enum JoinAttempt {
    Joined(Rowset),
    /// The build side had a duplicate join value; names the offending column
    NotUnique { table: String, column: String },
}

/// Joins `probe` against an index built over `build`.
///
/// Both rowsets are borrowed; merged tuples are new allocations, so a
/// failed attempt leaves the inputs intact for the reversed retry.
pub(super) fn try_hash_join(
    build: &Rowset,
    build_table: &str,
    build_column: &str,
    probe: &Rowset,
    probe_table: &str,
    probe_column: &str,
) -> JoinAttempt {
    let mut index: HashMap<JoinKey, &Tuple> = HashMap::with_capacity(build.len());
    for tuple in build {
        let value = match tuple.get(build_table).and_then(|r| r.get(build_column)) {
            Some(v) => v,
            None => continue,
        };
        let key = match join_key(value) {
            Some(k) => k,
            None => continue,
        };
        if index.insert(key, tuple).is_some() {
            return JoinAttempt::NotUnique {
                table: build_table.to_string(),
                column: build_column.to_string(),
            };
        }
    }

    let mut joined = Rowset::with_capacity(probe.len());
    for tuple in probe {
        let key = match tuple
            .get(probe_table)
            .and_then(|r| r.get(probe_column))
            .and_then(join_key)
        {
            Some(k) => k,
            None => continue,
        };
        if let Some(matched) = index.get(&key) {
            let mut merged = tuple.clone();
            for (table, record) in matched.iter() {
                merged.insert(table.clone(), record.clone());
            }
            joined.push(merged);
        }
    }
    JoinAttempt::Joined(joined)
}
