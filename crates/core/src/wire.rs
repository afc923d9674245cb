//! Wire-format types for the remote store.
//!
//! `WireValue` is the store's tagged attribute encoding: exactly one field is
//! populated per value, e.g. `{"s": "text"}` or `{"n": "1.2"}`. `WriteRequest`
//! is the per-operation shape of a batched write call, and the capacity types
//! model the per-call consumption report the store returns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An attribute map exchanged with the store: attribute name to wire value.
pub type Item = HashMap<String, WireValue>;

/// A single value in the store's tagged attribute encoding.
///
/// Serializes externally tagged, matching the store wire protocol:
/// `{bool: ..} | {null: true} | {s: ..} | {n: ..} | {m: ..} | {l: ..}
/// | {ss: [..]} | {ns: [..]}`.
///
/// Invariants upheld by the codec: `Ss`/`Ns` are never empty (an empty set
/// collapses to `Null` before encoding) and never mix kinds. `Null(false)` is
/// the degenerate "tagged value with nothing populated" case; it can arrive
/// off the wire but never flattens to a value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireValue {
    Bool(bool),
    Null(bool),
    S(String),
    N(String),
    M(HashMap<String, WireValue>),
    L(Vec<WireValue>),
    Ss(Vec<String>),
    Ns(Vec<String>),
}

/// One operation inside a batched write call.
///
/// Serializes to `{"put": {"item": {..}}}` or `{"delete": {"key": {..}}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteRequest {
    Put { item: Item },
    Delete { key: Item },
}

/// Capacity consumed by one table during one store call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableCapacity {
    pub table_name: String,
    pub capacity_units: f64,
}

impl TableCapacity {
    pub fn new(table_name: impl Into<String>, capacity_units: f64) -> Self {
        Self {
            table_name: table_name.into(),
            capacity_units,
        }
    }
}

/// A consumed-capacity report returned by a store call.
///
/// The store reports either a single entry or a list of entries when a call
/// touches several tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CapacityReport {
    Single(TableCapacity),
    Multiple(Vec<TableCapacity>),
}

impl CapacityReport {
    /// View the report as a list of entries regardless of its shape.
    pub fn entries(&self) -> &[TableCapacity] {
        match self {
            CapacityReport::Single(entry) => std::slice::from_ref(entry),
            CapacityReport::Multiple(entries) => entries.as_slice(),
        }
    }

    /// An empty report, for calls that consumed nothing.
    pub fn empty() -> Self {
        CapacityReport::Multiple(Vec::new())
    }
}
