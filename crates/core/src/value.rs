//! Dynamic application values.
//!
//! `Value` is the closed set of value categories the attribute codec knows how
//! to marshal. Anything an application wants to persist must first be
//! expressed as one of these variants; there is no open-ended fallback.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

/// A dynamic value exchanged with the attribute codec.
///
/// `Null` is a distinguishable placeholder written by the store's explicit
/// null marker; it is a value in its own right, not the absence of one.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    String(String),
    Int(i64),
    Float(f64),
    /// An instant in time. Encoded as Unix epoch seconds, truncated.
    Timestamp(DateTime<Utc>),
    /// A calendar date. Normalized to the UTC midnight instant before encoding.
    Date(NaiveDate),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
    /// A set with membership semantics. Order is not significant and members
    /// are unique; a `Vec` is used because float members rule out `Ord`/`Hash`
    /// based containers.
    Set(Vec<Value>),
}

impl Value {
    /// Human-readable category name, used in codec error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Map(_) => "map",
            Value::List(_) => "list",
            Value::Set(_) => "set",
        }
    }

    /// True for the textual category (`String`).
    pub fn is_text(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// True for the numeric categories (`Int` and `Float`).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}
