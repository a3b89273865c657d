// Materialized value trees produced by StructView::materialize

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A fully decoded, plain value tree.
///
/// `Struct` keeps fields as an ordered list of pairs so declaration
/// order survives materialization and serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Bytes(Vec<u8>),
    Uint(u64),
    Text(String),
    Named { code: u64, label: String },
    Time(DateTime<FixedOffset>),
    Struct(Vec<(String, Value)>),
    Array(Vec<Value>),
}

impl Value {
    /// Look a field up by name in a `Struct` tree
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}
