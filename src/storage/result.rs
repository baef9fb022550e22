//! Schema-agnostic query results
//!
//! A `ResultSet` keeps the column names in result order and every row as a
//! `Record` that can be addressed by position or (case-insensitively) by
//! column name. Nothing here knows about `FUNCTIONS` or `CLONES`.

use std::fmt;
use std::sync::Arc;
use rusqlite::types::ValueRef;
use crate::{Error, Result};

/// A single cell value as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Interpret the value as an integer.
    ///
    /// Text is parsed, reals are accepted only when they carry no fraction.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as text (integers and reals are formatted)
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::Blob(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

fn position_of(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.eq_ignore_ascii_case(name))
}

/// One row, addressable by column name
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Look up a value by column name (ASCII case-insensitive)
    pub fn get(&self, column: &str) -> Option<&Value> {
        position_of(&self.columns, column).and_then(|idx| self.values.get(idx))
    }

    /// Iterate `(column, value)` pairs in result order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Required integer column
    pub fn require_i64(&self, column: &str) -> Result<i64> {
        let value = self
            .get(column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
        value.as_i64().ok_or_else(|| Error::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    /// Required text column
    pub fn require_text(&self, column: &str) -> Result<String> {
        let value = self
            .get(column)
            .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
        value.as_text().ok_or_else(|| Error::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    /// Optional integer column; `None` when the column is absent or not an integer
    pub fn optional_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }
}

/// Column names plus fully fetched rows
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Arc<[String]>,
    rows: Vec<Record>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row; the values must be in column order
    pub fn push(&mut self, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(Record::new(Arc::clone(&self.columns), values));
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
