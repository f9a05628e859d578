//! Column-equality filters.
//!
//! Clients post a JSON object mapping a column name to the value it must
//! equal. Each key is looked up on its own and the matching row ids are
//! returned under that key, so `{"floor": 2, "is_occupied": true}` yields two
//! independent id lists rather than their intersection.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Column name to expected value, as received from the client.
pub type ColumnFilter = BTreeMap<String, Value>;

/// Column name to the ids of the rows whose column equals the filter value.
pub type FilterMatches = BTreeMap<String, Vec<i32>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter column '{column}', expected one of: {allowed}")]
    UnknownColumn { column: String, allowed: String },

    #[error("filter value for '{column}' must be a scalar")]
    NotScalar { column: String },

    #[error("filter value for '{column}' must be {expected}")]
    WrongType {
        column: String,
        expected: &'static str,
    },
}

/// Fail unless `column` is one of `allowed`.
pub fn ensure_column(column: &str, allowed: &[&str]) -> Result<(), FilterError> {
    if allowed.contains(&column) {
        Ok(())
    } else {
        Err(FilterError::UnknownColumn {
            column: column.to_string(),
            allowed: allowed.join(", "),
        })
    }
}

fn scalar<'a>(column: &str, value: &'a Value) -> Result<&'a Value, FilterError> {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => Err(FilterError::NotScalar {
            column: column.to_string(),
        }),
        other => Ok(other),
    }
}

fn wrong_type(column: &str, expected: &'static str) -> FilterError {
    FilterError::WrongType {
        column: column.to_string(),
        expected,
    }
}

/// Integers are accepted as JSON numbers or numeric strings.
pub fn int_value(column: &str, value: &Value) -> Result<i32, FilterError> {
    match scalar(column, value)? {
        Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| wrong_type(column, "a 32-bit integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| wrong_type(column, "a 32-bit integer")),
        _ => Err(wrong_type(column, "a 32-bit integer")),
    }
}

/// Booleans are accepted as JSON booleans or `"true"`/`"false"`.
pub fn bool_value(column: &str, value: &Value) -> Result<bool, FilterError> {
    match scalar(column, value)? {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => s.trim().parse().map_err(|_| wrong_type(column, "a boolean")),
        _ => Err(wrong_type(column, "a boolean")),
    }
}

pub fn text_value<'a>(column: &str, value: &'a Value) -> Result<&'a str, FilterError> {
    match scalar(column, value)? {
        Value::String(s) => Ok(s.as_str()),
        _ => Err(wrong_type(column, "a string")),
    }
}

/// Timestamps must be RFC 3339 strings.
pub fn timestamp_value(column: &str, value: &Value) -> Result<DateTime<Utc>, FilterError> {
    let raw = text_value(column, value).map_err(|e| match e {
        FilterError::WrongType { .. } => wrong_type(column, "an RFC 3339 timestamp"),
        other => other,
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| wrong_type(column, "an RFC 3339 timestamp"))
}
