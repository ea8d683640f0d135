//! The in-memory representation of parsed TDAT data.
//!
//! A [`Model`] is an ordered sequence of [`Table`]s; a table has a name,
//! typed [`Column`]s and data [`Row`]s; each row holds one [`Value`] per
//! column, in column order.
//!
//! Models come from two construction paths that produce the same shape:
//! the parser ([`crate::parse_str`] and friends) and the programmatic
//! [`crate::Builder`]. Both feed the validator, the renderer and the
//! exporters.
//!
//! ## Values and nulls
//!
//! [`Value`] is a tagged union. A null cell is not a separate type: it is
//! [`Value::Null`] carrying the [`ValueType`] of its owning column, so
//! `row.values[i].value_type()` always matches `table.columns[i].value_type`
//! in a valid model, null or not.
//!
//! ```rust
//! use tdat::{Value, ValueType};
//!
//! let v = Value::Null(ValueType::Float);
//! assert!(v.is_null());
//! assert_eq!(v.value_type(), ValueType::Float);
//! ```

use chrono::{DateTime, Utc};
use std::fmt;

/// A parsed or programmatically built TDAT document: zero or more tables.
///
/// The parser permits duplicate table names; uniqueness is checked by
/// [`crate::validate_model`], not by the grammar.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Model {
    pub tables: Vec<Table>,
}

/// A named table with typed columns and data rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// A column definition: a name plus a declared value type.
///
/// In text form a column is the header cell `name:code` where `code` is one
/// of `i`, `f`, `b`, `s`, `t`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub value_type: ValueType,
}

/// A single data row: one value per column, in column order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Row {
    pub values: Vec<Value>,
}

/// The type of a column or value.
///
/// Each type has a one-character code used in header cells.
///
/// # Examples
///
/// ```rust
/// use tdat::ValueType;
///
/// assert_eq!(ValueType::Int.code(), 'i');
/// assert_eq!(ValueType::from_code('t'), Some(ValueType::Time));
/// assert_eq!(ValueType::from_code('x'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 64-bit signed integer, code `i`.
    Int,
    /// 64-bit float, code `f`.
    Float,
    /// Boolean, code `b`.
    Bool,
    /// String, code `s`.
    String,
    /// UTC timestamp with millisecond precision, code `t`.
    Time,
}

impl ValueType {
    /// Returns the one-character type code used in header cells.
    #[inline]
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            ValueType::Int => 'i',
            ValueType::Float => 'f',
            ValueType::Bool => 'b',
            ValueType::String => 's',
            ValueType::Time => 't',
        }
    }

    /// Looks up a type by its header code. Returns `None` for any other
    /// character.
    #[inline]
    #[must_use]
    pub const fn from_code(code: char) -> Option<ValueType> {
        match code {
            'i' => Some(ValueType::Int),
            'f' => Some(ValueType::Float),
            'b' => Some(ValueType::Bool),
            's' => Some(ValueType::String),
            't' => Some(ValueType::Time),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single cell value.
///
/// The variant tag is always the owning column's declared type; a null cell
/// is [`Value::Null`] with that type attached, never the zero value of the
/// type.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Time(DateTime<Utc>),
    Null(ValueType),
}

impl Value {
    /// Returns the type of this value. For [`Value::Null`] this is the type
    /// the null was declared with.
    #[inline]
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Time(_) => ValueType::Time,
            Value::Null(t) => *t,
        }
    }

    /// Returns `true` if this is a null cell (of any type).
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a float, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise
    /// returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a timestamp, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_codes() {
        for t in [
            ValueType::Int,
            ValueType::Float,
            ValueType::Bool,
            ValueType::String,
            ValueType::Time,
        ] {
            assert_eq!(ValueType::from_code(t.code()), Some(t));
        }
        assert_eq!(ValueType::from_code('x'), None);
        assert_eq!(ValueType::from_code('I'), None);
    }

    #[test]
    fn test_null_keeps_column_type() {
        let v = Value::Null(ValueType::Time);
        assert!(v.is_null());
        assert_eq!(v.value_type(), ValueType::Time);
        assert_eq!(v.as_time(), None);
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("joe"), Value::String("joe".to_string()));
        assert!(!Value::from("joe").is_null());
    }
}
