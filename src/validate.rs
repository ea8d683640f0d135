//! Structural validation of a completed [`Model`].
//!
//! Validation is a pure walk over an already-shaped model: names must be
//! well-formed, table names unique within the model, column names unique
//! within their table, and every row must carry exactly one value per
//! column with matching types. The first violation found wins; there is no
//! error aggregation.
//!
//! Parsing and validating are deliberately separate phases. The grammar
//! accepts duplicate table names so that callers can parse without
//! validating; [`crate::Builder::build`] always validates.

use indexmap::IndexSet;

use crate::error::{Error, Result};
use crate::model::{Model, Table};

/// Validates a model. Returns the first violation found, walking tables in
/// order, then rows, then values.
///
/// # Examples
///
/// ```rust
/// use tdat::{parse_str, validate_model};
///
/// let model = parse_str("t\n|id:i\n|1\n\nt\n|id:i\n|2\n").unwrap();
/// let err = validate_model(&model).unwrap_err();
/// assert_eq!(err.to_string(), "duplicate table \"t\"");
/// ```
pub fn validate_model(model: &Model) -> Result<()> {
    let mut table_names: IndexSet<&str> = IndexSet::new();
    for table in &model.tables {
        validate_name(&table.name)
            .map_err(|e| Error::validation(format!("table {:?}: {e}", table.name)))?;
        if !table_names.insert(table.name.as_str()) {
            return Err(Error::validation(format!(
                "duplicate table {:?}",
                table.name
            )));
        }
        validate_table(table)
            .map_err(|e| Error::validation(format!("table {:?}: {e}", table.name)))?;
    }
    Ok(())
}

/// Validates a single table: column names and uniqueness, then per-row
/// value count and positional type match.
pub fn validate_table(table: &Table) -> Result<()> {
    let mut column_names: IndexSet<&str> = IndexSet::new();
    for column in &table.columns {
        validate_name(&column.name)
            .map_err(|e| Error::validation(format!("column {:?}: {e}", column.name)))?;
        if !column_names.insert(column.name.as_str()) {
            return Err(Error::validation(format!(
                "duplicate column {:?}",
                column.name
            )));
        }
    }
    let col_count = table.columns.len();
    for (row_index, row) in table.rows.iter().enumerate() {
        let val_count = row.values.len();
        if val_count != col_count {
            return Err(Error::validation(format!(
                "row {}: expected {col_count} values but got {val_count}",
                row_index + 1
            )));
        }
        for (value_index, value) in row.values.iter().enumerate() {
            let column = &table.columns[value_index];
            if value.value_type() != column.value_type {
                return Err(Error::validation(format!(
                    "row {}, value {}: expected value type '{}' but was '{}'",
                    row_index + 1,
                    value_index + 1,
                    column.value_type,
                    value.value_type()
                )));
            }
        }
    }
    Ok(())
}

/// Validates a table or column name: non-empty, no characters at or
/// below the space character, and no whitespace of any kind. Rendered
/// names must survive the lexer's whitespace trimming unchanged.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("name is empty"));
    }
    for c in name.chars() {
        if c <= ' ' || c.is_whitespace() {
            return Err(Error::validation(format!(
                "name contains invalid character {c:?}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Row, Value, ValueType};

    fn table(name: &str, columns: Vec<Column>, rows: Vec<Row>) -> Table {
        Table {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    fn column(name: &str, value_type: ValueType) -> Column {
        Column {
            name: name.to_string(),
            value_type,
        }
    }

    #[test]
    fn test_validate_ok() {
        let model = Model {
            tables: vec![table(
                "products",
                vec![column("id", ValueType::Int), column("name", ValueType::String)],
                vec![Row {
                    values: vec![Value::Int(1), Value::Null(ValueType::String)],
                }],
            )],
        };
        assert!(validate_model(&model).is_ok());
    }

    #[test]
    fn test_validate_no_values() {
        let model = Model {
            tables: vec![table(
                "products",
                vec![column("id", ValueType::Int)],
                vec![Row::default()],
            )],
        };
        let err = validate_model(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "table \"products\": row 1: expected 1 values but got 0"
        );
    }

    #[test]
    fn test_validate_too_many_values() {
        let model = Model {
            tables: vec![table(
                "products",
                vec![column("id", ValueType::Int), column("name", ValueType::String)],
                vec![Row {
                    values: vec![
                        Value::Int(0),
                        Value::String(String::new()),
                        Value::Bool(false),
                    ],
                }],
            )],
        };
        let err = validate_model(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "table \"products\": row 1: expected 2 values but got 3"
        );
    }

    #[test]
    fn test_validate_wrong_value_type() {
        let model = Model {
            tables: vec![table(
                "products",
                vec![column("id", ValueType::Int), column("name", ValueType::String)],
                vec![Row {
                    values: vec![Value::Int(0), Value::Bool(false)],
                }],
            )],
        };
        let err = validate_model(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "table \"products\": row 1, value 2: expected value type 's' but was 'b'"
        );
    }

    #[test]
    fn test_validate_null_carries_type() {
        // a null of the wrong type is still a type mismatch
        let model = Model {
            tables: vec![table(
                "products",
                vec![column("id", ValueType::Int)],
                vec![Row {
                    values: vec![Value::Null(ValueType::Float)],
                }],
            )],
        };
        let err = validate_model(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "table \"products\": row 1, value 1: expected value type 'i' but was 'f'"
        );
    }

    #[test]
    fn test_duplicate_table() {
        let model = Model {
            tables: vec![
                table("products", vec![], vec![]),
                table("products", vec![], vec![]),
            ],
        };
        let err = validate_model(&model).unwrap_err();
        assert_eq!(err.to_string(), "duplicate table \"products\"");
    }

    #[test]
    fn test_duplicate_column() {
        let model = Model {
            tables: vec![table(
                "products",
                vec![column("id", ValueType::Int), column("id", ValueType::String)],
                vec![],
            )],
        };
        let err = validate_model(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "table \"products\": duplicate column \"id\""
        );
    }

    #[test]
    fn test_rejects_unicode_whitespace_name() {
        // whitespace the lexer would trim away on reparse
        assert!(validate_name("t\u{00A0}").is_err());
        assert!(validate_name("t\u{2003}").is_err());
        let model = Model {
            tables: vec![table("t\u{00A0}", vec![], vec![])],
        };
        let err = validate_model(&model).unwrap_err();
        assert!(err.to_string().contains("invalid character"), "{err}");
    }

    #[test]
    fn test_bad_names() {
        assert!(validate_name("id").is_ok());
        assert!(validate_name("customer_number").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a b").is_err());
        assert!(validate_name("a\tb").is_err());
        let model = Model {
            tables: vec![table("bad name", vec![], vec![])],
        };
        let err = validate_model(&model).unwrap_err();
        assert!(err.to_string().contains("table \"bad name\""), "{err}");
    }
}
