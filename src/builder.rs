//! Programmatic model construction.
//!
//! [`Builder`] constructs a [`Model`] without going through text, which is
//! handy for tests and sample generation. It produces the exact same model
//! shape as the parser, and [`Builder::build`] always re-runs validation.
//!
//! The typed `add_*` methods take an `Option`; passing `None` appends a
//! null value of the column's type. Supplying a value of the wrong type is
//! impossible by construction since every value enters as a [`Value`]
//! variant.
//!
//! # Examples
//!
//! ```rust
//! use tdat::{Builder, render_to_string};
//!
//! let mut builder = Builder::new();
//! let table = builder.add_table("products");
//! table.add_int_column("id");
//! table.add_string_column("name");
//! let row = table.add_row();
//! row.add_int(Some(1));
//! row.add_string(Some("bottle"));
//! let row = table.add_row();
//! row.add_int(Some(2));
//! row.add_string(None::<String>);
//!
//! let model = builder.build().unwrap();
//! let txt = render_to_string(&model, 10).unwrap();
//! assert_eq!(
//!     txt,
//!     "products\n|id:i      |name:s\n|1         |\"bottle\"\n|2         |\n\n"
//! );
//! ```

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{Column, Model, Row, Table, Value, ValueType};
use crate::validate::validate_model;

/// Builds models table by table. Initially empty.
#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<TableBuilder>,
}

impl Builder {
    /// Creates a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new table and returns its [`TableBuilder`] for adding columns
    /// and rows.
    pub fn add_table(&mut self, name: impl Into<String>) -> &mut TableBuilder {
        self.tables.push(TableBuilder {
            name: name.into(),
            columns: Vec::new(),
            row_builders: Vec::new(),
        });
        self.tables.last_mut().expect("table just added")
    }

    /// Builds the model and validates it.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the assembled model violates any
    /// structural rule (see [`crate::validate_model`]).
    pub fn build(self) -> Result<Model> {
        let model = Model {
            tables: self.tables.into_iter().map(TableBuilder::build).collect(),
        };
        validate_model(&model)?;
        Ok(model)
    }
}

/// Builds a single table.
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    columns: Vec<Column>,
    row_builders: Vec<RowBuilder>,
}

impl TableBuilder {
    /// Adds a column with the given name and type.
    pub fn add_column(&mut self, name: impl Into<String>, value_type: ValueType) -> &mut Self {
        self.columns.push(Column {
            name: name.into(),
            value_type,
        });
        self
    }

    /// Adds an int (`i`) column.
    pub fn add_int_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_column(name, ValueType::Int)
    }

    /// Adds a float (`f`) column.
    pub fn add_float_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_column(name, ValueType::Float)
    }

    /// Adds a bool (`b`) column.
    pub fn add_bool_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_column(name, ValueType::Bool)
    }

    /// Adds a string (`s`) column.
    pub fn add_string_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_column(name, ValueType::String)
    }

    /// Adds a timestamp (`t`) column.
    pub fn add_time_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_column(name, ValueType::Time)
    }

    /// Adds a new row and returns its [`RowBuilder`] for adding values.
    pub fn add_row(&mut self) -> &mut RowBuilder {
        self.row_builders.push(RowBuilder::default());
        self.row_builders.last_mut().expect("row just added")
    }

    fn build(self) -> Table {
        Table {
            name: self.name,
            columns: self.columns,
            rows: self.row_builders.into_iter().map(RowBuilder::build).collect(),
        }
    }
}

/// Builds a single row.
#[derive(Debug, Default)]
pub struct RowBuilder {
    values: Vec<Value>,
}

impl RowBuilder {
    /// Appends a value. Use [`Value::Null`] for a typed null.
    pub fn add_value(&mut self, value: Value) -> &mut Self {
        self.values.push(value);
        self
    }

    fn build(self) -> Row {
        Row {
            values: self.values,
        }
    }

    /// Appends an int value, or an int-typed null for `None`.
    pub fn add_int(&mut self, val: Option<i64>) -> &mut Self {
        self.add_value(val.map_or(Value::Null(ValueType::Int), Value::Int))
    }

    /// Appends a float value, or a float-typed null for `None`.
    pub fn add_float(&mut self, val: Option<f64>) -> &mut Self {
        self.add_value(val.map_or(Value::Null(ValueType::Float), Value::Float))
    }

    /// Appends a bool value, or a bool-typed null for `None`.
    pub fn add_bool(&mut self, val: Option<bool>) -> &mut Self {
        self.add_value(val.map_or(Value::Null(ValueType::Bool), Value::Bool))
    }

    /// Appends a string value, or a string-typed null for `None`.
    pub fn add_string<S: Into<String>>(&mut self, val: Option<S>) -> &mut Self {
        self.add_value(val.map_or(Value::Null(ValueType::String), |s| Value::String(s.into())))
    }

    /// Appends a timestamp value, or a time-typed null for `None`.
    pub fn add_time(&mut self, val: Option<DateTime<Utc>>) -> &mut Self {
        self.add_value(val.map_or(Value::Null(ValueType::Time), Value::Time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_build_and_validate() {
        let date = NaiveDate::from_ymd_opt(2012, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc();

        let mut builder = Builder::new();
        let table = builder.add_table("products");
        table.add_int_column("id");
        table.add_string_column("name");
        table.add_time_column("date");
        table
            .add_row()
            .add_int(Some(1))
            .add_string(Some("bottle"))
            .add_time(Some(date));
        table
            .add_row()
            .add_value(Value::Int(2))
            .add_value(Value::String("unknown".to_string()))
            .add_time(None);

        let model = builder.build().unwrap();
        assert_eq!(model.tables.len(), 1);
        let table = &model.tables[0];
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].values[2], Value::Time(date));
        assert_eq!(table.rows[1].values[2], Value::Null(ValueType::Time));
    }

    #[test]
    fn test_build_rejects_invalid_model() {
        let mut builder = Builder::new();
        let table = builder.add_table("products");
        table.add_int_column("id");
        table.add_row(); // empty row, arity 0 != 1
        let err = builder.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "table \"products\": row 1: expected 1 values but got 0"
        );
    }

    #[test]
    fn test_build_rejects_whitespace_table_name() {
        // a non-breaking space would not survive a render/parse cycle
        let mut builder = Builder::new();
        let table = builder.add_table("t\u{00A0}");
        table.add_int_column("id");
        table.add_row().add_int(Some(1));
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("invalid character"), "{err}");
    }

    #[test]
    fn test_builder_matches_parser_shape() {
        let mut builder = Builder::new();
        let table = builder.add_table("t");
        table.add_int_column("a").add_string_column("b");
        table.add_row().add_int(Some(1)).add_string(None::<String>);
        let built = builder.build().unwrap();

        let parsed = crate::parse_str("t\n|a:i|b:s\n|1|\n").unwrap();
        assert_eq!(built, parsed);
    }
}
