//! Converting a [`Model`] to JSON and CSV.
//!
//! Both exporters expect a validated model: rows must have exactly one
//! value per column, since cells are matched to columns by position.
//!
//! JSON output is an object keyed by table name, each table an array of
//! row objects keyed by column name. Null cells become JSON `null`,
//! timestamps become RFC 3339 strings. CSV output uses `;` as the field
//! delimiter and emits, per table, a name record, a header record of
//! column names and one record per row, followed by an empty line.

use std::io::Write;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Result;
use crate::model::{Model, Row, Table, Value};

struct JsonModel<'a>(&'a Model);

impl Serialize for JsonModel<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.tables.len()))?;
        for table in &self.0.tables {
            map.serialize_entry(&table.name, &JsonTable(table))?;
        }
        map.end()
    }
}

struct JsonTable<'a>(&'a Table);

impl Serialize for JsonTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&JsonRow {
                table: self.0,
                row,
            })?;
        }
        seq.end()
    }
}

struct JsonRow<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.columns.len()))?;
        for (column, value) in self.table.columns.iter().zip(&self.row.values) {
            map.serialize_entry(&column.name, &JsonValue(value))?;
        }
        map.end()
    }
}

struct JsonValue<'a>(&'a Value);

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null(_) => serializer.serialize_none(),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
        }
    }
}

/// Converts a model to a compact JSON string.
pub fn to_json_string(model: &Model) -> Result<String> {
    let json = serde_json::to_string(&JsonModel(model))?;
    Ok(json)
}

/// Converts a model to a JSON string, pretty-printed with the given
/// indent per nesting level.
pub fn to_json_string_pretty(model: &Model, indent: &str) -> Result<String> {
    let mut buf = Vec::new();
    to_json_writer_pretty(model, indent, &mut buf)?;
    String::from_utf8(buf).map_err(|e| crate::Error::Json(e.to_string()))
}

/// Writes a model as compact JSON to the given writer.
pub fn to_json_writer<W: Write>(model: &Model, writer: W) -> Result<()> {
    serde_json::to_writer(writer, &JsonModel(model))?;
    Ok(())
}

/// Writes a model as pretty-printed JSON to the given writer.
pub fn to_json_writer_pretty<W: Write>(model: &Model, indent: &str, writer: W) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    JsonModel(model).serialize(&mut ser)?;
    Ok(())
}

/// Converts a model to a CSV string.
pub fn to_csv_string(model: &Model) -> Result<String> {
    let mut buf = Vec::new();
    to_csv_writer(model, &mut buf)?;
    String::from_utf8(buf).map_err(|e| crate::Error::Csv(e.to_string()))
}

/// Writes a model as CSV to the given writer.
///
/// Fields are separated by `;`. Tables with no columns emit only their
/// name record and the separating empty line.
pub fn to_csv_writer<W: Write>(model: &Model, mut writer: W) -> Result<()> {
    for table in &model.tables {
        // scope a csv writer per table; the blank separator line must
        // bypass it, since a csv writer turns an empty record into a
        // quoted empty field
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_writer(&mut writer);
        csv_writer.write_record([table.name.as_str()])?;
        if !table.columns.is_empty() {
            csv_writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
            for row in &table.rows {
                csv_writer.write_record(row.values.iter().map(csv_cell))?;
            }
        }
        csv_writer.flush()?;
        drop(csv_writer);
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null(_) => String::new(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{f:.6}"),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Time(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
