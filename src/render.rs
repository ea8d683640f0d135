//! Serializing a [`Model`] back to TDAT text.
//!
//! For each table the renderer emits the name line, a header line of
//! `name:code` cells, one line per data row and a trailing blank line.
//! Cells are pipe-prefixed and left-padded to a minimum column width,
//! except the last cell on each line; a width of zero or less disables
//! padding entirely. Null cells render as the empty string.
//!
//! Rendered output parses back to an equal model (strings with trailing
//! whitespace excepted, since the lexer trims it).

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{Model, Table, Value};

struct Renderer<W: Write> {
    writer: W,
    col_width: i32,
}

impl<W: Write> Renderer<W> {
    fn render_model(&mut self, model: &Model) -> Result<()> {
        for table in &model.tables {
            self.render_table(table)?;
        }
        Ok(())
    }

    fn render_table(&mut self, table: &Table) -> Result<()> {
        self.write(&table.name)?;
        self.write("\n")?;
        let col_count = table.columns.len();
        for (col_index, col) in table.columns.iter().enumerate() {
            let def = format!("{}:{}", col.name, col.value_type.code());
            self.write_cell(&def, col_index + 1 == col_count)?;
        }
        if col_count > 0 {
            self.write("\n")?;
        }
        for row in &table.rows {
            let val_count = row.values.len();
            for (val_index, val) in row.values.iter().enumerate() {
                let cell = render_cell(val);
                self.write_cell(&cell, val_index + 1 == val_count)?;
            }
            if val_count > 0 {
                self.write("\n")?;
            }
        }
        self.write("\n")
    }

    fn write_cell(&mut self, cell: &str, last: bool) -> Result<()> {
        self.write("|")?;
        if self.col_width > 0 && !last {
            let width = self.col_width as usize;
            let padding = width.saturating_sub(cell.chars().count());
            self.write(cell)?;
            for _ in 0..padding {
                self.write(" ")?;
            }
            Ok(())
        } else {
            self.write(cell)
        }
    }

    fn write(&mut self, s: &str) -> Result<()> {
        self.writer
            .write_all(s.as_bytes())
            .map_err(|e| Error::io(e.to_string()))
    }
}

pub(crate) fn render_model<W: Write>(model: &Model, col_width: i32, writer: W) -> Result<()> {
    Renderer { writer, col_width }.render_model(model)
}

fn render_cell(val: &Value) -> String {
    match val {
        Value::Null(_) => String::new(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{f:.6}"),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => quote_string(s),
        Value::Time(t) => format_time(t),
    }
}

/// Double-quotes a string, escaping the quote, the backslash and all
/// control characters. Printable characters, Unicode included, pass
/// through literally.
pub(crate) fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS[.fff]`: no fraction when
/// the millisecond part is zero, trailing zeros trimmed otherwise.
/// Sub-millisecond precision is dropped.
pub(crate) fn format_time(t: &DateTime<Utc>) -> String {
    let base = t.format("%Y-%m-%dT%H:%M:%S").to_string();
    let millis = t.timestamp_subsec_millis();
    if millis == 0 {
        base
    } else {
        let frac = format!("{millis:03}");
        format!("{}.{}", base, frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Row, ValueType};
    use chrono::NaiveDate;

    fn persons_model() -> Model {
        let birth = NaiveDate::from_ymd_opt(2001, 1, 2)
            .unwrap()
            .and_hms_milli_opt(9, 11, 12, 13)
            .unwrap()
            .and_utc();
        Model {
            tables: vec![Table {
                name: "persons".to_string(),
                columns: vec![
                    Column {
                        name: "id".to_string(),
                        value_type: ValueType::Int,
                    },
                    Column {
                        name: "size".to_string(),
                        value_type: ValueType::Float,
                    },
                    Column {
                        name: "flag".to_string(),
                        value_type: ValueType::Bool,
                    },
                    Column {
                        name: "name".to_string(),
                        value_type: ValueType::String,
                    },
                    Column {
                        name: "birth".to_string(),
                        value_type: ValueType::Time,
                    },
                ],
                rows: vec![
                    Row {
                        values: vec![
                            Value::Int(1),
                            Value::Float(1.83),
                            Value::Bool(true),
                            Value::String("Joe \u{2602} Smith".to_string()),
                            Value::Time(birth),
                        ],
                    },
                    Row {
                        values: vec![
                            Value::Null(ValueType::Int),
                            Value::Null(ValueType::Float),
                            Value::Null(ValueType::Bool),
                            Value::Null(ValueType::String),
                            Value::Null(ValueType::Time),
                        ],
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_render_unpadded() {
        let txt = crate::render_to_string(&persons_model(), 0).unwrap();
        let exp = "persons\n\
                   |id:i|size:f|flag:b|name:s|birth:t\n\
                   |1|1.830000|true|\"Joe \u{2602} Smith\"|2001-01-02T09:11:12.013\n\
                   |||||\n\
                   \n";
        assert_eq!(txt, exp);
    }

    #[test]
    fn test_render_padded() {
        let txt = crate::render_to_string(&persons_model(), 10).unwrap();
        let exp = "persons\n\
                   |id:i      |size:f    |flag:b    |name:s    |birth:t\n\
                   |1         |1.830000  |true      |\"Joe \u{2602} Smith\"|2001-01-02T09:11:12.013\n\
                   |          |          |          |          |\n\
                   \n";
        assert_eq!(txt, exp);
    }

    #[test]
    fn test_null_cell_is_all_padding() {
        let model = Model {
            tables: vec![Table {
                name: "t".to_string(),
                columns: vec![
                    Column {
                        name: "a".to_string(),
                        value_type: ValueType::Float,
                    },
                    Column {
                        name: "b".to_string(),
                        value_type: ValueType::Int,
                    },
                ],
                rows: vec![Row {
                    values: vec![Value::Null(ValueType::Float), Value::Int(1)],
                }],
            }],
        };
        let txt = crate::render_to_string(&model, 10).unwrap();
        let line = txt.lines().nth(2).unwrap();
        assert_eq!(line, "|          |1");
    }

    #[test]
    fn test_negative_width_disables_padding() {
        let model = persons_model();
        assert_eq!(
            crate::render_to_string(&model, -5).unwrap(),
            crate::render_to_string(&model, 0).unwrap()
        );
    }

    #[test]
    fn test_render_empty_table() {
        let model = Model {
            tables: vec![Table {
                name: "empty".to_string(),
                columns: vec![],
                rows: vec![],
            }],
        };
        assert_eq!(crate::render_to_string(&model, 10).unwrap(), "empty\n\n");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("joe"), "\"joe\"");
        assert_eq!(quote_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote_string("a\nb\tc"), "\"a\\nb\\tc\"");
        assert_eq!(quote_string("\u{8}\u{c}\r"), "\"\\b\\f\\r\"");
        assert_eq!(quote_string("\u{1}"), "\"\\u0001\"");
        assert_eq!(quote_string("\u{2602}"), "\"\u{2602}\"");
    }

    #[test]
    fn test_format_time() {
        let t = NaiveDate::from_ymd_opt(2001, 1, 2)
            .unwrap()
            .and_hms_milli_opt(9, 11, 12, 130)
            .unwrap()
            .and_utc();
        // trailing zeros of the fraction are trimmed
        assert_eq!(format_time(&t), "2001-01-02T09:11:12.13");
        let t = NaiveDate::from_ymd_opt(2001, 1, 2)
            .unwrap()
            .and_hms_opt(9, 11, 12)
            .unwrap()
            .and_utc();
        assert_eq!(format_time(&t), "2001-01-02T09:11:12");
    }
}
