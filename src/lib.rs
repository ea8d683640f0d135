//! Reading, writing, building and converting TDAT, a line-oriented text
//! format for typed tabular data.
//!
//! A TDAT document holds zero or more named tables. Each table starts
//! with a name line, followed by a header line that declares columns as
//! `|name:type` cells, followed by data lines of `|value` cells:
//!
//! ```text
//! persons
//! |id:i |name:s     |size:f |member:b |birth:t
//! |1    |"Joe"      |1.83   |true     |2001-01-02T09:11:12
//! |2    |"Mia"      |1.69   |false    |
//! ```
//!
//! Column types are `i` (64-bit integer), `f` (64-bit float), `b`
//! (boolean), `s` (string) and `t` (UTC timestamp). An empty cell is a
//! typed null. Strings may be unquoted, or double-quoted with
//! JSON-style escapes when they contain pipes, quotes or leading/
//! trailing whitespace.
//!
//! # Reading
//!
//! [`parse_str`] turns TDAT text into a [`Model`], a plain tree of
//! [`Table`], [`Column`] and [`Row`] values. Parsing checks syntax and
//! cell types; structural rules (unique names, row widths matching the
//! header) are checked separately by [`validate_model`], so partially
//! irregular data can still be inspected:
//!
//! ```rust
//! use tdat::{parse_str, validate_model, Value};
//!
//! let model = parse_str("persons\n|id:i|name:s\n|1|\"Joe\"\n")?;
//! validate_model(&model)?;
//! assert_eq!(model.tables[0].rows[0].values[0], Value::Int(1));
//! # Ok::<(), tdat::Error>(())
//! ```
//!
//! All parse errors carry the 1-based line and character position of
//! the offending input and display as `line L, pos P: <message>`.
//!
//! # Writing
//!
//! [`render_to_string`] serializes a model back to TDAT text, padding
//! columns to a minimum width for readability (pass `0` to disable):
//!
//! ```rust
//! use tdat::Builder;
//!
//! let mut builder = Builder::new();
//! let table = builder.add_table("persons");
//! table.add_int_column("id").add_string_column("name");
//! table.add_row().add_int(Some(1)).add_string(Some("Joe"));
//! let model = builder.build()?;
//!
//! let text = tdat::render_to_string(&model, 0)?;
//! assert_eq!(text, "persons\n|id:i|name:s\n|1|\"Joe\"\n\n");
//! # Ok::<(), tdat::Error>(())
//! ```
//!
//! # Converting
//!
//! [`to_json_string`] and [`to_csv_string`] convert a validated model
//! to JSON (an object of table-name to row-object arrays) and to
//! semicolon-separated CSV.

mod builder;
mod error;
mod export;
mod lexer;
mod model;
mod parser;
mod render;
mod validate;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use builder::{Builder, RowBuilder, TableBuilder};
pub use error::{Error, Result};
pub use export::{
    to_csv_string, to_csv_writer, to_json_string, to_json_string_pretty, to_json_writer,
    to_json_writer_pretty,
};
pub use model::{Column, Model, Row, Table, Value, ValueType};
pub use validate::{validate_model, validate_name, validate_table};

/// Parses TDAT text into a [`Model`].
///
/// Syntax and cell types are checked here; structural rules are not,
/// see [`validate_model`].
pub fn parse_str(input: &str) -> Result<Model> {
    parser::Parser::new(lexer::Lexer::new(input)).parse()
}

/// Reads all TDAT text from a reader and parses it.
pub fn parse_reader<R: Read>(reader: R) -> Result<Model> {
    let mut input = String::new();
    BufReader::new(reader).read_to_string(&mut input)?;
    parse_str(&input)
}

/// Reads and parses a TDAT file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Model> {
    parse_reader(File::open(path)?)
}

/// Renders a model as TDAT text.
///
/// A positive `col_width` pads each cell but the last on a line to
/// that minimum width; zero or negative disables padding.
pub fn render_to_string(model: &Model, col_width: i32) -> Result<String> {
    let mut buf = Vec::new();
    render::render_model(model, col_width, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::io(e.to_string()))
}

/// Renders a model as TDAT text to a writer.
pub fn render_to_writer<W: Write>(model: &Model, col_width: i32, writer: W) -> Result<()> {
    render::render_model(model, col_width, writer)
}

/// Renders a model as TDAT text to a file, replacing existing content.
pub fn render_to_file(model: &Model, col_width: i32, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    render::render_model(model, col_width, &mut writer)?;
    writer.flush()?;
    Ok(())
}
