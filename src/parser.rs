//! The TDAT parser.
//!
//! A deterministic finite-state machine over the lexer's token stream.
//! Each token is consumed exactly once; every error is reported with the
//! line/position of the token being processed and aborts parsing. There is
//! no recovery and no partial model: parsing fully succeeds or fails.
//!
//! ```text
//! [Start]
//!     Text / open new table                    ---> [AfterName]
//!     Separator / start new row (table open)   ---> [AfterDataSeparator]
//!     Newline                                  ---> [Start]
//!     End                                      ---> [End]
//! [AfterName]
//!     Newline                                  ---> [AfterNameLine]
//!     End                                      ---> [End]
//! [AfterNameLine]
//!     Text / open new table                    ---> [AfterName]
//!     Separator                                ---> [AfterHeaderSeparator]
//!     Newline                                  ---> [AfterNameLine]
//!     End                                      ---> [End]
//! [AfterHeaderSeparator]
//!     Text / append column                     ---> [AfterHeaderText]
//!     End                                      ---> [End]
//! [AfterHeaderText]
//!     Separator                                ---> [AfterHeaderSeparator]
//!     Newline                                  ---> [Start]
//!     End                                      ---> [End]
//! [AfterDataSeparator]
//!     Text / append typed value                ---> [AfterDataText]
//!     Separator / append typed null            ---> [AfterDataSeparator]
//!     Newline / append null, check row width   ---> [Start]
//!     End / check row width                    ---> [End]
//! [AfterDataText]
//!     Separator / check row width < columns    ---> [AfterDataSeparator]
//!     Newline / check row width == columns     ---> [Start]
//!     End / check row width == columns         ---> [End]
//! [End]
//! ```
//!
//! Duplicate table names parse fine; rejecting them is the validator's job.

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::model::{Column, Model, Row, Table, Value, ValueType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    AfterName,
    AfterNameLine,
    AfterHeaderSeparator,
    AfterHeaderText,
    AfterDataSeparator,
    AfterDataText,
    End,
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    state: State,
    tables: Vec<Table>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(lexer: Lexer<'a>) -> Self {
        Parser {
            lexer,
            state: State::Start,
            tables: Vec::new(),
        }
    }

    pub(crate) fn parse(mut self) -> Result<Model> {
        loop {
            let tok = self.lexer.next_token()?;
            match self.state {
                State::Start => self.for_start(&tok)?,
                State::AfterName => self.for_after_name(&tok)?,
                State::AfterNameLine => self.for_after_name_line(&tok)?,
                State::AfterHeaderSeparator => self.for_after_header_separator(&tok)?,
                State::AfterHeaderText => self.for_after_header_text(&tok)?,
                State::AfterDataSeparator => self.for_after_data_separator(&tok)?,
                State::AfterDataText => self.for_after_data_text(&tok)?,
                State::End => unreachable!("cannot parse beyond end"),
            }
            if self.state == State::End {
                return Ok(Model {
                    tables: self.tables,
                });
            }
        }
    }

    fn for_start(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(text) => {
                self.open_table(text);
                self.state = State::AfterName;
                Ok(())
            }
            TokenKind::Separator => {
                // continuing rows of the most recently opened table
                if self.tables.is_empty() {
                    return Err(Error::grammar(tok.line, tok.pos, "unexpected separator"));
                }
                self.current_table().rows.push(Row::default());
                self.state = State::AfterDataSeparator;
                Ok(())
            }
            TokenKind::Newline => Ok(()),
            TokenKind::End => {
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn for_after_name(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(_) => Err(Error::grammar(tok.line, tok.pos, "unexpected text")),
            TokenKind::Separator => {
                Err(Error::grammar(tok.line, tok.pos, "unexpected separator"))
            }
            TokenKind::Newline => {
                self.state = State::AfterNameLine;
                Ok(())
            }
            TokenKind::End => {
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn for_after_name_line(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(text) => {
                self.open_table(text);
                self.state = State::AfterName;
                Ok(())
            }
            TokenKind::Separator => {
                self.state = State::AfterHeaderSeparator;
                Ok(())
            }
            TokenKind::Newline => Ok(()),
            TokenKind::End => {
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn for_after_header_separator(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(text) => {
                let column = parse_column(text)
                    .map_err(|msg| Error::grammar(tok.line, tok.pos, msg))?;
                self.current_table().columns.push(column);
                self.state = State::AfterHeaderText;
                Ok(())
            }
            TokenKind::Separator => {
                Err(Error::grammar(tok.line, tok.pos, "unexpected separator"))
            }
            TokenKind::Newline => {
                Err(Error::grammar(tok.line, tok.pos, "unexpected end of line"))
            }
            TokenKind::End => {
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn for_after_header_text(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(_) => Err(Error::grammar(tok.line, tok.pos, "unexpected text")),
            TokenKind::Separator => {
                self.state = State::AfterHeaderSeparator;
                Ok(())
            }
            TokenKind::Newline => {
                self.state = State::Start;
                Ok(())
            }
            TokenKind::End => {
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn for_after_data_separator(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(text) => {
                let col_type = self.current_column_type(tok)?;
                let value = parse_value(col_type, text, tok)?;
                self.current_row().values.push(value);
                self.state = State::AfterDataText;
                Ok(())
            }
            TokenKind::Separator => {
                let col_type = self.current_column_type(tok)?;
                self.current_row().values.push(Value::Null(col_type));
                Ok(())
            }
            TokenKind::Newline => {
                let col_type = self.current_column_type(tok)?;
                self.current_row().values.push(Value::Null(col_type));
                self.check_row_width(tok)?;
                self.state = State::Start;
                Ok(())
            }
            TokenKind::End => {
                self.check_row_width(tok)?;
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn for_after_data_text(&mut self, tok: &Token) -> Result<()> {
        match &tok.kind {
            TokenKind::Text(_) => Err(Error::grammar(tok.line, tok.pos, "unexpected text")),
            TokenKind::Separator => {
                let table = self.current_table();
                let row_width = table.rows.last().map_or(0, |r| r.values.len());
                if row_width >= table.columns.len() {
                    return Err(Error::arity(tok.line, tok.pos, "too many data values"));
                }
                self.state = State::AfterDataSeparator;
                Ok(())
            }
            TokenKind::Newline => {
                self.check_row_width(tok)?;
                self.state = State::Start;
                Ok(())
            }
            TokenKind::End => {
                self.check_row_width(tok)?;
                self.state = State::End;
                Ok(())
            }
        }
    }

    fn open_table(&mut self, name: &str) {
        self.tables.push(Table {
            name: name.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
        });
    }

    /// The most recently opened table. The state machine only enters the
    /// header/data states with a table open.
    fn current_table(&mut self) -> &mut Table {
        self.tables.last_mut().expect("no table open")
    }

    fn current_row(&mut self) -> &mut Row {
        self.current_table().rows.last_mut().expect("no row open")
    }

    /// The declared type of the column at the current row fill index.
    /// Errors if the row is already full.
    fn current_column_type(&mut self, tok: &Token) -> Result<ValueType> {
        let table = self.current_table();
        let col_index = table.rows.last().map_or(0, |r| r.values.len());
        if col_index >= table.columns.len() {
            return Err(Error::arity(tok.line, tok.pos, "too many data values"));
        }
        Ok(table.columns[col_index].value_type)
    }

    fn check_row_width(&mut self, tok: &Token) -> Result<()> {
        let table = self.current_table();
        let row_width = table.rows.last().map_or(0, |r| r.values.len());
        let header_width = table.columns.len();
        if row_width > header_width {
            return Err(Error::arity(tok.line, tok.pos, "too many data values"));
        }
        if row_width < header_width {
            return Err(Error::arity(tok.line, tok.pos, "too few data values"));
        }
        Ok(())
    }
}

/// Parses a header cell of the form `name:code`. The second-to-last byte
/// must be `:` and the last byte one of the five type codes.
fn parse_column(text: &str) -> std::result::Result<Column, String> {
    let bytes = text.as_bytes();
    let n = bytes.len();
    if n < 3 || bytes[n - 2] != b':' {
        return Err("invalid column definition".to_string());
    }
    match ValueType::from_code(bytes[n - 1] as char) {
        Some(value_type) => Ok(Column {
            name: text[..n - 2].to_string(),
            value_type,
        }),
        None => Err("invalid column type".to_string()),
    }
}

/// Parses a data cell against the declared column type.
fn parse_value(col_type: ValueType, text: &str, tok: &Token) -> Result<Value> {
    match col_type {
        ValueType::Int => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| Error::value(tok.line, tok.pos, format!("cannot parse as int: {e}"))),
        ValueType::Float => text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| Error::value(tok.line, tok.pos, format!("cannot parse as float: {e}"))),
        ValueType::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(Error::value(
                    tok.line,
                    tok.pos,
                    format!("cannot parse as bool: invalid literal {text:?}"),
                ))
            }
        }
        ValueType::String => Ok(Value::String(text.to_string())),
        ValueType::Time => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|t| Value::Time(t.and_utc()))
            .map_err(|e| Error::value(tok.line, tok.pos, format!("cannot parse as time: {e}"))),
    }
}
