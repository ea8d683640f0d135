//! Error types for TDAT parsing, validation, rendering and export.
//!
//! All fatal parse errors carry the 1-based line and position of the
//! offending character or token and display uniformly as
//! `line L, pos P: <message>`. Parsing either fully succeeds or fails with
//! a single error; no partial model is returned.
//!
//! ## Error Categories
//!
//! - **Lex**: malformed characters, unterminated strings/escapes
//! - **Grammar**: a token arriving in the wrong parser state
//! - **Arity**: a row with too many/few values for its table's columns
//! - **Value**: a cell that fails to parse as the column's declared type
//! - **Validation**: a structural rule violated on an already-shaped model
//!
//! ```rust
//! use tdat::parse_str;
//!
//! let err = parse_str("t\n|a:s\n|\"x\n").unwrap_err();
//! assert_eq!(err.to_string(), "line 3, pos 4: unterminated string");
//! ```

use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing.
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed input character or string at the lexer level.
    #[error("line {line}, pos {pos}: {msg}")]
    Lex { line: usize, pos: usize, msg: String },

    /// A token that the grammar does not allow in the current state.
    #[error("line {line}, pos {pos}: {msg}")]
    Grammar { line: usize, pos: usize, msg: String },

    /// A row whose value count cannot match its table's column count.
    #[error("line {line}, pos {pos}: {msg}")]
    Arity { line: usize, pos: usize, msg: String },

    /// A data cell that fails to parse as the column's declared type.
    #[error("line {line}, pos {pos}: {msg}")]
    Value { line: usize, pos: usize, msg: String },

    /// A structural rule violated on an already-parsed model.
    #[error("{0}")]
    Validation(String),

    /// CSV export failure.
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON export failure.
    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Creates a lexer error at the given position.
    pub fn lex(line: usize, pos: usize, msg: impl Into<String>) -> Self {
        Error::Lex {
            line,
            pos,
            msg: msg.into(),
        }
    }

    /// Creates a grammar error at the given position.
    pub fn grammar(line: usize, pos: usize, msg: impl Into<String>) -> Self {
        Error::Grammar {
            line,
            pos,
            msg: msg.into(),
        }
    }

    /// Creates a row-arity error at the given position.
    pub fn arity(line: usize, pos: usize, msg: impl Into<String>) -> Self {
        Error::Arity {
            line,
            pos,
            msg: msg.into(),
        }
    }

    /// Creates a value-conversion error at the given position.
    pub fn value(line: usize, pos: usize, msg: impl Into<String>) -> Self {
        Error::Value {
            line,
            pos,
            msg: msg.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// Returns the `(line, pos)` of a positional error, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lex { line, pos, .. }
            | Error::Grammar { line, pos, .. }
            | Error::Arity { line, pos, .. }
            | Error::Value { line, pos, .. } => Some((*line, *pos)),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
