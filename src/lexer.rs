//! The TDAT lexer.
//!
//! Turns a character stream into [`Token`]s: text, separator (`|`), newline
//! and end-of-input. The lexer keeps a one-character lookahead and tracks
//! 1-based line/position counters; every error it produces points at the
//! offending character.
//!
//! Once the input is exhausted, [`Lexer::next_token`] keeps returning the
//! end token at the same position; end-of-input is never an error.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Text(String),
    Separator,
    Newline,
    End,
}

/// A lexeme with the position of its first character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub line: usize,
    pub pos: usize,
    pub kind: TokenKind,
}

pub(crate) struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    /// Current lookahead character; `None` after the input is exhausted.
    cur: Option<char>,
    /// Error detected while reading ahead, reported on the next use.
    pending: Option<Error>,
    line: usize,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            chars: input.chars(),
            cur: None,
            pending: None,
            line: 1,
            pos: 0,
            done: false,
        };
        lexer.read();
        lexer
    }

    /// Scans and returns the next token.
    pub(crate) fn next_token(&mut self) -> Result<Token> {
        // eat whitespace (anything <= space except newline)
        loop {
            if let Some(err) = &self.pending {
                return Err(err.clone());
            }
            match self.cur {
                None | Some('\n') => break,
                Some(c) if c > ' ' => break,
                Some(_) => self.read(),
            }
        }
        let (line, pos) = (self.line, self.pos);
        match self.cur {
            None => Ok(Token {
                line,
                pos,
                kind: TokenKind::End,
            }),
            Some('|') => {
                self.read();
                Ok(Token {
                    line,
                    pos,
                    kind: TokenKind::Separator,
                })
            }
            Some('\n') => {
                self.read();
                Ok(Token {
                    line,
                    pos,
                    kind: TokenKind::Newline,
                })
            }
            Some('"') => {
                let text = self.read_quoted_text()?;
                Ok(Token {
                    line,
                    pos,
                    kind: TokenKind::Text(text),
                })
            }
            Some(_) => {
                let text = self.read_text()?;
                Ok(Token {
                    line,
                    pos,
                    kind: TokenKind::Text(text),
                })
            }
        }
    }

    /// Collects characters up to (not including) the next separator, newline
    /// or end-of-input, trimming trailing whitespace.
    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            if let Some(err) = &self.pending {
                return Err(err.clone());
            }
            match self.cur {
                None | Some('|') | Some('\n') => return Ok(text.trim_end().to_string()),
                Some(c) => {
                    text.push(c);
                    self.read();
                }
            }
        }
    }

    /// Collects characters up to the first unescaped closing quote.
    /// A raw newline or end-of-input before the closing quote is fatal.
    fn read_quoted_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            self.read();
            if let Some(err) = &self.pending {
                return Err(err.clone());
            }
            match self.cur {
                None | Some('\n') => {
                    return Err(Error::lex(self.line, self.pos, "unterminated string"));
                }
                Some('\\') => {
                    let c = self.read_escape_sequence()?;
                    text.push(c);
                }
                Some('"') => {
                    self.read();
                    return Ok(text.trim_end().to_string());
                }
                Some(c) => text.push(c),
            }
        }
    }

    fn read_escape_sequence(&mut self) -> Result<char> {
        self.read();
        if let Some(err) = &self.pending {
            return Err(err.clone());
        }
        match self.cur {
            None => Err(Error::lex(self.line, self.pos, "unterminated escape sequence")),
            Some('b') => Ok('\u{0008}'),
            Some('t') => Ok('\t'),
            Some('n') => Ok('\n'),
            Some('f') => Ok('\u{000C}'),
            Some('r') => Ok('\r'),
            Some('u') => self.read_unicode_escape_sequence(),
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some(_) => Err(Error::lex(self.line, self.pos, "illegal escape sequence")),
        }
    }

    /// Decodes the 4 hex digits of a `\uXXXX` escape.
    fn read_unicode_escape_sequence(&mut self) -> Result<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            self.read();
            if let Some(err) = &self.pending {
                return Err(err.clone());
            }
            match self.cur {
                None => {
                    return Err(Error::lex(
                        self.line,
                        self.pos,
                        "unterminated escape sequence",
                    ));
                }
                Some(c) => hex.push(c),
            }
        }
        let code_point = u32::from_str_radix(&hex, 16)
            .map_err(|_| Error::lex(self.line, self.pos, "illegal escape sequence"))?;
        char::from_u32(code_point)
            .ok_or_else(|| Error::lex(self.line, self.pos, "illegal escape sequence"))
    }

    /// Advances the lookahead by one character, updating line/pos counters.
    /// Control characters other than tab, newline and carriage return are
    /// invalid anywhere in the input; the error is recorded here and
    /// surfaced by the next caller that inspects the lookahead.
    fn read(&mut self) {
        if self.done || self.pending.is_some() {
            return;
        }
        if self.cur == Some('\n') {
            self.line += 1;
            self.pos = 1;
        } else {
            self.pos += 1;
        }
        match self.chars.next() {
            None => {
                self.cur = None;
                self.done = true;
            }
            Some(c) => {
                if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' {
                    self.pending = Some(Error::lex(
                        self.line,
                        self.pos,
                        format!("invalid char {:#x}", c as u32),
                    ));
                }
                self.cur = Some(c);
            }
        }
    }
}
