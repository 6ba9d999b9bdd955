//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bosh.
//! The Bosh project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Batch Assembler
//!
//! Groups records into bulk INSERT statements:
//!
//! ```text
//! INSERT INTO sales VALUES ("1","a")("2","b")("3","c")
//! ```
//!
//! Every field is rendered as a double-quoted literal in the escape syntax the
//! daemon's literal parser reads: `\"` and `\\`, the C escapes
//! `\a \b \f \n \r \t \v`, `\xNN` for the remaining ASCII control bytes and
//! DEL, and `\uXXXX` / `\UXXXXXXXX` for non-printable code points (other
//! controls, non-ASCII spaces, format characters, private use and
//! noncharacters). Printable text, including non-ASCII letters and symbols,
//! is written raw. Unassigned code points outside those classes are also
//! written raw.
//!
//! ## Flush boundary
//!
//! The batch is checked after every append and flushed as soon as it holds
//! `batch_size` tuples. N records therefore produce `ceil(N / batch_size)`
//! statements: exactly `batch_size` records give one statement and nothing on
//! [`BoBatchAssembler::finish`], one more record gives a second statement with
//! a single tuple.

use crate::errors::{BoError, Result};
use crate::logging::BoStatementLog;
use crate::record::BoRecord;
use crate::wire::BoRequestFrame;

/// Escapes a value as a double-quoted statement literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x80 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push('"');
    out
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    let cp = c as u32;
    let format_char = matches!(
        cp,
        0xAD | 0x600..=0x605
            | 0x61C
            | 0x6DD
            | 0x70F
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x206F
            | 0xFEFF
            | 0xFFF9..=0xFFFB
            | 0xE0001
            | 0xE0020..=0xE007F
    );
    let private_or_nonchar = matches!(
        cp,
        0xE000..=0xF8FF | 0xF0000..=0x10FFFF | 0xFFFE | 0xFFFF
    );
    !(c.is_control() || c.is_whitespace() || format_char || private_or_nonchar)
}

/// `("v1","v2",...)` for one record.
pub fn render_tuple(record: &BoRecord) -> String {
    let quoted: Vec<String> = record.iter().map(quote).collect();
    format!("({})", quoted.join(","))
}

pub fn render_insert(table: &str, tuples: &[String]) -> String {
    format!("INSERT INTO {} VALUES {}", table, tuples.concat())
}

/// Accumulates records and emits one request frame per full batch.
pub struct BoBatchAssembler {
    table: String,
    batch_size: usize,
    workspace: Option<String>,
    tuples: Vec<String>,
    sink: BoStatementLog,
    frames: u64,
    rows: u64,
}

impl BoBatchAssembler {
    pub fn new(table: impl Into<String>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        BoBatchAssembler {
            table: table.into(),
            batch_size,
            workspace: None,
            tuples: Vec::with_capacity(batch_size),
            sink: BoStatementLog::noop(),
            frames: 0,
            rows: 0,
        }
    }

    pub fn with_workspace(mut self, workspace: Option<String>) -> Self {
        self.workspace = workspace;
        self
    }

    /// Every statement is handed to `sink` before its frame is emitted.
    pub fn with_sink(mut self, sink: BoStatementLog) -> Self {
        self.sink = sink;
        self
    }

    /// Appends a record; returns a frame when the batch is full.
    pub fn push(&mut self, record: &BoRecord) -> Option<BoRequestFrame> {
        self.tuples.push(render_tuple(record));
        if self.tuples.len() >= self.batch_size {
            Some(self.flush())
        } else {
            None
        }
    }

    /// Flushes the trailing partial batch, if any.
    pub fn finish(&mut self) -> Option<BoRequestFrame> {
        if self.tuples.is_empty() {
            None
        } else {
            Some(self.flush())
        }
    }

    /// Wraps an arbitrary statement (DDL, truncation) in a frame, logging it
    /// through the same sink as the inserts.
    pub fn statement(&mut self, stmt: String) -> BoRequestFrame {
        self.sink.log(&stmt);
        self.frames += 1;
        BoRequestFrame::new(stmt).with_workspace(self.workspace.as_deref())
    }

    /// Tuples waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.tuples.len()
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames
    }

    pub fn rows_emitted(&self) -> u64 {
        self.rows
    }

    fn flush(&mut self) -> BoRequestFrame {
        let stmt = render_insert(&self.table, &self.tuples);
        self.rows += self.tuples.len() as u64;
        self.tuples.clear();
        self.statement(stmt)
    }
}

/// An INSERT statement parsed back into its values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoInsertStatement {
    pub table: String,
    pub tuples: Vec<Vec<String>>,
}

impl BoInsertStatement {
    pub fn parse(stmt: &str) -> Result<Self> {
        let rest = stmt
            .strip_prefix("INSERT INTO ")
            .ok_or_else(|| malformed("missing INSERT INTO"))?;
        let (table, values) = rest
            .split_once(" VALUES ")
            .ok_or_else(|| malformed("missing VALUES"))?;

        let mut tuples = Vec::new();
        let mut scanner = Scanner::new(values);
        while scanner.skip_ws() {
            scanner.expect(b'(')?;
            let mut tuple = Vec::new();
            if !scanner.eat(b')') {
                loop {
                    tuple.push(scanner.literal()?);
                    if scanner.eat(b')') {
                        break;
                    }
                    scanner.expect(b',')?;
                }
            }
            tuples.push(tuple);
        }

        Ok(BoInsertStatement {
            table: table.to_string(),
            tuples,
        })
    }
}

fn malformed(message: impl std::fmt::Display) -> BoError {
    BoError::Serde(format!("malformed insert statement: {}", message))
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner { text, pos: 0 }
    }

    /// Skips whitespace; false at end of input.
    fn skip_ws(&mut self) -> bool {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        self.pos < bytes.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.text.as_bytes().get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(malformed(format!(
                "expected '{}' at offset {}",
                byte as char, self.pos
            )))
        }
    }

    fn literal(&mut self) -> Result<String> {
        let text = self.text;
        self.expect(b'"')?;
        let mut out = String::new();
        let mut chars = text[self.pos..].char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += offset + 1;
                    return Ok(out);
                }
                '\\' => {
                    let (_, esc) = chars
                        .next()
                        .ok_or_else(|| malformed("unterminated escape"))?;
                    let unescaped = match esc {
                        'a' => '\x07',
                        'b' => '\x08',
                        'f' => '\x0c',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'v' => '\x0b',
                        '\\' | '"' => esc,
                        'x' => hex_escape(&mut chars, 2)
                            .filter(char::is_ascii)
                            .ok_or_else(|| malformed("bad \\x escape"))?,
                        'u' => hex_escape(&mut chars, 4)
                            .ok_or_else(|| malformed("bad \\u escape"))?,
                        'U' => hex_escape(&mut chars, 8)
                            .ok_or_else(|| malformed("bad \\U escape"))?,
                        other => return Err(malformed(format!("unknown escape \\{}", other))),
                    };
                    out.push(unescaped);
                }
                c => out.push(c),
            }
        }
        Err(malformed("unterminated literal"))
    }
}

fn hex_escape(chars: &mut std::str::CharIndices<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        value = value * 16 + c.to_digit(16)?;
    }
    char::from_u32(value)
}
