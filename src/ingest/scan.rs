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

//! Byte-level pre-pass run in front of the CSV decoder.
//!
//! The decoder only recognizes an opening quote as the very first byte of a
//! field, so leading blanks have to go before it sees the field:
//! `1, "x,y"` must decode as `["1", "x,y"]`. The scanner tracks the same
//! field and quote states as the decoder, drops blanks at the start of every
//! field when trimming is on, and records which records break strict quoting
//! rules so the reader can reject them.
//!
//! Records are numbered in the order the decoder will yield them (blank and
//! comment lines are not records), starting at 1.

use std::collections::BTreeSet;
use std::io::{self, Read};

const SCRATCH_SIZE: usize = 8 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    LineStart,
    Comment,
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

pub struct BoFieldScanner<R: Read> {
    inner: R,
    separator: u8,
    comment: Option<u8>,
    trim_leading: bool,
    strict_quotes: bool,
    state: State,
    records: u64,
    violations: BTreeSet<u64>,
    scratch: Vec<u8>,
    eof: bool,
}

impl<R: Read> BoFieldScanner<R> {
    pub fn new(inner: R, separator: u8, comment: Option<u8>) -> Self {
        BoFieldScanner {
            inner,
            separator,
            comment,
            trim_leading: false,
            strict_quotes: false,
            state: State::LineStart,
            records: 0,
            violations: BTreeSet::new(),
            scratch: vec![0; SCRATCH_SIZE],
            eof: false,
        }
    }

    pub fn with_trim_leading(mut self, trim: bool) -> Self {
        self.trim_leading = trim;
        self
    }

    pub fn with_strict_quotes(mut self, strict: bool) -> Self {
        self.strict_quotes = strict;
        self
    }

    /// Whether record `ordinal` broke strict quoting. Forgets every record up
    /// to and including `ordinal`.
    pub fn take_violation(&mut self, ordinal: u64) -> bool {
        let rest = self.violations.split_off(&(ordinal + 1));
        let hit = self.violations.contains(&ordinal);
        self.violations = rest;
        hit
    }

    fn violation(&mut self) {
        if self.strict_quotes {
            self.violations.insert(self.records);
        }
    }

    fn is_blank(b: u8) -> bool {
        b == b' ' || b == b'\t'
    }

    /// Advances the state machine by one byte; false drops the byte.
    fn step(&mut self, b: u8) -> bool {
        let newline = b == b'\n' || b == b'\r';
        match self.state {
            State::LineStart => {
                if newline {
                    return true;
                }
                if self.trim_leading && Self::is_blank(b) {
                    return false;
                }
                if Some(b) == self.comment {
                    self.state = State::Comment;
                    return true;
                }
                self.records += 1;
                self.field_start(b)
            }
            State::Comment => {
                if newline {
                    self.state = State::LineStart;
                }
                true
            }
            State::FieldStart => self.field_start(b),
            State::Unquoted => {
                if b == self.separator {
                    self.state = State::FieldStart;
                } else if newline {
                    self.state = State::LineStart;
                } else if b == b'"' {
                    self.violation();
                }
                true
            }
            State::Quoted => {
                if b == b'"' {
                    self.state = State::QuoteInQuoted;
                }
                true
            }
            State::QuoteInQuoted => {
                if b == b'"' {
                    self.state = State::Quoted;
                } else if b == self.separator {
                    self.state = State::FieldStart;
                } else if newline {
                    self.state = State::LineStart;
                } else {
                    self.violation();
                    self.state = State::Unquoted;
                }
                true
            }
        }
    }

    fn field_start(&mut self, b: u8) -> bool {
        if self.trim_leading && Self::is_blank(b) {
            self.state = State::FieldStart;
            return false;
        }
        self.state = if b == b'"' {
            State::Quoted
        } else if b == self.separator {
            State::FieldStart
        } else if b == b'\n' || b == b'\r' {
            State::LineStart
        } else {
            State::Unquoted
        };
        true
    }

    fn finish(&mut self) {
        if self.state == State::Quoted {
            self.violation();
        }
        self.eof = true;
    }
}

impl<R: Read> Read for BoFieldScanner<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        while !out.is_empty() && !self.eof {
            let want = out.len().min(self.scratch.len());
            let n = self.inner.read(&mut self.scratch[..want])?;
            if n == 0 {
                self.finish();
                break;
            }
            let mut written = 0;
            for i in 0..n {
                let b = self.scratch[i];
                if self.step(b) {
                    out[written] = b;
                    written += 1;
                }
            }
            if written > 0 {
                return Ok(written);
            }
        }
        Ok(0)
    }
}
