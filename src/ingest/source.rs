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

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::{BoError, Result};
use crate::ingest::datefmt::BoDateNormalizer;
use crate::ingest::scan::BoFieldScanner;
use crate::record::BoRecord;
use crate::schema::BoTableSchema;

/// Where the delimited text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoInput {
    Stdin,
    Path(PathBuf),
}

impl BoInput {
    /// `-` selects standard input, anything else is a file path.
    pub fn from_arg(arg: &str) -> Result<Self> {
        match arg {
            "" => Err(BoError::config("no file to load")),
            "-" => Ok(BoInput::Stdin),
            path => Ok(BoInput::Path(PathBuf::from(path))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoSourceStats {
    pub records: u64,
    pub skipped: u64,
    pub malformed: u64,
    pub date_failures: u64,
}

/// Synchronous record decoder over any byte stream.
///
/// Yields every well-formed record after the configured leading records are
/// skipped. Malformed records are logged and dropped; an I/O error ends the
/// sequence. With strict quoting, a record holding a bare quote or text after
/// a closing quote is malformed.
pub struct BoRecordReader<R: Read> {
    reader: csv::Reader<BoFieldScanner<R>>,
    normalizer: BoDateNormalizer,
    fields: i64,
    expected_width: Option<usize>,
    skip_remaining: u64,
    row: StringRecord,
    position: u64,
    stats: BoSourceStats,
    done: bool,
}

impl<R: Read> BoRecordReader<R> {
    pub fn new(input: R, schema: &BoTableSchema) -> Result<Self> {
        let dialect = &schema.dialect;
        dialect.validate()?;
        let separator = dialect.separator_byte()?;
        let comment = dialect.comment_byte()?;
        let scanner = BoFieldScanner::new(input, separator, comment)
            .with_trim_leading(dialect.trim_leading_space)
            .with_strict_quotes(!dialect.lazy_quotes);

        let reader = ReaderBuilder::new()
            .delimiter(separator)
            .comment(comment)
            .has_headers(false)
            .flexible(true)
            .quoting(true)
            .double_quote(true)
            .from_reader(scanner);

        Ok(BoRecordReader {
            reader,
            normalizer: BoDateNormalizer::from_columns(&schema.columns),
            fields: dialect.fields,
            expected_width: usize::try_from(dialect.fields).ok().filter(|w| *w > 0),
            skip_remaining: dialect.skip_lines,
            row: StringRecord::new(),
            position: 0,
            stats: BoSourceStats::default(),
            done: false,
        })
    }

    pub fn stats(&self) -> &BoSourceStats {
        &self.stats
    }

    fn skip_leading(&mut self) {
        while self.skip_remaining > 0 && !self.done {
            self.skip_remaining -= 1;
            match self.reader.read_record(&mut self.row) {
                Ok(false) => {
                    self.done = true;
                    return;
                }
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    log::error!("input read failed while skipping: {}", e);
                    self.done = true;
                    return;
                }
                Ok(true) | Err(_) => {}
            }
            self.position += 1;
            self.reader.get_mut().take_violation(self.position);
            self.stats.skipped += 1;
        }
    }

    fn line(&self) -> u64 {
        self.row
            .position()
            .map(|p| p.line())
            .unwrap_or(self.position)
    }

    fn width_ok(&mut self, width: usize) -> bool {
        match self.expected_width {
            Some(expected) => width == expected,
            None if self.fields == 0 => {
                self.expected_width = Some(width);
                true
            }
            None => true,
        }
    }
}

impl<R: Read> Iterator for BoRecordReader<R> {
    type Item = BoRecord;

    fn next(&mut self) -> Option<BoRecord> {
        self.skip_leading();
        while !self.done {
            match self.reader.read_record(&mut self.row) {
                Ok(false) => self.done = true,
                Ok(true) => {
                    self.position += 1;
                    let line = self.line();
                    if self.reader.get_mut().take_violation(self.position) {
                        self.stats.malformed += 1;
                        let err = BoError::record(line, "bare or unescaped quote in field");
                        log::warn!("skipping {}", err);
                        continue;
                    }
                    if !self.width_ok(self.row.len()) {
                        self.stats.malformed += 1;
                        let err = BoError::record(
                            line,
                            format!(
                                "expected {:?} fields, found {}",
                                self.expected_width,
                                self.row.len()
                            ),
                        );
                        log::warn!("skipping {}", err);
                        continue;
                    }
                    let fields = self.row.iter().map(str::to_string).collect();
                    let mut record = BoRecord::new(line, fields);
                    if !self.normalizer.is_identity() {
                        self.stats.date_failures += self.normalizer.normalize(&mut record) as u64;
                    }
                    self.stats.records += 1;
                    return Some(record);
                }
                Err(e) => {
                    if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                        log::error!("input read failed: {}", e);
                        self.done = true;
                    } else {
                        self.position += 1;
                        self.reader.get_mut().take_violation(self.position);
                        self.stats.malformed += 1;
                        log::warn!("skipping malformed record: {}", e);
                    }
                }
            }
        }
        None
    }
}

/// Asynchronous producer of records over a bounded channel.
///
/// Decoding runs on a blocking task and parks whenever the channel is full,
/// so a slow consumer throttles reads from disk.
pub struct BoRecordSource {
    schema: Arc<BoTableSchema>,
    capacity: usize,
}

impl BoRecordSource {
    pub fn new(schema: Arc<BoTableSchema>, capacity: usize) -> Self {
        BoRecordSource {
            schema,
            capacity: capacity.max(1),
        }
    }

    /// Opens the input and starts producing. A missing file is a
    /// configuration error and nothing is spawned.
    pub fn open(&self, input: &BoInput) -> Result<BoRecordStream> {
        match input {
            BoInput::Stdin => self.spawn(std::io::stdin()),
            BoInput::Path(path) => {
                let file = File::open(path).map_err(|e| {
                    BoError::config(format!("cannot open {}: {}", path.display(), e))
                })?;
                self.spawn(file)
            }
        }
    }

    pub fn spawn<R: Read + Send + 'static>(&self, input: R) -> Result<BoRecordStream> {
        let mut reader = BoRecordReader::new(input, &self.schema)?;
        let (tx, rx) = mpsc::channel(self.capacity);
        let table = self.schema.name.clone();

        let handle = tokio::task::spawn_blocking(move || {
            for record in reader.by_ref() {
                if tx.blocking_send(record).is_err() {
                    log::debug!("record consumer for {} went away", table);
                    break;
                }
            }
            let stats = reader.stats().clone();
            log::info!(
                "source for {}: {} records, {} skipped, {} malformed, {} date failures",
                table,
                stats.records,
                stats.skipped,
                stats.malformed,
                stats.date_failures
            );
            stats
        });

        Ok(BoRecordStream { rx, handle })
    }
}

/// Receiving end of a running record source.
pub struct BoRecordStream {
    rx: mpsc::Receiver<BoRecord>,
    handle: JoinHandle<BoSourceStats>,
}

impl BoRecordStream {
    /// Next record, or `None` once the source is exhausted.
    pub async fn recv(&mut self) -> Option<BoRecord> {
        self.rx.recv().await
    }

    /// Waits for the producer and returns its counters. A producer that
    /// panicked reports empty stats instead of propagating the panic.
    pub async fn finish(self) -> BoSourceStats {
        drop(self.rx);
        match self.handle.await {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("record source stopped abnormally: {}", e);
                BoSourceStats::default()
            }
        }
    }
}
