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

//! Bulk load over `POST /cmd/pipe`.
//!
//! Records flow from the source through the batch assembler into a bounded
//! in-process pipe whose read half is the HTTP request body:
//!
//! ```text
//! source (blocking) ─records─▶ assembler task ─frames─▶ duplex pipe ─▶ POST body
//! ```
//!
//! Each stage parks when the next one is full, so memory stays bounded by the
//! batch size and the pipe capacity no matter how large the input is.

use std::io::Read;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client};
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio_util::io::ReaderStream;

use crate::batch::BoBatchAssembler;
use crate::config::BoConfig;
use crate::errors::{BoError, Result};
use crate::ingest::{BoInput, BoRecordSource, BoRecordStream, BoSourceStats};
use crate::logging::BoStatementLog;
use crate::schema::BoTableSchema;
use crate::wire::BoRequestFrame;

pub const PIPE_PATH: &str = "cmd/pipe";

/// Outcome of a finished bulk load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoLoadReport {
    /// Request frames written, leading DDL included.
    pub frames: u64,
    /// Tuples carried by INSERT frames.
    pub rows: u64,
    /// Bytes written into the request body.
    pub bytes: u64,
    /// HTTP status of the pipe request; `None` on a dry run.
    pub status: Option<u16>,
    pub source: BoSourceStats,
}

/// What the assembler task managed to write before the pipe closed.
struct BoWriteSummary {
    frames: u64,
    rows: u64,
    bytes: u64,
    source: BoSourceStats,
    error: Option<BoError>,
}

pub struct BoRequestStreamer {
    config: BoConfig,
    schema: Arc<BoTableSchema>,
    create: bool,
    truncate: bool,
    sink: BoStatementLog,
}

impl BoRequestStreamer {
    /// Statements are echoed through the log when `config.debug` is set.
    pub fn new(config: BoConfig, schema: BoTableSchema) -> Self {
        let sink = BoStatementLog::new(config.debug);
        BoRequestStreamer {
            config,
            schema: Arc::new(schema),
            create: false,
            truncate: false,
            sink,
        }
    }

    /// Sends `CREATE TABLE` for the schema before any data.
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Empties the table before any data.
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn with_sink(mut self, sink: BoStatementLog) -> Self {
        self.sink = sink;
        self
    }

    pub fn schema(&self) -> &BoTableSchema {
        &self.schema
    }

    /// Loads from a file or stdin. Nothing is opened or sent when the
    /// configuration or schema is invalid.
    pub async fn load(&self, input: &BoInput) -> Result<BoLoadReport> {
        self.validate()?;
        let records = self.source().open(input)?;
        self.stream(records).await
    }

    /// Loads from an arbitrary reader.
    pub async fn load_reader<R: Read + Send + 'static>(&self, input: R) -> Result<BoLoadReport> {
        self.validate()?;
        let records = self.source().spawn(input)?;
        self.stream(records).await
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.schema.validate()?;
        self.schema.dialect.validate()
    }

    fn source(&self) -> BoRecordSource {
        BoRecordSource::new(Arc::clone(&self.schema), self.config.batch_size)
    }

    fn leading_statements(&self) -> Vec<String> {
        let mut stmts = Vec::new();
        if self.create {
            stmts.push(self.schema.create_stmt());
        }
        if self.truncate {
            stmts.push(self.schema.trim_stmt());
        }
        stmts
    }

    async fn stream(&self, records: BoRecordStream) -> Result<BoLoadReport> {
        let (writer, reader) = tokio::io::duplex(self.config.pipe_capacity);
        let assembler = BoBatchAssembler::new(self.schema.name.clone(), self.config.batch_size)
            .with_workspace(self.config.workspace.clone())
            .with_sink(self.sink.clone());
        let producer = tokio::spawn(write_frames(
            records,
            assembler,
            self.leading_statements(),
            writer,
        ));

        let transport = if self.config.debug {
            drain_locally(reader).await.map(|_| None)
        } else {
            post_pipe(&self.config, reader).await.map(Some)
        };

        let summary = producer
            .await
            .map_err(|e| BoError::internal(format!("assembler task failed: {}", e)))?;
        let status = transport?;
        if let Some(err) = summary.error {
            return Err(BoError::fatal("pipe", err.to_string()));
        }

        let report = BoLoadReport {
            frames: summary.frames,
            rows: summary.rows,
            bytes: summary.bytes,
            status,
            source: summary.source,
        };
        log::info!(
            "loaded {} rows into {} in {} frames ({} bytes)",
            report.rows,
            self.schema.name,
            report.frames,
            report.bytes
        );
        Ok(report)
    }
}

async fn write_frame(pipe: &mut DuplexStream, frame: &BoRequestFrame) -> Result<u64> {
    let line = frame.encode_line()?;
    pipe.write_all(&line).await?;
    Ok(line.len() as u64)
}

/// Drives the assembler and closes the pipe when input ends or the reader
/// goes away.
async fn write_frames(
    mut records: BoRecordStream,
    mut assembler: BoBatchAssembler,
    leading: Vec<String>,
    mut pipe: DuplexStream,
) -> BoWriteSummary {
    let mut bytes = 0;
    let outcome = async {
        for stmt in leading {
            let frame = assembler.statement(stmt);
            bytes += write_frame(&mut pipe, &frame).await?;
        }
        while let Some(record) = records.recv().await {
            if let Some(frame) = assembler.push(&record) {
                bytes += write_frame(&mut pipe, &frame).await?;
            }
        }
        if let Some(frame) = assembler.finish() {
            bytes += write_frame(&mut pipe, &frame).await?;
        }
        pipe.shutdown().await?;
        Ok::<(), BoError>(())
    }
    .await;

    if let Err(e) = &outcome {
        log::warn!("request pipe closed early: {}", e);
    }
    drop(pipe);
    let source = records.finish().await;

    BoWriteSummary {
        frames: assembler.frames_emitted(),
        rows: assembler.rows_emitted(),
        bytes,
        source,
        error: outcome.err(),
    }
}

async fn drain_locally(mut reader: DuplexStream) -> Result<u64> {
    let drained = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    log::debug!("dry run drained {} bytes", drained);
    Ok(drained)
}

async fn post_pipe(config: &BoConfig, reader: DuplexStream) -> Result<u16> {
    let url = config.http_url(PIPE_PATH);
    let body = Body::wrap_stream(ReaderStream::new(reader));
    let mut response = Client::new()
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| BoError::fatal("pipe", format!("POST {}: {}", url, e)))?;

    let status = response.status();
    let mut excerpt = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| BoError::fatal("pipe", format!("reading response: {}", e)))?
    {
        if !status.is_success() && excerpt.len() < 512 {
            excerpt.extend_from_slice(&chunk);
        }
    }

    if !status.is_success() {
        return Err(BoError::Http {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&excerpt).trim().to_string(),
        });
    }
    Ok(status.as_u16())
}
