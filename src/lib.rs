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

//! # Bosh Core Library
//!
//! Client library for a remote analytical database daemon. It provides two
//! pipelines that share one set of wire types:
//!
//! - a **bulk loader** that turns delimited text into batched INSERT
//!   statements and streams them as one long-lived HTTP request body, and
//! - an **interactive shell** that keeps a WebSocket session open, sends one
//!   statement at a time and prints single- or multi-page results.
//!
//! ## Module Overview
//!
//! - **errors**: `BoError` and the crate `Result`
//! - **config**: `BoConfig` and its builder, shared by both pipelines
//! - **schema**: table schema, column specs and CSV dialect
//! - **record**: `BoRecord`, one decoded line of input
//! - **ingest**: CSV decoding, date normalization and content sniffing
//! - **batch**: INSERT statement assembly
//! - **wire**: request and response frames
//! - **client**: HTTP endpoints (bulk pipe, script upload)
//! - **session**: the interactive WebSocket session
//! - **logging**: `log` backend and statement sink
//!
//! ## Quick Start
//!
//! ```rust
//! use bosh::{BoConfigBuilder, BoCsvDialect, BoInput, BoRequestStreamer, BoTableSchema};
//!
//! let config = BoConfigBuilder::new().host("db.local").batch_size(5_000).build();
//! let schema = BoTableSchema::new("sales", BoCsvDialect::default());
//! let report = BoRequestStreamer::new(config, schema)
//!     .load(&BoInput::from_arg("sales.csv")?)
//!     .await?;
//! println!("{} rows in {} frames", report.rows, report.frames);
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns `Result<T, BoError>`. Per-record problems are
//! logged and never surface as errors; `BoError::is_fatal` marks the errors
//! that end a pipeline.

pub mod batch;
pub mod client;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod logging;
pub mod record;
pub mod schema;
pub mod session;
pub mod wire;

pub use batch::{BoBatchAssembler, BoInsertStatement};
pub use client::{upload_script, BoLoadReport, BoRequestStreamer};
pub use config::{BoConfig, BoConfigBuilder};
pub use errors::{BoError, Result};
pub use ingest::{BoInput, BoRecordSource, BoSourceStats};
pub use logging::{BoLogConfig, BoLogConfigBuilder, BoLogger, BoStatementLog};
pub use record::BoRecord;
pub use schema::{BoColumnSpec, BoColumnType, BoCsvDialect, BoTableSchema};
pub use session::{BoAction, BoPrompt, BoSession, BoSessionOptions, BoTransport};
pub use wire::{BoPayload, BoRequestFrame, BoResponseFrame};
