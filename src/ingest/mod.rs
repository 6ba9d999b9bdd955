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

//! # Data Ingestion Module
//!
//! This module turns delimited text into records for the bulk loader.
//!
//! ## Module Components
//!
//! - **Source** ([source.rs](source/index.html)): CSV decoding with dialect
//!   handling, producing records on a bounded channel
//! - **Field scanner** ([scan.rs](scan/index.html)): leading-blank trimming
//!   and strict quote checks ahead of the decoder
//! - **Date normalization** ([datefmt.rs](datefmt/index.html)): per-column
//!   rewriting of dates into the canonical layout
//! - **Format detection** ([format.rs](format/index.html)): content-type sniff
//!   for script uploads
//!
//! ## Usage Patterns
//!
//! ```rust
//! use std::sync::Arc;
//! use bosh::ingest::{BoInput, BoRecordSource};
//!
//! let source = BoRecordSource::new(Arc::new(schema), 10_000);
//! let mut stream = source.open(&BoInput::from_arg("sales.csv")?)?;
//! while let Some(record) = stream.recv().await {
//!     // hand the record to the batch assembler
//! }
//! let stats = stream.finish().await;
//! ```

pub mod datefmt;
pub mod format;
pub mod scan;
pub mod source;

pub use datefmt::{BoDateNormalizer, CANONICAL_DATE_FORMAT};
pub use format::{BoContentType, BoFormatDetector};
pub use scan::BoFieldScanner;
pub use source::{BoInput, BoRecordReader, BoRecordSource, BoRecordStream, BoSourceStats};
