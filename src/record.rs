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

//! # Bosh Record Module
//!
//! This module provides the data structure for a single decoded input row.
//! A BoRecord is produced by the record source, normalized in place, and then
//! moved into the batch assembler. Nothing else holds on to it after that
//! handoff.
//!
//! ## Usage Example
//!
//! ```rust
//! use bosh::record::BoRecord;
//!
//! let mut record = BoRecord::new(1, vec!["42".to_string(), "2024/01/02".to_string()]);
//! record.fields_mut()[1] = "2024-01-02 00:00:00".to_string();
//! assert_eq!(record.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// One decoded row of delimited input.
///
/// Fields keep the order in which they appeared in the source. The width is
/// fixed per source when the dialect requests a field count; otherwise rows
/// may differ in width.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoRecord {
    /// 1-based input line the record starts on. Used to point log messages
    /// at the offending row.
    pub line: u64,

    /// Field values, in source order.
    pub fields: Vec<String>,
}

impl BoRecord {
    /// Constructs a record from its position and field values.
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        BoRecord { line, fields }
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Mutable access for in-place normalization.
    pub fn fields_mut(&mut self) -> &mut [String] {
        &mut self.fields
    }

    /// Iterates the field values in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Consumes the record, returning its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}
