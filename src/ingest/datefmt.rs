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

//! Per-column value normalization applied to every record before batching.
//!
//! Date columns declare the strftime pattern their source uses; values are
//! rewritten to [`CANONICAL_DATE_FORMAT`]. A value that does not match its
//! pattern is left untouched and the rest of the record is still converted.

use chrono::format::ParseError;
use chrono::{NaiveDate, NaiveDateTime};

use crate::record::BoRecord;
use crate::schema::BoColumnSpec;

/// The only date layout the daemon is sent.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, Default)]
pub struct BoDateNormalizer {
    /// Input pattern per column position; `None` passes the value through.
    patterns: Vec<Option<String>>,
}

impl BoDateNormalizer {
    pub fn from_columns(columns: &[BoColumnSpec]) -> Self {
        BoDateNormalizer {
            patterns: columns
                .iter()
                .map(|c| c.datefmt.clone().filter(|f| !f.is_empty()))
                .collect(),
        }
    }

    /// True when no column needs rewriting.
    pub fn is_identity(&self) -> bool {
        self.patterns.iter().all(Option::is_none)
    }

    /// Rewrites date columns in place and returns how many values failed.
    pub fn normalize(&self, record: &mut BoRecord) -> usize {
        let line = record.line;
        let mut failures = 0;
        for (idx, value) in record.fields_mut().iter_mut().enumerate() {
            let pattern = match self.patterns.get(idx) {
                Some(Some(pattern)) => pattern,
                _ => continue,
            };
            if value.is_empty() {
                continue;
            }
            match convert(value, pattern) {
                Ok(converted) => *value = converted,
                Err(e) => {
                    failures += 1;
                    log::warn!(
                        "record {} column {}: cannot read {:?} as {:?}: {}",
                        line,
                        idx,
                        value,
                        pattern,
                        e
                    );
                }
            }
        }
        failures
    }
}

/// Parses `value` with `pattern` and renders it canonically. Date-only
/// patterns resolve to midnight.
pub fn convert(value: &str, pattern: &str) -> Result<String, ParseError> {
    let datetime = match NaiveDateTime::parse_from_str(value, pattern) {
        Ok(dt) => dt,
        Err(err) => match NaiveDate::parse_from_str(value, pattern) {
            Ok(date) => date.and_hms_opt(0, 0, 0).ok_or(err)?,
            Err(_) => return Err(err),
        },
    };
    Ok(datetime.format(CANONICAL_DATE_FORMAT).to_string())
}
