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

use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::errors::{BoError, Result};

/// Configuration for [`BoLogger`](super::core::BoLogger): threshold level,
/// console output (always stderr, stdout carries results), JSON or text lines
/// and an optional size-rotated log file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoLogConfig {
    pub level: String,
    pub console_enabled: bool,
    pub json_format: bool,
    /// Log file path; file logging is off when absent.
    pub file_path: Option<String>,
    /// Rotate the file once it grows past this many bytes.
    pub max_bytes: Option<u64>,
    /// Number of rotated files to keep.
    pub backup_count: Option<u32>,
}

impl Default for BoLogConfig {
    fn default() -> Self {
        BoLogConfig {
            level: "WARN".to_string(),
            console_enabled: true,
            json_format: false,
            file_path: None,
            max_bytes: Some(10 * 1024 * 1024),
            backup_count: Some(7),
        }
    }
}

impl BoLogConfig {
    /// Parses the configured level. `WARNING` is accepted as an alias of
    /// `WARN`, an unknown name is a configuration error.
    pub fn level_filter(&self) -> Result<LevelFilter> {
        let level = self.level.trim();
        if level.eq_ignore_ascii_case("warning") {
            return Ok(LevelFilter::Warn);
        }
        LevelFilter::from_str(level)
            .map_err(|_| BoError::config(format!("unknown log level {:?}", self.level)))
    }
}

/// Partial logging settings, as read from the `log` section of a
/// configuration file or assembled from flags.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoLogConfigBuilder {
    pub level: Option<String>,
    pub console_enabled: Option<bool>,
    pub json_format: Option<bool>,
    pub file_path: Option<String>,
    pub max_bytes: Option<u64>,
    pub backup_count: Option<u32>,
}

impl BoLogConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console_enabled = Some(enabled);
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json_format = Some(json);
        self
    }

    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Overlays the fields set in `other` on top of `self`.
    pub fn merge(self, other: BoLogConfigBuilder) -> Self {
        BoLogConfigBuilder {
            level: other.level.or(self.level),
            console_enabled: other.console_enabled.or(self.console_enabled),
            json_format: other.json_format.or(self.json_format),
            file_path: other.file_path.or(self.file_path),
            max_bytes: other.max_bytes.or(self.max_bytes),
            backup_count: other.backup_count.or(self.backup_count),
        }
    }

    pub fn build(self) -> BoLogConfig {
        let base = BoLogConfig::default();
        BoLogConfig {
            level: self.level.unwrap_or(base.level),
            console_enabled: self.console_enabled.unwrap_or(base.console_enabled),
            json_format: self.json_format.unwrap_or(base.json_format),
            file_path: self.file_path.or(base.file_path),
            max_bytes: self.max_bytes.or(base.max_bytes),
            backup_count: self.backup_count.or(base.backup_count),
        }
    }
}
