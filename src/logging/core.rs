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

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{json, Map, Value};

use crate::errors::{BoError, Result};
use crate::logging::config::BoLogConfig;
use crate::logging::handlers::{BoFileHandler, BoLogHandler, BoStderrHandler};

/// One log event as seen by the handlers.
#[derive(Clone, Debug)]
pub struct BoLogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: SystemTime,
}

impl BoLogRecord {
    pub fn from_record(record: &Record<'_>) -> Self {
        BoLogRecord {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn timestamp_rfc3339(&self) -> String {
        DateTime::<Utc>::from(self.timestamp).to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn to_json(&self) -> Value {
        let mut data = Map::new();
        data.insert("timestamp".into(), json!(self.timestamp_rfc3339()));
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("target".into(), json!(self.target));
        data.insert("message".into(), json!(self.message));
        Value::Object(data)
    }
}

/// `log` facade backend fanning records out to the configured handlers.
pub struct BoLogger {
    level: LevelFilter,
    handlers: Vec<Box<dyn BoLogHandler + Send + Sync>>,
}

impl BoLogger {
    pub fn new(config: &BoLogConfig) -> Result<Self> {
        let mut logger = BoLogger {
            level: config.level_filter()?,
            handlers: Vec::new(),
        };
        if config.console_enabled {
            logger = logger.with_handler(BoStderrHandler::new(config.json_format));
        }
        if let Some(path) = &config.file_path {
            logger = logger.with_handler(BoFileHandler::new(
                path.clone(),
                config.json_format,
                config.max_bytes,
                config.backup_count,
            ));
        }
        Ok(logger)
    }

    pub fn with_handler<H: BoLogHandler + Send + Sync + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Installs the logger process-wide. Only the first call succeeds.
    pub fn init(config: &BoLogConfig) -> Result<()> {
        let logger = BoLogger::new(config)?;
        let level = logger.level;
        log::set_boxed_logger(Box::new(logger))
            .map_err(|e| BoError::config(format!("logger already installed: {}", e)))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for BoLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let record = BoLogRecord::from_record(record);
        for handler in &self.handlers {
            handler.handle(&record);
        }
    }

    fn flush(&self) {
        for handler in &self.handlers {
            handler.flush();
        }
    }
}
