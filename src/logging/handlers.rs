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

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::logging::core::BoLogRecord;
use crate::logging::formatters::{BoJsonFormatter, BoTextFormatter};

pub trait BoLogHandler {
    fn handle(&self, record: &BoLogRecord);

    fn flush(&self) {}
}

fn render(json: bool, record: &BoLogRecord) -> String {
    if json {
        BoJsonFormatter::format(record)
    } else {
        BoTextFormatter::format(record)
    }
}

/// Writes to stderr so that query results on stdout stay clean.
pub struct BoStderrHandler {
    json: bool,
}

impl BoStderrHandler {
    pub fn new(json: bool) -> Self {
        BoStderrHandler { json }
    }
}

impl BoLogHandler for BoStderrHandler {
    fn handle(&self, record: &BoLogRecord) {
        let line = render(self.json, record);
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Appends to a file, rotating `path -> path.1 -> path.2 ...` once the file
/// exceeds `max_bytes`.
pub struct BoFileHandler {
    path: PathBuf,
    json: bool,
    max_bytes: Option<u64>,
    backup_count: u32,
    lock: Mutex<()>,
}

impl BoFileHandler {
    pub fn new(
        path: impl Into<PathBuf>,
        json: bool,
        max_bytes: Option<u64>,
        backup_count: Option<u32>,
    ) -> Self {
        BoFileHandler {
            path: path.into(),
            json,
            max_bytes,
            backup_count: backup_count.unwrap_or(7),
            lock: Mutex::new(()),
        }
    }

    fn backup(&self, idx: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", idx));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) {
        let max_bytes = match self.max_bytes {
            Some(v) => v,
            None => return,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > max_bytes => {}
            _ => return,
        }
        if self.backup_count == 0 {
            let _ = fs::remove_file(&self.path);
            return;
        }
        for idx in (1..self.backup_count).rev() {
            let from = self.backup(idx);
            if from.exists() {
                let _ = fs::rename(&from, self.backup(idx + 1));
            }
        }
        let _ = fs::rename(&self.path, self.backup(1));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoLogHandler for BoFileHandler {
    fn handle(&self, record: &BoLogRecord) {
        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.rotate_if_needed();

        let line = render(self.json, record);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", line);
        }
    }
}
