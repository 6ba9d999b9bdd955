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

use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoContentType {
    Gzip,
    Plain,
}

impl BoContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            BoContentType::Gzip => "application/gzip",
            BoContentType::Plain => "text/plain",
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BoFormatDetector;

impl BoFormatDetector {
    pub fn new() -> Self {
        BoFormatDetector
    }

    /// Suffix-based sniff; only `.gz` is treated as compressed.
    pub fn detect_from_path(&self, path: &Path) -> BoContentType {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "gz" => BoContentType::Gzip,
            _ => BoContentType::Plain,
        }
    }
}
