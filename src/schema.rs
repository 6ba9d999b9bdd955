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

//! # Table Schema Module
//!
//! Table metadata handed to the bulk loader: the destination table, its
//! column specifications, and the CSV dialect used to read the source.
//!
//! Metadata arrives as a JSON document:
//!
//! ```json
//! {
//!   "name": "sales",
//!   "columns": [
//!     {"attr": "id", "type": "int", "key": true},
//!     {"attr": "day", "type": "date", "datefmt": "%d/%m/%Y"}
//!   ],
//!   "misc": {"skip": 1, "sep": ";", "trim": false}
//! }
//! ```
//!
//! Keys missing from `misc` keep their defaults. When `misc` is absent as a
//! whole, the caller-supplied dialect (usually built from command-line flags)
//! is used instead.

use serde::{Deserialize, Serialize};

use crate::errors::{BoError, Result};

/// Logical column types understood by the daemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoColumnType {
    String,
    Int,
    Double,
    Date,
}

impl BoColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoColumnType::String => "string",
            BoColumnType::Int => "int",
            BoColumnType::Double => "double",
            BoColumnType::Date => "date",
        }
    }
}

/// Specification of one destination column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoColumnSpec {
    #[serde(rename = "attr")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BoColumnType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub key: bool,
    /// strftime-style pattern the source uses for this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datefmt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl BoColumnSpec {
    pub fn new(name: impl Into<String>, kind: BoColumnType) -> Self {
        BoColumnSpec {
            name: name.into(),
            kind,
            key: false,
            datefmt: None,
            default: None,
        }
    }

    pub fn with_key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = Some(datefmt.into());
        self
    }

    /// `'name' type`, as used inside CREATE TABLE.
    pub fn pair(&self) -> String {
        format!("'{}' {}", self.name, self.kind.as_str())
    }
}

pub const DEFAULT_SKIP_LINES: u64 = 0;
pub const DEFAULT_SEPARATOR: &str = ",";
pub const DEFAULT_COMMENT: &str = "#";
pub const DEFAULT_FIELDS: i64 = -1;
pub const DEFAULT_LAZY_QUOTES: bool = true;
pub const DEFAULT_TRIM_LEADING_SPACE: bool = true;

/// How the CSV source is laid out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoCsvDialect {
    /// Records skipped unconditionally before decoding starts.
    #[serde(rename = "skip")]
    pub skip_lines: u64,
    #[serde(rename = "sep")]
    pub separator: String,
    /// Lines starting with this character are ignored. Empty disables comments.
    pub comment: String,
    /// Expected field count: -1 unchecked, 0 width of the first record.
    pub fields: i64,
    #[serde(rename = "quotes")]
    pub lazy_quotes: bool,
    #[serde(rename = "trim")]
    pub trim_leading_space: bool,
}

impl Default for BoCsvDialect {
    fn default() -> Self {
        BoCsvDialect {
            skip_lines: DEFAULT_SKIP_LINES,
            separator: DEFAULT_SEPARATOR.to_string(),
            comment: DEFAULT_COMMENT.to_string(),
            fields: DEFAULT_FIELDS,
            lazy_quotes: DEFAULT_LAZY_QUOTES,
            trim_leading_space: DEFAULT_TRIM_LEADING_SPACE,
        }
    }
}

impl BoCsvDialect {
    /// Separator as the single byte the CSV decoder needs.
    pub fn separator_byte(&self) -> Result<u8> {
        single_ascii("sep", &self.separator)?
            .ok_or_else(|| BoError::schema("field separator must not be empty"))
    }

    /// Comment marker byte, or `None` when comments are disabled.
    pub fn comment_byte(&self) -> Result<Option<u8>> {
        single_ascii("comment", &self.comment)
    }

    pub fn validate(&self) -> Result<()> {
        let sep = self.separator_byte()?;
        if let Some(comment) = self.comment_byte()? {
            if comment == sep {
                return Err(BoError::schema(
                    "comment marker and field separator must differ",
                ));
            }
        }
        if self.fields < -1 {
            return Err(BoError::schema(format!(
                "invalid field count {}",
                self.fields
            )));
        }
        Ok(())
    }
}

fn single_ascii(key: &str, value: &str) -> Result<Option<u8>> {
    let bytes = value.as_bytes();
    match bytes.len() {
        0 => Ok(None),
        1 if bytes[0].is_ascii() => Ok(Some(bytes[0])),
        _ => Err(BoError::schema(format!(
            "'{}' must be a single ASCII character, got {:?}",
            key, value
        ))),
    }
}

/// Destination table and source layout for one bulk load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoTableSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<BoColumnSpec>,
    #[serde(rename = "misc", default)]
    pub dialect: BoCsvDialect,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    columns: Vec<BoColumnSpec>,
    #[serde(default)]
    misc: Option<BoCsvDialect>,
}

impl BoTableSchema {
    pub fn new(name: impl Into<String>, dialect: BoCsvDialect) -> Self {
        BoTableSchema {
            name: name.into(),
            columns: Vec::new(),
            dialect,
        }
    }

    pub fn with_columns(mut self, columns: Vec<BoColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    /// Decodes a metadata document, falling back to `dialect` when the
    /// document carries no `misc` section.
    pub fn from_metadata(json: &str, dialect: BoCsvDialect) -> Result<Self> {
        let raw: RawMetadata = serde_json::from_str(json)
            .map_err(|e| BoError::schema(format!("invalid metadata: {}", e)))?;
        Ok(BoTableSchema {
            name: raw.name,
            columns: raw.columns,
            dialect: raw.misc.unwrap_or(dialect),
        })
    }

    /// Rejects schemas that cannot start a load.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BoError::config("destination table unspecified"));
        }
        if let Some(col) = self.columns.iter().find(|c| c.name.is_empty()) {
            return Err(BoError::schema(format!(
                "column of type {} has no name",
                col.kind.as_str()
            )));
        }
        self.dialect.validate()
    }

    pub fn attributes(&self) -> String {
        self.columns
            .iter()
            .map(BoColumnSpec::pair)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `KEY(a,b)` over key columns, or an empty string when there are none.
    pub fn keys(&self) -> String {
        let keys: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.key)
            .map(|c| c.name.as_str())
            .collect();
        if keys.is_empty() {
            String::new()
        } else {
            format!("KEY({})", keys.join(","))
        }
    }

    pub fn create_stmt(&self) -> String {
        let keys = self.keys();
        if keys.is_empty() {
            format!("CREATE TABLE {} ({})", self.name, self.attributes())
        } else {
            format!("CREATE TABLE {} ({} {})", self.name, self.attributes(), keys)
        }
    }

    pub fn trim_stmt(&self) -> String {
        format!("TRIM {} to 0", self.name)
    }
}
