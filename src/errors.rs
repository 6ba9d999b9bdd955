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

//! # Bosh Error Module
//!
//! This module defines the error types used throughout Bosh for consistent
//! error handling and reporting across the bulk loader and the interactive
//! session.
//!
//! ## Error Categories
//!
//! Errors fall into four severities, and each variant belongs to exactly one:
//!
//! - **Per-record** (`Record`): a malformed row or an unparsable date. These
//!   never leave the record source; they are logged and the row is skipped
//!   or passed through degraded.
//! - **Per-exchange** (`Transport`): a failed send in the interactive session.
//!   The session prints it and returns to the prompt.
//! - **Fatal connection** (`Fatal`, `Http`): a failed dial, a non-2xx response,
//!   a malformed or missing response frame. The protocol state cannot be
//!   resumed, so these always reach the binary, which exits non-zero.
//! - **Fatal config** (`Config`, `Schema`): rejected before any streaming
//!   starts.
//!
//! `Io`, `Serde` and `Internal` are carriers for lower-level failures and are
//! classified by the call site that produces them.
//!
//! ## Usage
//!
//! ```rust
//! use bosh::errors::{Result, BoError};
//!
//! fn table_name(name: &str) -> Result<&str> {
//!     if name.is_empty() {
//!         return Err(BoError::config("destination table unspecified"));
//!     }
//!     Ok(name)
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Bosh.
pub type Result<T> = std::result::Result<T, BoError>;

/// Canonical error enumeration for Bosh.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum BoError {
    /// Errors originating from filesystem or pipe IO.
    #[error("io error: {0}")]
    Io(String),

    /// Invalid or missing configuration, detected before streaming.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed table metadata or CSV dialect.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// A single input record could not be decoded or normalized.
    #[error("record {line}: {message}")]
    Record { line: u64, message: String },

    /// A request could not be delivered; the connection may still be usable.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Unrecoverable protocol or connection failure.
    #[error("fatal error during {stage}: {message}")]
    Fatal { stage: String, message: String },

    /// The daemon answered an HTTP request with a non-success status.
    #[error("http status {status}: {message}")]
    Http { status: u16, message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for BoError {
    fn from(err: io::Error) -> Self {
        BoError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BoError {
    fn from(err: serde_json::Error) -> Self {
        BoError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for BoError {
    fn from(err: serde_yaml::Error) -> Self {
        BoError::Serde(err.to_string())
    }
}

impl BoError {
    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        BoError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        BoError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct per-record errors.
    pub fn record(line: u64, message: impl Into<String>) -> Self {
        BoError::Record {
            line,
            message: message.into(),
        }
    }

    /// Helper to construct recoverable transport errors.
    pub fn transport<T: Into<String>>(message: T) -> Self {
        BoError::Transport {
            message: message.into(),
        }
    }

    /// Helper to construct fatal errors.
    pub fn fatal(stage: impl Into<String>, message: impl Into<String>) -> Self {
        BoError::Fatal {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        BoError::Internal(message.into())
    }

    /// Whether the error must terminate the owning pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BoError::Fatal { .. } | BoError::Http { .. })
    }
}
