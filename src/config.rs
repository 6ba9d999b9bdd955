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

//! # Client Configuration
//!
//! A single immutable [`BoConfig`] is built once at startup and passed to both
//! the bulk loader and the interactive session. It can be assembled from a
//! JSON or YAML file through [`BoConfigBuilder`], whose unset fields fall back
//! to the defaults, and then overridden by command-line flags. The `log`
//! section of the file configures [`BoLogger`](crate::logging::BoLogger).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{BoError, Result};
use crate::logging::{BoLogConfig, BoLogConfigBuilder};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_KEEPALIVE_SECS: u64 = 55;
pub const DEFAULT_WRITE_WAIT_SECS: u64 = 10;
pub const DEFAULT_PIPE_CAPACITY: usize = 64 * 1024;

/// Connection and behaviour settings shared by every Bosh pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoConfig {
    pub host: String,
    pub port: u16,
    /// Rows per INSERT statement, and capacity of the record channel.
    pub batch_size: usize,
    /// Suppress prompts and diagnostics; only the exit status reports failure.
    pub quiet: bool,
    /// Log every assembled statement and keep the bulk load off the network.
    pub debug: bool,
    /// Print the elapsed time after each interactive exchange.
    pub timed: bool,
    /// Ask the daemon for a result handle instead of inline rows.
    pub handle: bool,
    pub workspace: Option<String>,
    pub keepalive_secs: u64,
    pub write_wait_secs: u64,
    /// Bytes buffered between the statement encoder and the HTTP body.
    pub pipe_capacity: usize,
    pub log: BoLogConfig,
}

impl Default for BoConfig {
    fn default() -> Self {
        BoConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            batch_size: DEFAULT_BATCH_SIZE,
            quiet: false,
            debug: false,
            timed: false,
            handle: false,
            workspace: None,
            keepalive_secs: DEFAULT_KEEPALIVE_SECS,
            write_wait_secs: DEFAULT_WRITE_WAIT_SECS,
            pipe_capacity: DEFAULT_PIPE_CAPACITY,
            log: BoLogConfig::default(),
        }
    }
}

impl BoConfig {
    /// `host:port`, bracketing bare IPv6 addresses.
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}/{}", self.authority(), path.trim_start_matches('/'))
    }

    /// Endpoint of the interactive session.
    pub fn exec_url(&self) -> String {
        format!("ws://{}/exec", self.authority())
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    pub fn write_wait(&self) -> Duration {
        Duration::from_secs(self.write_wait_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(BoError::config("host must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(BoError::config("batch size must be at least 1"));
        }
        if self.keepalive_secs == 0 {
            return Err(BoError::config("keepalive interval must be positive"));
        }
        if self.pipe_capacity == 0 {
            return Err(BoError::config("pipe capacity must be positive"));
        }
        self.log.level_filter()?;
        Ok(())
    }
}

/// Partial configuration; every unset field keeps its default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoConfigBuilder {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub batch_size: Option<usize>,
    pub quiet: Option<bool>,
    pub debug: Option<bool>,
    pub timed: Option<bool>,
    pub handle: Option<bool>,
    pub workspace: Option<String>,
    pub keepalive_secs: Option<u64>,
    pub write_wait_secs: Option<u64>,
    pub pipe_capacity: Option<usize>,
    pub log: BoLogConfigBuilder,
}

impl BoConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn timed(mut self, timed: bool) -> Self {
        self.timed = Some(timed);
        self
    }

    pub fn handle(mut self, handle: bool) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn keepalive_secs(mut self, secs: u64) -> Self {
        self.keepalive_secs = Some(secs);
        self
    }

    pub fn pipe_capacity(mut self, bytes: usize) -> Self {
        self.pipe_capacity = Some(bytes);
        self
    }

    /// Overlays the fields set in `other` on top of `self`.
    pub fn merge(self, other: BoConfigBuilder) -> Self {
        BoConfigBuilder {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            batch_size: other.batch_size.or(self.batch_size),
            quiet: other.quiet.or(self.quiet),
            debug: other.debug.or(self.debug),
            timed: other.timed.or(self.timed),
            handle: other.handle.or(self.handle),
            workspace: other.workspace.or(self.workspace),
            keepalive_secs: other.keepalive_secs.or(self.keepalive_secs),
            write_wait_secs: other.write_wait_secs.or(self.write_wait_secs),
            pipe_capacity: other.pipe_capacity.or(self.pipe_capacity),
            log: self.log.merge(other.log),
        }
    }

    pub fn build(self) -> BoConfig {
        let base = BoConfig::default();
        BoConfig {
            host: self.host.unwrap_or(base.host),
            port: self.port.unwrap_or(base.port),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            quiet: self.quiet.unwrap_or(base.quiet),
            debug: self.debug.unwrap_or(base.debug),
            timed: self.timed.unwrap_or(base.timed),
            handle: self.handle.unwrap_or(base.handle),
            workspace: self.workspace.or(base.workspace),
            keepalive_secs: self.keepalive_secs.unwrap_or(base.keepalive_secs),
            write_wait_secs: self.write_wait_secs.unwrap_or(base.write_wait_secs),
            pipe_capacity: self.pipe_capacity.unwrap_or(base.pipe_capacity),
            log: self.log.build(),
        }
    }

    /// Reads a partial configuration file without applying defaults, so that
    /// command-line flags can still be merged on top.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BoError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&text)?),
            _ => Ok(serde_json::from_str(&text)?),
        }
    }
}
