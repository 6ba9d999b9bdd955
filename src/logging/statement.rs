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

use std::fmt;
use std::sync::Arc;

/// Log target carrying every generated statement in debug mode.
pub const STATEMENT_TARGET: &str = "bosh::stmt";

type BoStatementFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Sink for generated statements. Disabled sinks cost nothing per call.
#[derive(Clone, Default)]
pub struct BoStatementLog {
    sink: Option<BoStatementFn>,
}

impl BoStatementLog {
    /// Routes statements to the `log` facade at info level when enabled.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self::custom(Arc::new(|stmt: &str| {
                log::info!(target: STATEMENT_TARGET, "{}", stmt)
            }))
        } else {
            Self::noop()
        }
    }

    pub fn noop() -> Self {
        BoStatementLog { sink: None }
    }

    pub fn custom(sink: BoStatementFn) -> Self {
        BoStatementLog { sink: Some(sink) }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, stmt: &str) {
        if let Some(sink) = &self.sink {
            sink(stmt);
        }
    }
}

impl fmt::Debug for BoStatementLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoStatementLog")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
