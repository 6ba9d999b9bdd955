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

//! # Wire Types
//!
//! Request and response envelopes exchanged with the daemon, shared by the
//! bulk loader (`/cmd/pipe`) and the interactive session (`/exec`).
//!
//! ## Requests
//!
//! ```json
//! {"Stmt": "SCAN sales", "Workspace": "", "Opts": {"Handle": false}}
//! ```
//!
//! `Opts` is omitted when no execution option is requested. One statement per
//! frame; frames are independently executable.
//!
//! ## Responses
//!
//! ```json
//! {"Content": {"content": [...], "index": 3}, "Status": 0, "Err": ""}
//! ```
//!
//! The daemon does not tag paged responses. [`BoPayload::probe`] decodes a
//! frame into a paged page when `Content` has the `{content, index}` shape and
//! falls back to an opaque value for anything else.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};

use crate::errors::{BoError, Result};

/// Execution options attached to a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoRequestOpts {
    /// Return a result handle instead of inline rows.
    #[serde(rename = "Handle", default)]
    pub handle: bool,
}

/// One statement sent to the daemon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoRequestFrame {
    #[serde(rename = "Stmt")]
    pub stmt: String,
    #[serde(rename = "Workspace", default)]
    pub workspace: String,
    #[serde(rename = "Opts", default, skip_serializing_if = "Option::is_none")]
    pub opts: Option<BoRequestOpts>,
}

impl BoRequestFrame {
    pub fn new(stmt: impl Into<String>) -> Self {
        BoRequestFrame {
            stmt: stmt.into(),
            workspace: String::new(),
            opts: None,
        }
    }

    pub fn with_workspace(mut self, workspace: Option<&str>) -> Self {
        self.workspace = workspace.unwrap_or_default().to_string();
        self
    }

    pub fn with_handle(mut self, handle: bool) -> Self {
        self.opts = Some(BoRequestOpts { handle });
        self
    }

    /// Compact JSON followed by a single `\n`, ready for a frame stream.
    pub fn encode_line(&self) -> Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(self)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

/// Response envelope as sent by the daemon. Every field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoResponseFrame {
    #[serde(rename = "Content", default)]
    pub content: Option<Value>,
    #[serde(rename = "Status", default)]
    pub status: Option<Number>,
    #[serde(rename = "Err", default)]
    pub err: Option<String>,
}

impl BoResponseFrame {
    pub fn status(&self) -> Option<i64> {
        self.status.as_ref().and_then(Number::as_i64)
    }

    /// Non-empty `Err` text, if any.
    pub fn error(&self) -> Option<&str> {
        self.err.as_deref().filter(|e| !e.is_empty())
    }
}

#[derive(Deserialize)]
struct PagedContent {
    content: Vec<Value>,
    index: Number,
}

/// One page of a multi-page result.
#[derive(Clone, Debug, PartialEq)]
pub struct BoPage {
    pub items: Vec<Value>,
    /// Continuation cursor; `<= 0` marks the final page.
    pub index: i64,
}

impl BoPage {
    pub fn has_more(&self) -> bool {
        self.index > 0
    }
}

/// A response frame after shape probing.
#[derive(Clone, Debug, PartialEq)]
pub enum BoPayload {
    Paged(BoPage),
    /// Any frame that is not a page; rendered verbatim and ends paging.
    Opaque(Value),
}

impl BoPayload {
    pub fn probe(frame: Value) -> BoPayload {
        match Self::decode_page(&frame) {
            Some(page) => BoPayload::Paged(page),
            None => BoPayload::Opaque(frame),
        }
    }

    fn decode_page(frame: &Value) -> Option<BoPage> {
        let envelope = BoResponseFrame::deserialize(frame).ok()?;
        let content = envelope.content?;
        let paged = PagedContent::deserialize(&content).ok()?;
        let index = paged
            .index
            .as_i64()
            .or_else(|| paged.index.as_f64().map(|f| f as i64))?;
        Some(BoPage {
            items: paged.content,
            index,
        })
    }
}

/// Pretty JSON with a four-space indent, the layout the shell prints.
pub fn render_pretty(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| BoError::internal(e.to_string()))
}
