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

/// How a statement's response is consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoAction {
    /// One request, one response frame.
    Default,
    /// Result-returning query; paged unless a resource handle is requested.
    FetchNow,
    /// Cursor scan, always paged.
    Scan,
}

impl BoAction {
    /// Classifies on the first whitespace-delimited token, ignoring case.
    pub fn classify(stmt: &str) -> BoAction {
        let verb = match stmt.split_whitespace().next() {
            Some(verb) => verb,
            None => return BoAction::Default,
        };
        if ["SELECT", "FIND", "GET"]
            .iter()
            .any(|v| verb.eq_ignore_ascii_case(v))
        {
            BoAction::FetchNow
        } else if verb.eq_ignore_ascii_case("SCAN") {
            BoAction::Scan
        } else {
            BoAction::Default
        }
    }

    pub fn is_paged(&self, handle: bool) -> bool {
        match self {
            BoAction::Default => false,
            BoAction::FetchNow => !handle,
            BoAction::Scan => true,
        }
    }
}
