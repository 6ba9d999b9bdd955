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

//! # HTTP Client Module
//!
//! One-shot requests against the daemon's HTTP endpoints.
//!
//! - **Pipe** ([pipe.rs](pipe/index.html)): streaming bulk load over
//!   `POST /cmd/pipe`
//! - **Script** ([script.rs](script/index.html)): script upload over
//!   `POST /script/<name>`

pub mod pipe;
pub mod script;

pub use self::pipe::{BoLoadReport, BoRequestStreamer, PIPE_PATH};
pub use self::script::upload_script;
