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

//! # Interactive Session Module
//!
//! A persistent WebSocket session that executes operator statements one at a
//! time and prints every response frame as indented JSON.
//!
//! ## Module Components
//!
//! - **Actions** ([action.rs](action/index.html)): statement classification
//! - **Transport** ([transport.rs](transport/index.html)): `BoTransport` and
//!   its WebSocket implementation
//! - **Engine** ([engine.rs](engine/index.html)): exchanges, paging and the
//!   keepalive loop
//! - **Prompt** ([prompt.rs](prompt/index.html)): operator input thread
//!
//! ## Usage Patterns
//!
//! ```rust
//! use bosh::session::{BoPrompt, BoSession};
//!
//! let mut session = BoSession::connect(&config, std::io::stdout()).await?;
//! let prompt = BoPrompt::new(config.quiet, config.timed).spawn_stdin();
//! session.run(prompt.lines, prompt.acks).await?;
//! ```

pub mod action;
pub mod engine;
pub mod prompt;
pub mod transport;

pub use self::action::BoAction;
pub use self::engine::{BoExchange, BoSession, BoSessionOptions, BoSessionState};
pub use self::prompt::{BoPrompt, BoPromptChannels, PROMPT};
pub use self::transport::{BoTransport, BoWsTransport};
