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

//! # Logging Module
//!
//! Backend for the `log` facade used throughout the crate, plus the statement
//! sink that echoes every generated statement in debug mode.
//!
//! ## Module Components
//!
//! - **Configuration** ([config.rs](config/index.html)): level, console,
//!   JSON or text lines, optional rotated file
//! - **Core** ([core.rs](core/index.html)): `BoLogger`, the `log::Log`
//!   implementation and its record type
//! - **Handlers** ([handlers.rs](handlers/index.html)): stderr and file output
//! - **Formatters** ([formatters.rs](formatters/index.html)): line layouts
//! - **Statements** ([statement.rs](statement/index.html)): `BoStatementLog`
//!
//! ## Usage Patterns
//!
//! ```rust
//! use bosh::logging::{BoLogConfigBuilder, BoLogger};
//!
//! BoLogger::init(&BoLogConfigBuilder::new().level("info").build())?;
//! log::info!("ready");
//! ```

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;
pub mod statement;

pub use self::config::{BoLogConfig, BoLogConfigBuilder};
pub use self::core::{BoLogRecord, BoLogger};
pub use self::formatters::{BoJsonFormatter, BoTextFormatter};
pub use self::handlers::{BoFileHandler, BoLogHandler, BoStderrHandler};
pub use self::statement::{BoStatementLog, STATEMENT_TARGET};
