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

//! Bulk loader: streams a CSV file into a table over a single HTTP request.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use bosh::schema::{
    DEFAULT_COMMENT, DEFAULT_FIELDS, DEFAULT_LAZY_QUOTES, DEFAULT_SEPARATOR,
    DEFAULT_SKIP_LINES, DEFAULT_TRIM_LEADING_SPACE,
};
use bosh::{
    BoConfig, BoConfigBuilder, BoCsvDialect, BoInput, BoLogger, BoRequestStreamer,
    BoTableSchema,
};

#[derive(Parser, Debug)]
#[command(name = "csvloader")]
#[command(about = "Load delimited text into a table of the analytical database daemon")]
struct Args {
    /// Daemon host name
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Daemon port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Dry run: log every statement and send nothing
    #[arg(short = 'D', long)]
    debug: bool,

    /// CSV file to load, `-` for stdin
    #[arg(short = 'F', long, default_value = "")]
    file: String,

    /// Destination table; overrides the metadata name
    #[arg(short = 'T', long)]
    table: Option<String>,

    /// Records per INSERT statement
    #[arg(short = 'B', long)]
    batch_size: Option<usize>,

    /// Leading records to skip
    #[arg(long, default_value_t = DEFAULT_SKIP_LINES)]
    skip: u64,

    /// Field separator
    #[arg(long, default_value = DEFAULT_SEPARATOR)]
    sep: String,

    /// Comment indicator
    #[arg(long, default_value = DEFAULT_COMMENT)]
    comment: String,

    /// Fields per record: -1 unchecked, 0 width of the first record
    #[arg(long, default_value_t = DEFAULT_FIELDS, allow_hyphen_values = true)]
    fields: i64,

    /// Read stray quotes literally
    #[arg(long, default_value_t = DEFAULT_LAZY_QUOTES, action = ArgAction::Set)]
    quotes: bool,

    /// Strip leading white space from every field
    #[arg(long, default_value_t = DEFAULT_TRIM_LEADING_SPACE, action = ArgAction::Set)]
    trim: bool,

    /// Table metadata JSON: name, columns and an optional `misc` dialect
    #[arg(long)]
    metadata: Option<String>,

    /// Create the table before loading
    #[arg(long)]
    create: bool,

    /// Empty the table before loading
    #[arg(long)]
    truncate: bool,

    /// JSON or YAML configuration file; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr; `info` when -D is set
    #[arg(long)]
    log_level: Option<String>,

    /// Also write diagnostics to this file, rotated by size
    #[arg(long)]
    log_file: Option<String>,

    /// Write diagnostics as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn config(&self) -> Result<BoConfig> {
        let base = match &self.config {
            Some(path) => BoConfigBuilder::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => BoConfigBuilder::new(),
        };
        let mut flags = BoConfigBuilder::new();
        flags.host = self.host.clone();
        flags.port = self.port;
        flags.batch_size = self.batch_size;
        if self.debug {
            flags.debug = Some(true);
        }
        flags.log.level = self.log_level.clone();
        flags.log.file_path = self.log_file.clone();
        if self.log_json {
            flags.log = flags.log.json(true);
        }
        let mut merged = base.merge(flags);
        if merged.log.level.is_none() && merged.debug == Some(true) {
            merged.log.level = Some("info".to_string());
        }
        let config = merged.build();
        config.validate()?;
        Ok(config)
    }

    fn dialect(&self) -> BoCsvDialect {
        BoCsvDialect {
            skip_lines: self.skip,
            separator: self.sep.clone(),
            comment: self.comment.clone(),
            fields: self.fields,
            lazy_quotes: self.quotes,
            trim_leading_space: self.trim,
        }
    }

    fn schema(&self) -> Result<BoTableSchema> {
        let mut schema = match &self.metadata {
            Some(json) => BoTableSchema::from_metadata(json, self.dialect())?,
            None => BoTableSchema::new("", self.dialect()),
        };
        if let Some(table) = self.table.as_ref().filter(|t| !t.is_empty()) {
            schema.name = table.clone();
        }
        schema.validate()?;
        Ok(schema)
    }
}

async fn run(args: Args) -> Result<()> {
    let input = BoInput::from_arg(&args.file)?;
    let config = args.config()?;
    let schema = args.schema()?;

    BoLogger::init(&config.log).context("initialising logger")?;

    BoRequestStreamer::new(config, schema)
        .with_create(args.create)
        .with_truncate(args.truncate)
        .load(&input)
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("csvloader: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
