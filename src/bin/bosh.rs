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

//! Interactive shell and script uploader.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use bosh::{upload_script, BoConfig, BoConfigBuilder, BoLogger, BoPrompt, BoSession};

#[derive(Parser, Debug)]
#[command(name = "bosh")]
#[command(about = "Interactive shell for the analytical database daemon")]
struct Args {
    /// Daemon host name
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Daemon port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Stay quiet and only show results
    #[arg(short = 'S', long)]
    quiet: bool,

    /// Ask for a result handle instead of inline rows
    #[arg(long)]
    handle: bool,

    /// Report the elapsed time of every statement
    #[arg(long)]
    time: bool,

    /// Upload this script instead of starting a session
    #[arg(short = 'F', long)]
    file: Option<PathBuf>,

    /// Workspace sent with every statement
    #[arg(long)]
    workspace: Option<String>,

    /// JSON or YAML configuration file; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr
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
        flags.workspace = self.workspace.clone();
        if self.quiet {
            flags.quiet = Some(true);
        }
        if self.handle {
            flags.handle = Some(true);
        }
        if self.time {
            flags.timed = Some(true);
        }
        flags.log.level = self.log_level.clone();
        flags.log.file_path = self.log_file.clone();
        if self.log_json {
            flags.log = flags.log.json(true);
        }
        let config = base.merge(flags).build();
        config.validate()?;
        Ok(config)
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.config()?;
    BoLogger::init(&config.log).context("initialising logger")?;

    if let Some(script) = &args.file {
        let reply = upload_script(&config, script).await?;
        println!("{}", reply);
        return Ok(());
    }

    let mut session = BoSession::connect(&config, std::io::stdout()).await?;
    let prompt = BoPrompt::new(config.quiet, config.timed).spawn_stdin();
    session.run(prompt.lines, prompt.acks).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let quiet = args.quiet;
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !quiet {
                eprintln!("bosh: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
