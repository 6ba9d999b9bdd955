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

//! The interactive session loop.
//!
//! One task owns the transport and selects between operator input and the
//! keepalive timer. An exchange (request plus every response frame it
//! produces) runs to completion inside a single select arm, so a keepalive can
//! never be written between a request and its last page.

use std::io::Write;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::BoConfig;
use crate::errors::{BoError, Result};
use crate::session::action::BoAction;
use crate::session::transport::{BoTransport, BoWsTransport};
use crate::wire::{render_pretty, BoPayload, BoRequestFrame};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoSessionOptions {
    pub quiet: bool,
    pub timed: bool,
    pub handle: bool,
    pub workspace: Option<String>,
    pub keepalive: Duration,
    pub write_wait: Duration,
}

impl From<&BoConfig> for BoSessionOptions {
    fn from(config: &BoConfig) -> Self {
        BoSessionOptions {
            quiet: config.quiet,
            timed: config.timed,
            handle: config.handle,
            workspace: config.workspace.clone(),
            keepalive: config.keepalive_interval(),
            write_wait: config.write_wait(),
        }
    }
}

/// Lifecycle of a connected session. Dialing happens inside
/// [`BoSession::connect`]; a session value only exists once it succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoSessionState {
    Ready,
    AwaitingResponse,
    PageLoop,
    Closed,
}

/// Summary of one request and its responses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoExchange {
    pub action: BoAction,
    /// Response frames read.
    pub frames: usize,
    /// Values rendered to the output.
    pub items: usize,
    pub elapsed: Duration,
}

pub struct BoSession<T, W> {
    transport: T,
    out: W,
    options: BoSessionOptions,
    state: BoSessionState,
    last_activity: Instant,
    keepalives: u64,
}

impl<W: Write + Send> BoSession<BoWsTransport, W> {
    /// Dials `ws://<host>:<port>/exec`.
    pub async fn connect(config: &BoConfig, out: W) -> Result<Self> {
        config.validate()?;
        let transport = BoWsTransport::connect(&config.exec_url()).await?;
        Ok(BoSession::new(transport, out, BoSessionOptions::from(config)))
    }
}

impl<T: BoTransport, W: Write + Send> BoSession<T, W> {
    pub fn new(transport: T, out: W, options: BoSessionOptions) -> Self {
        BoSession {
            transport,
            out,
            options,
            state: BoSessionState::Ready,
            last_activity: Instant::now(),
            keepalives: 0,
        }
    }

    pub fn state(&self) -> BoSessionState {
        self.state
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn keepalives_sent(&self) -> u64 {
        self.keepalives
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// The request frame a statement is sent as.
    pub fn request_for(&self, stmt: &str, action: BoAction) -> BoRequestFrame {
        let frame = match action {
            BoAction::FetchNow => BoRequestFrame::new(stmt).with_handle(self.options.handle),
            BoAction::Default | BoAction::Scan => BoRequestFrame::new(stmt),
        };
        frame.with_workspace(self.options.workspace.as_deref())
    }

    /// Sends one statement and renders every response frame it produces.
    ///
    /// A failed send returns the transport error and leaves the session
    /// ready. Any failure after the request went out closes the session.
    pub async fn execute(&mut self, stmt: &str) -> Result<BoExchange> {
        if self.state == BoSessionState::Closed {
            return Err(BoError::fatal("execute", "session is closed"));
        }
        let started = Instant::now();
        let action = BoAction::classify(stmt);
        let frame = self.request_for(stmt, action);

        self.state = BoSessionState::AwaitingResponse;
        if let Err(e) = self.transport.send(&frame).await {
            self.state = BoSessionState::Ready;
            return Err(e);
        }
        self.last_activity = Instant::now();

        let drained = if action.is_paged(self.options.handle) {
            self.page_loop().await
        } else {
            self.single().await
        };

        match drained {
            Ok((frames, items)) => {
                self.state = BoSessionState::Ready;
                Ok(BoExchange {
                    action,
                    frames,
                    items,
                    elapsed: started.elapsed(),
                })
            }
            Err(e) => {
                self.shutdown().await;
                if e.is_fatal() {
                    Err(e)
                } else {
                    Err(BoError::fatal("read", e.to_string()))
                }
            }
        }
    }

    async fn single(&mut self) -> Result<(usize, usize)> {
        let value = self.transport.recv().await?;
        self.last_activity = Instant::now();
        self.render(&value)?;
        Ok((1, 1))
    }

    async fn page_loop(&mut self) -> Result<(usize, usize)> {
        self.state = BoSessionState::PageLoop;
        let mut frames = 0;
        let mut items = 0;
        loop {
            let value = self.transport.recv().await?;
            self.last_activity = Instant::now();
            frames += 1;
            match BoPayload::probe(value) {
                BoPayload::Paged(page) => {
                    for item in &page.items {
                        self.render(item)?;
                    }
                    items += page.items.len();
                    if !page.has_more() {
                        break;
                    }
                }
                BoPayload::Opaque(value) => {
                    self.render(&value)?;
                    items += 1;
                    break;
                }
            }
        }
        Ok((frames, items))
    }

    fn render(&mut self, value: &Value) -> Result<()> {
        let text = render_pretty(value)?;
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Writes a keepalive if no exchange is in flight. Failures are logged.
    pub async fn keepalive(&mut self) {
        if self.state != BoSessionState::Ready {
            return;
        }
        match self.transport.keepalive(self.options.write_wait).await {
            Ok(()) => self.keepalives += 1,
            Err(e) => log::warn!("{}", e),
        }
    }

    async fn shutdown(&mut self) {
        if self.state != BoSessionState::Closed {
            self.transport.close().await;
            self.state = BoSessionState::Closed;
        }
    }

    /// Runs until operator input ends (`Ok`) or the connection fails.
    ///
    /// Each finished exchange reports its elapsed time on `acks` so the
    /// prompt can print it and read the next line.
    pub async fn run(
        &mut self,
        mut lines: mpsc::Receiver<String>,
        acks: mpsc::Sender<Duration>,
    ) -> Result<()> {
        let period = self.options.keepalive.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                line = lines.recv() => {
                    let line = match line {
                        Some(line) => line,
                        None => {
                            self.shutdown().await;
                            return Ok(());
                        }
                    };
                    let started = Instant::now();
                    let elapsed = match self.execute(&line).await {
                        Ok(exchange) => exchange.elapsed,
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            if !self.options.quiet {
                                writeln!(self.out, "{}", e)?;
                            }
                            started.elapsed()
                        }
                    };
                    if acks.send(elapsed).await.is_err() {
                        log::debug!("prompt is gone");
                    }
                }
                _ = ticker.tick() => self.keepalive().await,
            }
        }
    }
}
