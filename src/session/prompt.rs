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

use std::io::{BufRead, BufReader, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::mpsc;

pub const PROMPT: &str = "bosh>> ";

/// Operator input read on a dedicated thread.
///
/// The thread prompts, reads one non-blank line, hands it to the session and
/// then waits for the exchange's elapsed time before prompting again. End of
/// input closes the line channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoPrompt {
    pub quiet: bool,
    pub timed: bool,
}

pub struct BoPromptChannels {
    pub lines: mpsc::Receiver<String>,
    pub acks: mpsc::Sender<Duration>,
    pub thread: JoinHandle<()>,
}

impl BoPrompt {
    pub fn new(quiet: bool, timed: bool) -> Self {
        BoPrompt { quiet, timed }
    }

    pub fn spawn<R, W>(self, input: R, out: W) -> BoPromptChannels
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let (line_tx, lines) = mpsc::channel::<String>(1);
        let (acks, mut ack_rx) = mpsc::channel::<Duration>(1);
        let thread = thread::spawn(move || {
            let mut out = out;
            let mut input = input.lines();
            let mut cost = Duration::ZERO;
            loop {
                if self.timed && cost > Duration::ZERO {
                    let _ = writeln!(out, "Operation time: {:?}", cost);
                }
                let line = loop {
                    if !self.quiet {
                        let _ = write!(out, "{}", PROMPT);
                        let _ = out.flush();
                    }
                    match input.next() {
                        Some(Ok(line)) if line.trim().is_empty() => continue,
                        Some(Ok(line)) => break Some(line),
                        Some(Err(e)) => {
                            log::warn!("reading input: {}", e);
                            break None;
                        }
                        None => break None,
                    }
                };
                let line = match line {
                    Some(line) => line,
                    None => return,
                };
                if line_tx.blocking_send(line).is_err() {
                    return;
                }
                cost = match ack_rx.blocking_recv() {
                    Some(cost) => cost,
                    None => return,
                };
            }
        });
        BoPromptChannels {
            lines,
            acks,
            thread,
        }
    }

    pub fn spawn_stdin(self) -> BoPromptChannels {
        self.spawn(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}
