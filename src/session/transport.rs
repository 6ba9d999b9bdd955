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

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::errors::{BoError, Result};
use crate::wire::BoRequestFrame;

/// Duplex message channel to the daemon.
///
/// Failures on `send` and `keepalive` are [`BoError::Transport`] and leave the
/// connection usable; failures on `recv` are [`BoError::Fatal`].
#[async_trait]
pub trait BoTransport: Send {
    async fn send(&mut self, frame: &BoRequestFrame) -> Result<()>;

    /// Next response frame as raw JSON.
    async fn recv(&mut self) -> Result<Value>;

    /// Empty pong control frame, abandoned after `deadline`.
    async fn keepalive(&mut self, deadline: Duration) -> Result<()>;

    async fn close(&mut self);
}

type BoWsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct BoWsTransport {
    ws: BoWsStream,
}

impl BoWsTransport {
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| BoError::fatal("connect", format!("{}: {}", url, e)))?;
        log::debug!("session connected to {}", url);
        Ok(BoWsTransport { ws })
    }
}

fn decode(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes)
        .map_err(|e| BoError::fatal("read", format!("malformed response frame: {}", e)))
}

#[async_trait]
impl BoTransport for BoWsTransport {
    async fn send(&mut self, frame: &BoRequestFrame) -> Result<()> {
        let payload = serde_json::to_string(frame)?;
        self.ws
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| BoError::transport(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Value> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return decode(text.as_bytes()),
                Some(Ok(Message::Binary(data))) => return decode(&data),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| format!("{} {}", u16::from(f.code), f.reason))
                        .unwrap_or_else(|| "no close frame".to_string());
                    return Err(BoError::fatal("read", format!("connection closed: {}", reason)));
                }
                Some(Err(e)) => return Err(BoError::fatal("read", e.to_string())),
                None => return Err(BoError::fatal("read", "connection closed")),
            }
        }
    }

    async fn keepalive(&mut self, deadline: Duration) -> Result<()> {
        match tokio::time::timeout(deadline, self.ws.send(Message::Pong(Bytes::new()))).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BoError::transport(format!("keepalive: {}", e))),
            Err(_) => Err(BoError::transport(format!(
                "keepalive not written within {:?}",
                deadline
            ))),
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            log::debug!("closing session: {}", e);
        }
    }
}
