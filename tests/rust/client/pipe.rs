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

//! # Bosh Client Tests - Request Streamer and Script Upload
//!
//! Bulk loads against a throwaway HTTP listener that decodes the streamed
//! request body, plus dry runs and failure paths.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test pipe
//! ```

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use bosh::{
    upload_script, BoColumnSpec, BoColumnType, BoConfig, BoConfigBuilder, BoCsvDialect,
    BoError, BoInput, BoRequestFrame, BoRequestStreamer, BoStatementLog, BoTableSchema,
};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn frames(&self) -> Vec<BoRequestFrame> {
        self.body
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).unwrap())
            .collect()
    }
}

/// Accepts one HTTP/1.1 request, reads its whole body and answers with
/// `status` and `reply`.
async fn serve_once(status: &'static str, reply: &'static str) -> (u16, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut stream = BufReader::new(stream);

        let mut request_line = String::new();
        stream.read_line(&mut request_line).await.unwrap();
        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            stream.read_line(&mut line).await.unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.push((k.trim().to_ascii_lowercase(), v.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .map(|(_, v)| v.parse::<usize>().unwrap());
        let chunked = headers
            .iter()
            .any(|(k, v)| k == "transfer-encoding" && v.eq_ignore_ascii_case("chunked"));

        let mut body = Vec::new();
        if let Some(length) = length {
            body.resize(length, 0);
            stream.read_exact(&mut body).await.unwrap();
        } else if chunked {
            loop {
                let mut size = String::new();
                stream.read_line(&mut size).await.unwrap();
                let size = usize::from_str_radix(size.trim().split(';').next().unwrap(), 16).unwrap();
                if size == 0 {
                    let mut trailer = String::new();
                    stream.read_line(&mut trailer).await.unwrap();
                    break;
                }
                let mut chunk = vec![0; size + 2];
                stream.read_exact(&mut chunk).await.unwrap();
                body.extend_from_slice(&chunk[..size]);
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reply.len(),
            reply
        );
        let stream = stream.get_mut();
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;

        Captured {
            request_line,
            headers,
            body,
        }
    });
    (port, handle)
}

fn config(port: u16, batch_size: usize) -> BoConfig {
    BoConfigBuilder::new()
        .host("127.0.0.1")
        .port(port)
        .batch_size(batch_size)
        .build()
}

fn schema() -> BoTableSchema {
    BoTableSchema::new("sales", BoCsvDialect::default()).with_columns(vec![
        BoColumnSpec::new("id", BoColumnType::Int).with_key(),
        BoColumnSpec::new("name", BoColumnType::String),
    ])
}

fn rows(n: usize) -> Cursor<String> {
    Cursor::new((0..n).map(|i| format!("{},name{}\n", i, i)).collect())
}

/// Tests a full load against a live listener, leading DDL included.
#[tokio::test]
async fn test_streams_frames_over_http() {
    let (port, server) = serve_once("200 OK", "ok").await;
    let report = BoRequestStreamer::new(config(port, 10), schema())
        .with_create(true)
        .with_truncate(true)
        .load_reader(rows(25))
        .await
        .unwrap();
    let captured = server.await.unwrap();

    assert!(captured.request_line.starts_with("POST /cmd/pipe "));
    assert_eq!(captured.header("content-type"), Some("application/json"));

    let frames = captured.frames();
    assert_eq!(frames.len(), 5);
    assert!(frames[0].stmt.starts_with("CREATE TABLE sales ("));
    assert_eq!(frames[1].stmt, "TRIM sales to 0");
    assert!(frames[2].stmt.starts_with("INSERT INTO sales VALUES (\"0\",\"name0\")"));
    assert!(frames[4].stmt.ends_with("(\"24\",\"name24\")"));

    assert_eq!(report.frames, 5);
    assert_eq!(report.rows, 25);
    assert_eq!(report.bytes, captured.body.len() as u64);
    assert_eq!(report.status, Some(200));
    assert_eq!(report.source.records, 25);
}

/// Tests that a dry run drains locally and logs every statement.
#[tokio::test]
async fn test_dry_run_touches_no_network() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = Arc::clone(&seen);
        BoStatementLog::custom(Arc::new(move |s: &str| seen.lock().unwrap().push(s.to_string())))
    };
    let mut config = config(1, 10_000);
    config.debug = true;

    let report = BoRequestStreamer::new(config, schema())
        .with_sink(sink)
        .load_reader(rows(10_001))
        .await
        .unwrap();

    assert_eq!(report.status, None);
    assert_eq!(report.frames, 2);
    assert_eq!(report.rows, 10_001);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], "INSERT INTO sales VALUES (\"10000\",\"name10000\")");
}

/// Tests that an error status from the daemon is fatal.
#[tokio::test]
async fn test_error_status_is_fatal() {
    let (port, server) = serve_once("500 Internal Server Error", "boom").await;
    let err = BoRequestStreamer::new(config(port, 10), schema())
        .load_reader(rows(3))
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(err.is_fatal());
    match err {
        BoError::Http { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

/// Tests that an unreachable daemon is fatal.
#[tokio::test]
async fn test_connection_refused_is_fatal() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = BoRequestStreamer::new(config(port, 10), schema())
        .load_reader(rows(100))
        .await
        .unwrap_err();
    assert!(matches!(err, BoError::Fatal { .. }));
}

/// Tests that a load without a destination table is rejected up front.
#[tokio::test]
async fn test_missing_table_is_rejected() {
    let nameless = BoTableSchema::new("", BoCsvDialect::default());
    let err = BoRequestStreamer::new(config(1, 10), nameless)
        .load(&BoInput::Stdin)
        .await
        .unwrap_err();
    assert!(matches!(err, BoError::Config { .. }));
}

/// Tests script upload with a content type taken from the suffix.
#[tokio::test]
async fn test_script_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load.lua.gz");
    std::fs::write(&path, b"\x1f\x8bpayload").unwrap();

    let (port, server) = serve_once("200 OK", "script accepted").await;
    let reply = upload_script(&config(port, 10), &path).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(reply, "script accepted");
    assert!(captured.request_line.starts_with("POST /script/load.lua.gz "));
    assert_eq!(captured.header("content-type"), Some("application/gzip"));
    assert_eq!(captured.body, b"\x1f\x8bpayload");
}

/// Tests that a missing script is a configuration error.
#[tokio::test]
async fn test_missing_script() {
    let dir = tempfile::tempdir().unwrap();
    let err = upload_script(&config(1, 10), dir.path().join("nope.lua"))
        .await
        .unwrap_err();
    assert!(matches!(err, BoError::Config { .. }));
}
