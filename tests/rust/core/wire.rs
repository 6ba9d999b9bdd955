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

//! # Bosh Core Tests - Wire Types
//!
//! Request encoding and response probing.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test wire
//! ```

use bosh::wire::{render_pretty, BoPage};
use bosh::{BoPayload, BoRequestFrame, BoResponseFrame};
use serde_json::{json, Value};

/// Tests the request envelope with and without options.
#[test]
fn test_request_encoding() {
    let plain = BoRequestFrame::new("SCAN t");
    assert_eq!(
        serde_json::to_value(&plain).unwrap(),
        json!({"Stmt": "SCAN t", "Workspace": ""})
    );

    let fetch = BoRequestFrame::new("SELECT * FROM t")
        .with_handle(true)
        .with_workspace(Some("ws"));
    assert_eq!(
        serde_json::to_value(&fetch).unwrap(),
        json!({"Stmt": "SELECT * FROM t", "Workspace": "ws", "Opts": {"Handle": true}})
    );
}

/// Tests that encoded frames are single lines even with embedded newlines.
#[test]
fn test_encode_line() {
    let frame = BoRequestFrame::new("INSERT INTO t VALUES (\"a\nb\")");
    let line = frame.encode_line().unwrap();
    assert_eq!(line.last(), Some(&b'\n'));
    assert_eq!(line.iter().filter(|b| **b == b'\n').count(), 1);

    let decoded: BoRequestFrame = serde_json::from_slice(&line).unwrap();
    assert_eq!(decoded, frame);
}

/// Tests probing of paged, final and non-paged frames.
#[test]
fn test_probe() {
    let page = BoPayload::probe(json!({"Content": {"content": [1, 2], "index": 3}, "Status": 0}));
    assert_eq!(
        page,
        BoPayload::Paged(BoPage {
            items: vec![json!(1), json!(2)],
            index: 3
        })
    );

    match BoPayload::probe(json!({"Content": {"content": [], "index": 0}})) {
        BoPayload::Paged(page) => assert!(!page.has_more()),
        other => panic!("expected final page, got {:?}", other),
    }

    let cases = vec![
        json!({"Status": 0, "Err": ""}),
        json!({"Content": null, "Status": -1, "Err": "no such table"}),
        json!({"Content": "created"}),
        json!({"Content": {"content": "x", "index": 1}}),
        json!({"Content": {"rows": []}}),
        json!([1, 2, 3]),
    ];
    for frame in cases {
        assert_eq!(BoPayload::probe(frame.clone()), BoPayload::Opaque(frame));
    }
}

/// Tests the response envelope accessors.
#[test]
fn test_response_frame() {
    let frame: BoResponseFrame =
        serde_json::from_value(json!({"Status": -1, "Err": "no such table"})).unwrap();
    assert_eq!(frame.status(), Some(-1));
    assert_eq!(frame.error(), Some("no such table"));
    assert!(frame.content.is_none());

    let frame: BoResponseFrame = serde_json::from_value(json!({"Err": ""})).unwrap();
    assert_eq!(frame.error(), None);
}

/// Tests the pretty renderer on nested values.
#[test]
fn test_render_pretty() {
    let value: Value = json!({"id": 1, "tags": ["a"]});
    assert_eq!(
        render_pretty(&value).unwrap(),
        "{\n    \"id\": 1,\n    \"tags\": [\n        \"a\"\n    ]\n}"
    );
}
