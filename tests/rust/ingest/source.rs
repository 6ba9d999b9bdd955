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

//! # Bosh Ingest Tests - Record Source
//!
//! Decoding of delimited text into records: dialect handling, skipping,
//! malformed input, date normalization and the bounded producer channel.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test source
//! ```

use std::io::Cursor;
use std::sync::Arc;

use bosh::ingest::{BoInput, BoRecordReader, BoRecordSource};
use bosh::{BoColumnSpec, BoColumnType, BoCsvDialect, BoError, BoTableSchema};
use proptest::prelude::*;

fn schema(dialect: BoCsvDialect) -> BoTableSchema {
    BoTableSchema::new("sales", dialect)
}

fn read_all(text: &str, schema: &BoTableSchema) -> Vec<Vec<String>> {
    BoRecordReader::new(Cursor::new(text.to_string()), schema)
        .unwrap()
        .map(|r| r.into_fields())
        .collect()
}

/// Tests that fields arrive in input order with leading space trimmed.
#[test]
fn test_field_order_and_trim() {
    let rows = read_all("1, alpha ,x\n2,  beta,y\n", &schema(BoCsvDialect::default()));
    assert_eq!(rows, vec![vec!["1", "alpha ", "x"], vec!["2", "beta", "y"]]);

    let dialect = BoCsvDialect {
        trim_leading_space: false,
        ..BoCsvDialect::default()
    };
    let rows = read_all("1, alpha\n", &schema(dialect));
    assert_eq!(rows, vec![vec!["1", " alpha"]]);
}

/// Tests that trimming happens before an opening quote is recognized.
#[test]
fn test_trim_before_opening_quote() {
    let rows = read_all("a, \"b,c\"\n1,  \"x\"\"y\", z\n", &schema(BoCsvDialect::default()));
    assert_eq!(rows, vec![vec!["a", "b,c"], vec!["1", "x\"y", "z"]]);

    let rows = read_all("1, \" padded\"\n", &schema(BoCsvDialect::default()));
    assert_eq!(rows, vec![vec!["1", " padded"]]);
}

/// Tests that strict quoting drops records with bare or trailing quotes.
#[test]
fn test_strict_quotes_skip_offending_records() {
    let dialect = BoCsvDialect {
        lazy_quotes: false,
        ..BoCsvDialect::default()
    };
    let schema = schema(dialect);
    let text = "1,ok\n2,a\"b\n3,\"q\"x\n4,\"multi\nline\"\n5,\"open\n";
    let mut reader = BoRecordReader::new(Cursor::new(text), &schema).unwrap();
    let rows: Vec<_> = reader.by_ref().map(|r| r.into_fields()).collect();
    assert_eq!(rows, vec![vec!["1", "ok"], vec!["4", "multi\nline"]]);
    assert_eq!(reader.stats().malformed, 3);
    assert_eq!(reader.stats().records, 2);
}

/// Tests that skipped lines are dropped even when malformed.
#[test]
fn test_skip_leading_records() {
    let dialect = BoCsvDialect {
        skip_lines: 2,
        fields: 2,
        ..BoCsvDialect::default()
    };
    let schema = schema(dialect);
    let mut reader =
        BoRecordReader::new(Cursor::new("header,a,b\nunits\n1,2\n3,4\n"), &schema).unwrap();
    let rows: Vec<_> = reader.by_ref().map(|r| r.into_fields()).collect();
    assert_eq!(rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    assert_eq!(reader.stats().skipped, 2);
    assert_eq!(reader.stats().malformed, 0);
}

/// Tests that a skip count past the end only counts records that existed.
#[test]
fn test_skip_past_end_of_input() {
    let dialect = BoCsvDialect {
        skip_lines: 5,
        ..BoCsvDialect::default()
    };
    let schema = schema(dialect);
    let mut reader = BoRecordReader::new(Cursor::new("1,a\n2,b\n"), &schema).unwrap();
    assert!(reader.next().is_none());
    assert_eq!(reader.stats().skipped, 2);
}

/// Tests comment lines and a custom separator.
#[test]
fn test_comment_and_separator() {
    let dialect = BoCsvDialect {
        separator: ";".into(),
        comment: "%".into(),
        ..BoCsvDialect::default()
    };
    let rows = read_all("% generated\n1;a\n%2;b\n3;c\n", &schema(dialect));
    assert_eq!(rows, vec![vec!["1", "a"], vec!["3", "c"]]);
}

/// Tests that a field-count mismatch skips only the offending record.
#[test]
fn test_width_mismatch_is_skipped() {
    let dialect = BoCsvDialect {
        fields: 0,
        ..BoCsvDialect::default()
    };
    let schema = schema(dialect);
    let mut reader = BoRecordReader::new(Cursor::new("1,a\n2,b,extra\n3\n4,d\n"), &schema).unwrap();
    let rows: Vec<_> = reader.by_ref().map(|r| r.into_fields()).collect();
    assert_eq!(rows, vec![vec!["1", "a"], vec!["4", "d"]]);
    assert_eq!(reader.stats().malformed, 2);
    assert_eq!(reader.stats().records, 2);
}

/// Tests that invalid UTF-8 is reported as malformed and reading continues.
#[test]
fn test_invalid_utf8_is_skipped() {
    let schema = schema(BoCsvDialect::default());
    let bytes = b"1,ok\n2,\xff\xfe\n3,fine\n".to_vec();
    let mut reader = BoRecordReader::new(Cursor::new(bytes), &schema).unwrap();
    let rows: Vec<_> = reader.by_ref().map(|r| r.into_fields()).collect();
    assert_eq!(rows, vec![vec!["1", "ok"], vec!["3", "fine"]]);
    assert_eq!(reader.stats().malformed, 1);
}

/// Tests that stray quotes inside a field are read literally.
#[test]
fn test_lazy_quotes() {
    let rows = read_all("1,say \"hi\" now\n", &schema(BoCsvDialect::default()));
    assert_eq!(rows, vec![vec!["1", "say \"hi\" now"]]);
}

/// Tests date conversion, raw fallback and record line numbers.
#[test]
fn test_date_columns_are_normalized() {
    let schema = schema(BoCsvDialect::default()).with_columns(vec![
        BoColumnSpec::new("id", BoColumnType::Int),
        BoColumnSpec::new("day", BoColumnType::Date).with_datefmt("%m/%d/%Y"),
    ]);
    let mut reader =
        BoRecordReader::new(Cursor::new("1,01/31/2024\n2,someday\n3,\n"), &schema).unwrap();
    let records: Vec<_> = reader.by_ref().collect();

    assert_eq!(records[0].fields, vec!["1", "2024-01-31 00:00:00"]);
    assert_eq!(records[1].fields, vec!["2", "someday"]);
    assert_eq!(records[2].fields, vec!["3", ""]);
    assert_eq!(records[1].line, 2);
    assert_eq!(reader.stats().date_failures, 1);
}

/// Tests that a bad separator is rejected before reading.
#[test]
fn test_multi_character_separator_is_rejected() {
    let dialect = BoCsvDialect {
        separator: "||".into(),
        ..BoCsvDialect::default()
    };
    let err = BoRecordReader::new(Cursor::new(""), &schema(dialect)).err().unwrap();
    assert!(matches!(err, BoError::Schema { .. }));
}

/// Tests input argument parsing.
#[test]
fn test_input_from_arg() {
    assert_eq!(BoInput::from_arg("-").unwrap(), BoInput::Stdin);
    assert!(matches!(BoInput::from_arg("a.csv").unwrap(), BoInput::Path(_)));
    assert!(matches!(BoInput::from_arg(""), Err(BoError::Config { .. })));
}

/// Tests the async source end to end through a small channel.
#[tokio::test]
async fn test_spawned_source_delivers_everything() {
    let text: String = (0..500).map(|i| format!("{},row{}\n", i, i)).collect();
    let source = BoRecordSource::new(Arc::new(schema(BoCsvDialect::default())), 4);
    let mut stream = source.spawn(Cursor::new(text)).unwrap();

    let mut seen = 0u64;
    while let Some(record) = stream.recv().await {
        assert_eq!(record.fields[0], seen.to_string());
        seen += 1;
    }
    let stats = stream.finish().await;
    assert_eq!(seen, 500);
    assert_eq!(stats.records, 500);
}

/// Tests that dropping the consumer early stops the producer cleanly.
#[tokio::test]
async fn test_early_finish_stops_producer() {
    let text: String = (0..10_000).map(|i| format!("{}\n", i)).collect();
    let source = BoRecordSource::new(Arc::new(schema(BoCsvDialect::default())), 2);
    let mut stream = source.spawn(Cursor::new(text)).unwrap();
    assert!(stream.recv().await.is_some());
    let stats = stream.finish().await;
    assert!(stats.records < 10_000);
}

/// Tests that a missing file is a configuration error.
#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = BoRecordSource::new(Arc::new(schema(BoCsvDialect::default())), 8);
    let err = source
        .open(&BoInput::Path(dir.path().join("absent.csv")))
        .err()
        .unwrap();
    assert!(matches!(err, BoError::Config { .. }));
}

/// Tests reading from a real file.
#[tokio::test]
async fn test_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    std::fs::write(&path, "1,a\n2,b\n").unwrap();
    let source = BoRecordSource::new(Arc::new(schema(BoCsvDialect::default())), 8);
    let mut stream = source.open(&BoInput::Path(path)).unwrap();
    let mut count = 0;
    while stream.recv().await.is_some() {
        count += 1;
    }
    assert_eq!(count, 2);
}

proptest! {
    /// Emitted records equal total minus skipped minus malformed, in order.
    #[test]
    fn test_record_count_property(
        shapes in prop::collection::vec(any::<bool>(), 0..60),
        skip in 0u64..10,
    ) {
        let text: String = shapes
            .iter()
            .enumerate()
            .map(|(i, bad)| if *bad { format!("{},v,extra\n", i) } else { format!("{},v\n", i) })
            .collect();
        let dialect = BoCsvDialect { skip_lines: skip, fields: 2, ..BoCsvDialect::default() };
        let schema = schema(dialect);
        let mut reader = BoRecordReader::new(Cursor::new(text), &schema).unwrap();
        let out: Vec<_> = reader.by_ref().map(|r| r.into_fields()).collect();

        let skipped = (skip as usize).min(shapes.len());
        let malformed = shapes[skipped..].iter().filter(|bad| **bad).count();
        prop_assert_eq!(out.len(), shapes.len() - skipped - malformed);
        prop_assert_eq!(reader.stats().skipped, skipped as u64);
        prop_assert_eq!(reader.stats().malformed, malformed as u64);

        let expected: Vec<String> = (skipped..shapes.len())
            .filter(|i| !shapes[*i])
            .map(|i| i.to_string())
            .collect();
        let ids: Vec<String> = out.iter().map(|row| row[0].clone()).collect();
        prop_assert_eq!(ids, expected);
    }
}
