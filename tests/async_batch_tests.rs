//! Tests for concurrent batch conversion

#![cfg(feature = "async")]

mod common;

use common::{dbc_container, dbf_header, encode_literals};
use dbc2dbf::{AsyncBatchConverter, CompressionMode, DbcError, DictionarySize};
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn test_convert_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir)?;

    let mut inputs = Vec::new();
    for i in 0..8u8 {
        let path = dir.path().join(format!("FILE{i}.dbc"));
        let body = vec![b'a' + i; 100 + i as usize];
        let payload = encode_literals(CompressionMode::Binary, DictionarySize::Size4K, &body);
        fs::write(&path, dbc_container(&dbf_header(33), i as u32, &payload))?;
        inputs.push(path);
    }

    let converter = AsyncBatchConverter::new()
        .with_concurrency(3)
        .with_output_dir(&out_dir);
    let outcomes = converter.convert_files(inputs.clone()).await;

    assert_eq!(outcomes.len(), 8);
    for outcome in outcomes {
        let report = outcome.result?;
        let i = report.checksum as u8;
        assert_eq!(outcome.output, out_dir.join(format!("FILE{i}.dbf")));

        let written = fs::read(&outcome.output)?;
        assert_eq!(written.len(), 33 + 100 + i as usize);
        assert!(written[33..].iter().all(|&b| b == b'a' + i));
    }
    Ok(())
}

#[tokio::test]
async fn test_failures_do_not_stop_batch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let good = dir.path().join("good.dbc");
    let bad = dir.path().join("bad.dbc");
    let missing = dir.path().join("missing.dbc");

    let payload = encode_literals(CompressionMode::Ascii, DictionarySize::Size1K, b"ok");
    fs::write(&good, dbc_container(&dbf_header(12), 0, &payload))?;
    fs::write(&bad, dbc_container(&dbf_header(12), 0, &[5, 4, 0, 0]))?;

    let outcomes = AsyncBatchConverter::default()
        .convert_files(vec![good.clone(), bad.clone(), missing.clone()])
        .await;
    assert_eq!(outcomes.len(), 3);

    for outcome in outcomes {
        if outcome.input == good {
            assert!(outcome.result.is_ok());
            assert_eq!(outcome.output, dir.path().join("good.dbf"));
        } else if outcome.input == bad {
            assert!(matches!(outcome.result, Err(DbcError::BadLiteralFlag(5))));
        } else {
            assert_eq!(outcome.input, missing);
            assert!(matches!(outcome.result, Err(DbcError::File { .. })));
        }
    }
    Ok(())
}
