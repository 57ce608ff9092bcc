//! End to end tests of the scanner command over a mock chain.

use alloy_primitives::{address, bytes, Address};
use clap::Parser;
use commit_scanner::{args::OutputArgs, output::OutputFormat, scan, ScannerArgs};
use commit_scanner_watcher::{
    test_utils::{block, commitment_calldata, empty_block, provider::MockProvider},
    ScannerError,
};

const TIMELOCK: Address = address!("0xeacf0411de906bdd8f2576692486383797d06004");

fn provider() -> MockProvider {
    MockProvider::new(vec![
        empty_block(0),
        block(1, vec![(TIMELOCK, commitment_calldata("blob-1"))]),
        empty_block(2),
        block(3, vec![(TIMELOCK, commitment_calldata("blob-3"))]),
    ])
}

#[tokio::test]
async fn test_should_write_commitments_as_json_lines() -> eyre::Result<()> {
    // Given
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("commitments.jsonl");
    let args = ScannerArgs::try_parse_from([
        "commit-scanner",
        "--scan.target",
        "0xEACF0411DE906BDD8F2576692486383797D06004",
    ])?;
    let output = OutputArgs { format: OutputFormat::Json, path: Some(path.clone()) };

    // When
    let outcome = scan(provider(), args.scanner_config()?, output.writer()?).await?;

    // Then
    assert_eq!(outcome.commitments, 2);
    let written = std::fs::read_to_string(path)?;
    let commitments = written
        .lines()
        .map(serde_json::from_str::<serde_json::Value>)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(commitments.len(), 2);
    assert_eq!(commitments[0]["commitment"], "blob-1");
    assert_eq!(commitments[0]["block_number"], 1);
    assert_eq!(commitments[1]["commitment"], "blob-3");

    Ok(())
}

#[tokio::test]
async fn test_should_succeed_without_commitments() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("commitments.txt");
    let args = ScannerArgs::try_parse_from([
        "commit-scanner",
        "--scan.target",
        "0x0000000000000000000000000000000000000001",
    ])?;
    let output = OutputArgs { format: OutputFormat::Text, path: Some(path.clone()) };

    let outcome = scan(provider(), args.scanner_config()?, output.writer()?).await?;

    assert_eq!(outcome.commitments, 0);
    assert_eq!(outcome.blocks_scanned, 4);
    assert!(std::fs::read_to_string(path)?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_should_write_bare_commitments_as_text() -> eyre::Result<()> {
    // Given
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("commitments.txt");
    let args = ScannerArgs::try_parse_from([
        "commit-scanner",
        "--scan.target",
        "0xeacf0411de906bdd8f2576692486383797d06004",
    ])?;

    // When
    let output = OutputArgs { format: args.output.format, path: Some(path.clone()) };
    scan(provider(), args.scanner_config()?, output.writer()?).await?;

    // Then
    assert_eq!(args.output.format, OutputFormat::Text);
    assert_eq!(std::fs::read_to_string(path)?, "blob-1\nblob-3\n");

    Ok(())
}

#[tokio::test]
async fn test_should_fail_on_malformed_calldata() -> eyre::Result<()> {
    // Given
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("commitments.txt");
    let provider = MockProvider::new(vec![
        empty_block(0),
        block(1, vec![(TIMELOCK, commitment_calldata("blob-1"))]),
        block(2, vec![(TIMELOCK, bytes!("6edd4f1200"))]),
        block(3, vec![(TIMELOCK, commitment_calldata("blob-3"))]),
    ]);
    let args = ScannerArgs::try_parse_from([
        "commit-scanner",
        "--scan.target",
        "0xeacf0411de906bdd8f2576692486383797d06004",
    ])?;
    let output = OutputArgs { format: OutputFormat::Text, path: Some(path.clone()) };

    // When
    let err = scan(provider, args.scanner_config()?, output.writer()?).await.unwrap_err();

    // Then
    let Some(ScannerError::MalformedCalldata { location, .. }) = err.downcast_ref() else {
        eyre::bail!("expected malformed calldata, got {err:?}")
    };
    assert_eq!(location.block_number, 2);
    assert_eq!(std::fs::read_to_string(path)?, "blob-1\n");

    Ok(())
}
