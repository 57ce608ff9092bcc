//! Persisted scan progress.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::ScannerConfig;

use alloy_primitives::Address;
use commit_scanner_primitives::{BlockRange, FunctionSelector};
use serde::{Deserialize, Serialize};

/// The progress of a scan. A checkpoint only applies to a scan of the same target, schema, field
/// path and first block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The scanned contract.
    pub target: Address,
    /// The scanned selector.
    pub selector: FunctionSelector,
    /// The signature of the decoded function.
    pub signature: String,
    /// The path of the commitment bytes in the decoded calldata.
    pub field_path: String,
    /// The first block of the scanned range.
    pub from_block: u64,
    /// The last block fully processed.
    pub last_processed_block: u64,
}

impl Checkpoint {
    /// Returns a new [`Checkpoint`] for the scan described by the configuration.
    pub fn new(config: &ScannerConfig, last_processed_block: u64) -> Self {
        Self {
            target: config.target.address,
            selector: config.target.selector,
            signature: config.decoder.schema().signature(),
            field_path: config.decoder.path().to_string(),
            from_block: config.from_block,
            last_processed_block,
        }
    }

    /// Returns true if the checkpoint was written by a scan with the same configuration.
    pub fn matches(&self, config: &ScannerConfig) -> bool {
        self.target == config.target.address &&
            self.selector == config.target.selector &&
            self.from_block == config.from_block &&
            self.signature == config.decoder.schema().signature() &&
            self.field_path == config.decoder.path().to_string()
    }

    /// Returns true if the scan of `range` can resume after the checkpoint, i.e. the last
    /// processed block lies in the range. A checkpoint at the end of the range resumes into an
    /// empty range.
    pub const fn resumes(&self, range: &BlockRange) -> bool {
        self.last_processed_block >= range.start && self.last_processed_block <= range.end
    }
}

/// An error occurring while loading or persisting a [`Checkpoint`].
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    /// The checkpoint file could not be accessed.
    #[error("checkpoint io error at {path}: {source}")]
    Io {
        /// The path of the checkpoint file.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
    /// The checkpoint file does not hold a valid checkpoint.
    #[error("invalid checkpoint: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stores a [`Checkpoint`] as JSON in a file.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    /// Returns a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the checkpoint, returning `None` if the file does not exist.
    pub async fn load(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Persists the checkpoint. The file is replaced atomically, a crash never leaves a
    /// partially written checkpoint.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let raw = serde_json::to_vec_pretty(checkpoint)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, raw).await.map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|source| self.io_error(source))?;
        tracing::trace!(target: "commit_scanner::watcher", path = %self.path.display(), ?checkpoint, "saved checkpoint");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_else(OsString::new);
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> CheckpointError {
        CheckpointError::Io { path: self.path.clone(), source }
    }
}
