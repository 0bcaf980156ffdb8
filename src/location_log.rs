use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Append-only sink for raw payloads.
#[async_trait]
pub trait LocationLog: Send + Sync {
    /// Appends the raw `payload` bytes, unchanged, as a single line. Returns once the line has been handed to the
    /// operating system.
    async fn append(&self, payload: &[u8]) -> Result<(), LocationLogError>;
}

/// Appends every payload as a line to a file, opening the file for each write.
#[derive(Debug)]
pub struct AppendFileLog {
    path: PathBuf,
}

impl AppendFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AppendFileLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocationLog for AppendFileLog {
    async fn append(&self, payload: &[u8]) -> Result<(), LocationLogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| LocationLogError::Open {
                source,
                path: self.path.clone(),
            })?;

        // One write per line so a payload is never split by another writer
        let mut line = Vec::with_capacity(payload.len() + 1);
        line.extend_from_slice(payload);
        line.push(b'\n');

        let write_error = |source: io::Error| LocationLogError::Write {
            source,
            path: self.path.clone(),
        };
        file.write_all(&line).await.map_err(write_error)?;
        file.flush().await.map_err(write_error)?;

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum LocationLogError {
    #[error("could not open '{}': {}", path.display(), source)]
    Open { source: io::Error, path: PathBuf },
    #[error("could not write to '{}': {}", path.display(), source)]
    Write { source: io::Error, path: PathBuf },
}
