//! Append-only record logs

use crate::error::{LoadError, Result};
use async_trait::async_trait;
use catalog_common::types::WorkRecord;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Destination for routed records
#[async_trait]
pub trait RecordSink: Send {
    /// Append the record's raw JSON as one line.
    ///
    /// Returns once the line has been handed to the operating system.
    async fn append(&mut self, record: &WorkRecord) -> Result<()>;
}

/// A newline-delimited JSON log file, created on first append
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    written: u64,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended during this run
    pub fn written(&self) -> u64 {
        self.written
    }

    fn error(&self, source: std::io::Error) -> LoadError {
        LoadError::Sink {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn open(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .await
                    .map_err(|e| self.error(e))?;

                debug!(path = %self.path.display(), "Opened log file");
                file
            },
        };

        Ok(self.file.insert(file))
    }
}

#[async_trait]
impl RecordSink for FileSink {
    async fn append(&mut self, record: &WorkRecord) -> Result<()> {
        let mut line = String::with_capacity(record.raw().len() + 1);
        line.push_str(record.raw());
        line.push('\n');

        let file = self.open().await?;
        let written = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;
        written.map_err(|e| self.error(e))?;

        self.written += 1;
        Ok(())
    }
}
