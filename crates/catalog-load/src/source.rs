//! Record sources
//!
//! A [`RecordSource`] hands decoded work records to the pipeline one at a
//! time and honours explicit pause/resume requests. [`NdjsonSource`] decodes
//! newline-delimited JSON from any async byte stream.

use crate::error::{LoadError, Result};
use async_trait::async_trait;
use catalog_common::types::WorkRecord;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::trace;

/// A pausable stream of decoded work records
#[async_trait]
pub trait RecordSource: Send {
    /// Next decoded record, or `None` once the stream is exhausted.
    ///
    /// Must not be called while paused.
    async fn next_record(&mut self) -> Result<Option<WorkRecord>>;

    /// Stop delivering records until [`resume`](Self::resume) is called
    fn pause(&mut self);

    fn resume(&mut self);
}

/// Decodes one [`WorkRecord`] per non-blank line of its input
pub struct NdjsonSource<R> {
    frames: FramedRead<R, LinesCodec>,
    line: usize,
    paused: bool,
}

impl<R> NdjsonSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            frames: FramedRead::new(reader, LinesCodec::new()),
            line: 0,
            paused: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of input lines consumed so far, blank lines included
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

#[async_trait]
impl<R> RecordSource for NdjsonSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn next_record(&mut self) -> Result<Option<WorkRecord>> {
        if self.paused {
            return Err(LoadError::SourcePaused);
        }

        while let Some(frame) = self.frames.next().await {
            self.line += 1;
            let line = self.line;

            let text = frame.map_err(|source| LoadError::Read { line, source })?;
            if text.trim().is_empty() {
                trace!(line, "Skipping blank line");
                continue;
            }

            let record =
                WorkRecord::from_json(text).map_err(|source| LoadError::Decode { line, source })?;
            return Ok(Some(record));
        }

        Ok(None)
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}
