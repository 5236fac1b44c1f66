//! Error types for the load pipeline
//!
//! Per-record validation problems are not errors: they are routed to the
//! error log and never surface here. Everything in [`LoadError`] stops a run.

use crate::pipeline::FlowState;
use catalog_common::CatalogError;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Result type alias for load operations
pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Error, Debug)]
pub enum LoadError {
    /// A line could not be decoded as JSON
    #[error("Invalid JSON at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: CatalogError,
    },

    /// The input stream could not be read
    #[error("Failed to read input at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: LinesCodecError,
    },

    /// A log sink could not be written
    #[error("Failed to write {path}: {source}")]
    Sink {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A record was requested while the source was paused
    #[error("Record requested from a paused source")]
    SourcePaused,

    /// `run` was called on a pipeline that is not idle
    #[error("Pipeline already started (state: {0:?})")]
    AlreadyStarted(FlowState),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LoadError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
