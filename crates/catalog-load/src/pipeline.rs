//! Streaming pipeline controller
//!
//! Pulls decoded records from a [`RecordSource`] and routes them one at a
//! time. The source is paused before a record is routed and resumed only
//! after its log line has been written, so both logs keep input order and
//! everything routed before a failure is already on disk when the failure is
//! reported.
//!
//! ```text
//! Idle -> Streaming -> (Paused <-> Streaming)* -> Completed | Failed
//! ```
//!
//! Per-record validation problems are soft (the record goes to the error
//! log). Decode and I/O errors are hard and end the run.

use crate::config::LoadConfig;
use crate::context::{LoadOptions, PipelineContext};
use crate::error::{LoadError, Result};
use crate::router::RecordRouter;
use crate::sink::{FileSink, RecordSink};
use crate::source::RecordSource;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// File name prefix of the accepted-records log.
pub const OUTPUT_FILE_PREFIX: &str = "output_dummy_load";

/// File name prefix of the rejected-records log.
pub const ERROR_FILE_PREFIX: &str = "errors_dummy_load";

/// Flow-control state of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Streaming,
    Paused,
    Completed,
    Failed,
}

impl FlowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FlowState::Completed | FlowState::Failed)
    }
}

/// Run artifacts, named after the moment the run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub started_at: DateTime<Utc>,
    pub output_path: PathBuf,
    pub error_path: PathBuf,
}

impl RunArtifacts {
    pub fn new(dir: impl AsRef<Path>, started_at: DateTime<Utc>) -> Self {
        let stamp = started_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let dir = dir.as_ref();

        Self {
            started_at,
            output_path: dir.join(format!("{}{}.json", OUTPUT_FILE_PREFIX, stamp)),
            error_path: dir.join(format!("{}{}.json", ERROR_FILE_PREFIX, stamp)),
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Records decoded from the input
    pub records: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Drives one input stream through the record router
pub struct Pipeline<S> {
    router: RecordRouter<S>,
    context: PipelineContext,
    options: LoadOptions,
    state: FlowState,
    records: u64,
}

impl Pipeline<FileSink> {
    /// Pipeline for `datapackage` input, logging into timestamped files
    /// under the configured output directory
    pub fn datapackage(
        config: &LoadConfig,
        context: PipelineContext,
        options: LoadOptions,
    ) -> (Self, RunArtifacts) {
        let artifacts = RunArtifacts::new(&config.output_dir, Utc::now());
        let pipeline = Self::new(
            FileSink::new(&artifacts.output_path),
            FileSink::new(&artifacts.error_path),
            context,
            options,
        );

        (pipeline, artifacts)
    }
}

impl<S: RecordSink> Pipeline<S> {
    pub fn new(output: S, errors: S, context: PipelineContext, options: LoadOptions) -> Self {
        Self {
            router: RecordRouter::new(output, errors),
            context,
            options,
            state: FlowState::Idle,
            records: 0,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn router(&self) -> &RecordRouter<S> {
        &self.router
    }

    /// Consume `source` to the end.
    ///
    /// Resolves exactly once: with a summary when the stream ends, or with the
    /// first decode or I/O error. A pipeline runs at most once; later calls
    /// fail with [`LoadError::AlreadyStarted`] without touching the source.
    pub async fn run<R: RecordSource>(&mut self, mut source: R) -> Result<RunSummary> {
        if self.state != FlowState::Idle {
            return Err(LoadError::AlreadyStarted(self.state));
        }

        debug!(
            user_id = ?self.context.user_id,
            owner_org = ?self.options.owner_org,
            private = self.options.private,
            keepgoing = self.options.keepgoing,
            "Starting pipeline"
        );

        self.state = FlowState::Streaming;

        match self.stream(&mut source).await {
            Ok(()) => {
                self.state = FlowState::Completed;
                let summary = self.summary();
                info!(
                    records = summary.records,
                    accepted = summary.accepted,
                    rejected = summary.rejected,
                    "Input stream completed"
                );
                Ok(summary)
            },
            Err(e) => {
                self.state = FlowState::Failed;
                error!(error = %e, records = self.records, "Input stream failed");
                Err(e)
            },
        }
    }

    async fn stream<R: RecordSource>(&mut self, source: &mut R) -> Result<()> {
        while let Some(record) = source.next_record().await? {
            source.pause();
            self.state = FlowState::Paused;

            self.records += 1;
            self.router.route(self.records, &record).await?;

            source.resume();
            self.state = FlowState::Streaming;
        }

        Ok(())
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            records: self.records,
            accepted: self.router.accepted(),
            rejected: self.router.rejected(),
        }
    }
}
