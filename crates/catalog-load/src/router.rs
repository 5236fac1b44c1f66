//! Per-record validation and routing
//!
//! A record is valid when a work URI can be derived from its annotations.
//! Valid records go to the output log, everything else to the error log.
//! Rejection is never fatal to the run.

use crate::error::Result;
use crate::sink::RecordSink;
use catalog_common::types::WorkRecord;
use tracing::{debug, info, warn};

/// Where a record ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Accepted { work_uri: String },
    Rejected,
}

/// Canonical URI of a work: its identifier link, else its locator link.
///
/// Empty links count as missing.
pub fn work_uri(record: &WorkRecord) -> Option<&str> {
    let present = |link: &&str| !link.is_empty();

    record
        .identifier_link()
        .filter(present)
        .or_else(|| record.locator_link().filter(present))
}

/// Classify a record without side effects
pub fn classify(record: &WorkRecord) -> Route {
    match work_uri(record) {
        Some(uri) => Route::Accepted {
            work_uri: uri.to_string(),
        },
        None => Route::Rejected,
    }
}

/// Routes records into an output sink and an error sink
pub struct RecordRouter<S> {
    output: S,
    errors: S,
    accepted: u64,
    rejected: u64,
}

impl<S: RecordSink> RecordRouter<S> {
    pub fn new(output: S, errors: S) -> Self {
        Self {
            output,
            errors,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Validate `record` and append it to exactly one sink.
    ///
    /// `count` is the 1-based position of the record in the input and only
    /// appears in diagnostics.
    pub async fn route(&mut self, count: u64, record: &WorkRecord) -> Result<Route> {
        let route = classify(record);

        match &route {
            Route::Accepted { work_uri } => {
                self.output.append(record).await?;
                self.accepted += 1;
                info!("{} ok", work_uri);
                debug!(record = count, work_uri = %work_uri, "Record written to output log");
            },
            Route::Rejected => {
                self.errors.append(record).await?;
                self.rejected += 1;
                warn!(
                    "{}: error: no identifier or locator link (json written to error file)",
                    count
                );
                debug!(
                    record = count,
                    has_annotations = record.has_annotations(),
                    "Record written to error log"
                );
            },
        }

        Ok(route)
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn output(&self) -> &S {
        &self.output
    }

    pub fn errors(&self) -> &S {
        &self.errors
    }
}
