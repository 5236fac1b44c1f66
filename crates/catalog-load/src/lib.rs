//! Catalog Load Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Bulk-loads dummy work records into the catalog tooling from NDJSON.
//!
//! Each input line is one work record. Records that carry an identifier or
//! locator link are appended to the run's output log; the rest go to its
//! error log. Malformed JSON stops the run.
//!
//! # Example
//!
//! ```no_run
//! use catalog_load::config::LoadConfig;
//! use catalog_load::context::{LoadOptions, PipelineContext};
//! use catalog_load::pipeline::Pipeline;
//! use catalog_load::source::NdjsonSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LoadConfig::from_env()?;
//!     let (mut pipeline, _artifacts) =
//!         Pipeline::datapackage(&config, PipelineContext::default(), LoadOptions::default());
//!
//!     let summary = pipeline.run(NdjsonSource::new(tokio::io::stdin())).await?;
//!     println!("{} records", summary.records);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod router;
pub mod sink;
pub mod source;

pub use error::{LoadError, Result};
