//! Catalog Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the catalog tooling.
//!
//! # Overview
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing subscriber setup shared by every binary
//! - **Types**: Work records, annotations, and annotation lookup
//!
//! # Example
//!
//! ```no_run
//! use catalog_common::Result;
//! use catalog_common::types::WorkRecord;
//!
//! fn first_uri(line: &str) -> Result<Option<String>> {
//!     let record = WorkRecord::from_json(line)?;
//!     Ok(record.identifier_link().map(str::to_string))
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, Result};
