//! Input package formats

use crate::error::LoadError;
use std::str::FromStr;

/// Format name used when `--format` is not given
pub const DEFAULT_FORMAT: &str = "datapackage";

/// Supported input package formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    /// NDJSON work records carrying identifier/locator annotations
    DataPackage,
}

impl FromStr for PackageFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "datapackage" => Ok(PackageFormat::DataPackage),
            _ => Err(LoadError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageFormat::DataPackage => write!(f, "datapackage"),
        }
    }
}
