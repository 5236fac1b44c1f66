//! Caller-supplied context threaded through a run
//!
//! Nothing here is acted upon yet. The values are carried so a backend
//! integration can attribute and authorize writes later.

use serde::{Deserialize, Serialize};

/// Identity of the caller on whose behalf records are loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineContext {
    pub user_id: Option<String>,
}

/// Ownership and behaviour flags from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    pub owner_org: Option<String>,
    pub private: bool,
    pub keepgoing: bool,
    pub verbose: bool,
}
