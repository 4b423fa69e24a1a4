use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::params::RouteParams;

/// Ordered (route, params) pairs, bottom first. Restoring replays the routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub route: String,
    pub params: RouteParams,
}

impl StackSnapshot {
    pub fn to_json(&self) -> Result<String, NavError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(json)?)
    }
}
