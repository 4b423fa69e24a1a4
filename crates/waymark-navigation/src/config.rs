use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// Host-level navigator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Deepest the back stack may grow. `None` is unbounded; anything below 1
    /// counts as 1.
    pub max_depth: Option<usize>,
}

impl NavigatorConfig {
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub(crate) fn depth_limit(&self) -> Option<usize> {
        self.max_depth.map(|d| d.max(1))
    }
}
