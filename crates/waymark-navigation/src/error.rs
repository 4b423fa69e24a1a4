use thiserror::Error;

use crate::entry::EntryId;

/// Problems with route patterns and route strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route pattern is empty")]
    EmptyPattern,
    #[error("invalid segment `{segment}` in pattern `{pattern}`")]
    InvalidSegment { pattern: String, segment: String },
    #[error("capture `{name}` appears more than once in pattern `{pattern}`")]
    DuplicateCapture { pattern: String, name: String },
    #[error("no registered route matches `{0}`")]
    NotFound(String),
    #[error("pattern `{pattern}` needs a value for `{name}`")]
    MissingParameter { pattern: String, name: String },
    #[error("malformed uri `{0}`")]
    MalformedUri(String),
}

#[derive(Debug, Error)]
pub enum NavError {
    #[error(transparent)]
    Route(#[from] RouteError),
    /// A second waiter tried to attach to an entry that is already awaited.
    #[error("entry {0} already has a result waiter")]
    DuplicateResultWaiter(EntryId),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stack snapshot contains no resolvable route")]
    EmptySnapshot,
}
