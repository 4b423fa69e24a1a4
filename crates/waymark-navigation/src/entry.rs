use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::RouteParams;
use crate::scene::RouteId;

/// Unique for the lifetime of one stack; never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One frame of the back stack. Read-only outside the stack manager.
#[derive(Debug, Clone)]
pub struct BackStackEntry {
    id: EntryId,
    route_id: RouteId,
    route: String,
    pattern: String,
    params: RouteParams,
}

impl BackStackEntry {
    pub(crate) fn new(
        id: EntryId,
        route_id: RouteId,
        route: &str,
        pattern: &str,
        params: RouteParams,
    ) -> Self {
        Self {
            id,
            route_id,
            route: route.to_string(),
            pattern: pattern.to_string(),
            params,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn route_id(&self) -> RouteId {
        self.route_id
    }

    /// The route string this entry was navigated with.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Pattern of the template that matched.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn path<T: FromStr>(&self, name: &str) -> Option<T> {
        self.params.path(name)
    }

    pub fn query<T: FromStr>(&self, key: &str) -> Option<T> {
        self.params.query(key)
    }

    pub fn query_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.params.query_or(key, default)
    }

    pub fn param<T: FromStr>(&self, name: &str) -> Option<T> {
        self.params.param(name)
    }

    /// Same template, same parameters.
    pub(crate) fn same_destination(&self, route_id: RouteId, params: &RouteParams) -> bool {
        self.route_id == route_id && &self.params == params
    }
}
