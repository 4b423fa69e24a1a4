use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Decoded values extracted from a route: named path captures and every query
/// pair the route carried (declared or not).
///
/// Typed reads go through [`FromStr`]; a value that does not convert reads as
/// absent, the same as a value that was never there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    path: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_path(name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_query(key, value);
        self
    }

    pub fn insert_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.path.insert(name.into(), value.into());
    }

    pub fn insert_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key.into(), value.into());
    }

    pub(crate) fn take_query(&mut self, key: &str) -> Option<String> {
        self.query.remove(key)
    }

    pub fn path_str(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    pub fn query_str(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn path<T: FromStr>(&self, name: &str) -> Option<T> {
        self.path_str(name)?.parse().ok()
    }

    pub fn query<T: FromStr>(&self, key: &str) -> Option<T> {
        self.query_str(key)?.parse().ok()
    }

    pub fn query_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.query(key).unwrap_or(default)
    }

    /// Path capture first, then query value of the same name.
    pub fn param<T: FromStr>(&self, name: &str) -> Option<T> {
        self.path(name).or_else(|| self.query(name))
    }

    pub fn path_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.path.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn query_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.query.is_empty()
    }
}
