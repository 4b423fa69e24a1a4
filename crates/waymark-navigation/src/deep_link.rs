use std::sync::Arc;

use crate::error::RouteError;
use crate::table::RouteTable;

/// Turns external URIs into canonical internal routes.
///
/// The alias that matched only supplies values; the route is always rebuilt
/// from the canonical template, so a destination reached by deep link compares
/// equal to the same destination reached by direct navigation.
pub struct DeepLinkResolver<V: 'static> {
    table: Arc<RouteTable<V>>,
}

impl<V: 'static> DeepLinkResolver<V> {
    pub fn new(table: Arc<RouteTable<V>>) -> Self {
        Self { table }
    }

    pub fn resolve(&self, uri: &str) -> Result<String, RouteError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(RouteError::MalformedUri(uri.to_string()));
        }
        let resolved = self.table.resolve_deep_link(uri)?;
        let route = resolved.binding.template().build(&resolved.params)?;
        log::debug!("deep link `{uri}` -> `{route}`");
        Ok(route)
    }
}
