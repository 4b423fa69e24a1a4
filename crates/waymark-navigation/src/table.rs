use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::RouteError;
use crate::params::RouteParams;
use crate::scene::{RouteId, SceneBinding, SceneFactory, SceneScope};
use crate::template::RouteTemplate;

/// A successful lookup.
pub struct Resolved<V: 'static> {
    pub binding: Arc<SceneBinding<V>>,
    pub params: RouteParams,
}

/// Ordered registrations. Lookups try bindings in registration order and the
/// first match wins, so registration order is part of the routing contract.
///
/// Registration may continue while lookups are running; each lookup sees the
/// table as it was when the lookup started.
pub struct RouteTable<V: 'static> {
    bindings: RwLock<Vec<Arc<SceneBinding<V>>>>,
}

impl<V: 'static> Default for RouteTable<V> {
    fn default() -> Self {
        Self {
            bindings: RwLock::new(Vec::new()),
        }
    }
}

impl<V: 'static> RouteTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        pattern: &str,
        deep_links: &[&str],
        factory: impl Fn(&SceneScope<V>) -> V + Send + Sync + 'static,
    ) -> Result<RouteId, RouteError> {
        self.insert(pattern, deep_links, Arc::new(factory), false)
    }

    /// Same as [`register`](Self::register); rendering goes through the
    /// navigator's [`AuthorizationGuard`](crate::AuthorizationGuard).
    pub fn register_authorized(
        &self,
        pattern: &str,
        deep_links: &[&str],
        factory: impl Fn(&SceneScope<V>) -> V + Send + Sync + 'static,
    ) -> Result<RouteId, RouteError> {
        self.insert(pattern, deep_links, Arc::new(factory), true)
    }

    pub fn register_factory(
        &self,
        pattern: &str,
        deep_links: &[&str],
        factory: SceneFactory<V>,
        authorized: bool,
    ) -> Result<RouteId, RouteError> {
        self.insert(pattern, deep_links, factory, authorized)
    }

    fn insert(
        &self,
        pattern: &str,
        deep_links: &[&str],
        factory: SceneFactory<V>,
        authorized: bool,
    ) -> Result<RouteId, RouteError> {
        // Parse outside the lock; a bad alias rejects the whole registration.
        let template = RouteTemplate::parse(pattern)?;
        let deep_links = deep_links
            .iter()
            .map(|p| RouteTemplate::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut bindings = self.bindings.write();
        let id = RouteId(bindings.len());
        log::trace!(
            "register route {:?} `{}` ({} deep links)",
            id,
            template,
            deep_links.len()
        );
        bindings.push(Arc::new(SceneBinding {
            id,
            template,
            deep_links,
            factory,
            authorized,
        }));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    pub fn get(&self, id: RouteId) -> Option<Arc<SceneBinding<V>>> {
        self.bindings.read().get(id.0).cloned()
    }

    pub fn resolve(&self, route: &str) -> Result<Resolved<V>, RouteError> {
        let bindings = self.bindings.read();
        bindings
            .iter()
            .find_map(|b| {
                b.template.matches(route).map(|params| Resolved {
                    binding: b.clone(),
                    params,
                })
            })
            .ok_or_else(|| RouteError::NotFound(route.to_string()))
    }

    /// Tries every alias of every binding, in registration order. The returned
    /// params are the alias captures; the binding is the canonical one.
    pub fn resolve_deep_link(&self, uri: &str) -> Result<Resolved<V>, RouteError> {
        let bindings = self.bindings.read();
        bindings
            .iter()
            .find_map(|b| {
                b.deep_links.iter().find_map(|alias| {
                    alias.matches(uri).map(|params| Resolved {
                        binding: b.clone(),
                        params,
                    })
                })
            })
            .ok_or_else(|| RouteError::NotFound(uri.to_string()))
    }
}
