use std::any::Any;
use std::sync::Arc;

use crate::config::NavigatorConfig;
use crate::entry::BackStackEntry;
use crate::error::NavError;
use crate::event::{NavEvent, SubscriptionId};
use crate::options::NavOptions;
use crate::result::{NavResult, PendingResult};
use crate::scene::AuthorizationGuard;
use crate::snapshot::StackSnapshot;
use crate::stack::{NavOutcome, RouteStackManager};
use crate::table::RouteTable;

/// Cheap, cloneable handle to one navigation host's stack.
///
/// Construct it once per host and pass it to whatever needs to navigate;
/// scene factories receive it through their [`SceneScope`](crate::SceneScope).
pub struct Navigator<V: 'static> {
    stack: Arc<RouteStackManager<V>>,
}

impl<V: 'static> Clone for Navigator<V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<V: 'static> Navigator<V> {
    pub fn new(table: Arc<RouteTable<V>>, initial_route: &str) -> Result<Self, NavError> {
        Self::with_config(table, initial_route, NavigatorConfig::default())
    }

    pub fn with_config(
        table: Arc<RouteTable<V>>,
        initial_route: &str,
        config: NavigatorConfig,
    ) -> Result<Self, NavError> {
        let stack = RouteStackManager::new(table, initial_route, config)?;
        Ok(Self {
            stack: Arc::new(stack),
        })
    }

    pub fn stack(&self) -> &RouteStackManager<V> {
        &self.stack
    }

    pub fn navigate(&self, route: &str) -> NavOutcome {
        self.stack.navigate(route, &NavOptions::default())
    }

    pub fn navigate_with(&self, route: &str, options: NavOptions) -> NavOutcome {
        self.stack.navigate(route, &options)
    }

    pub fn navigate_for_result(&self, route: &str) -> Result<PendingResult, NavError> {
        self.stack.navigate_for_result(route, &NavOptions::default())
    }

    pub fn navigate_for_result_with(
        &self,
        route: &str,
        options: NavOptions,
    ) -> Result<PendingResult, NavError> {
        self.stack.navigate_for_result(route, &options)
    }

    pub fn open_deep_link(&self, uri: &str) -> NavOutcome {
        self.stack.open_deep_link(uri, &NavOptions::default())
    }

    pub fn open_deep_link_with(&self, uri: &str, options: NavOptions) -> NavOutcome {
        self.stack.open_deep_link(uri, &options)
    }

    pub fn go_back(&self) -> bool {
        self.stack.go_back(None)
    }

    pub fn go_back_with<T: Any + Send>(&self, result: T) -> bool {
        self.stack.go_back(Some(NavResult::new(result)))
    }

    /// Same as [`go_back`](Self::go_back), for Jetpack-style callers.
    pub fn pop_back_stack(&self) -> bool {
        self.go_back()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.can_go_back()
    }

    pub fn current_entry(&self) -> Option<Arc<BackStackEntry>> {
        self.stack.current_entry()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn subscribe(&self, listener: impl Fn(&NavEvent) + Send + Sync + 'static) -> SubscriptionId {
        self.stack.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.stack.unsubscribe(id)
    }

    pub fn set_authorization_guard(&self, guard: impl AuthorizationGuard<V> + 'static) {
        self.stack.set_authorization_guard(guard)
    }

    pub fn render(&self) -> Option<V> {
        self.stack.render_top(self)
    }

    pub fn snapshot(&self) -> StackSnapshot {
        self.stack.snapshot()
    }

    pub fn restore(&self, snapshot: &StackSnapshot) -> Result<usize, NavError> {
        self.stack.restore(snapshot)
    }

    pub fn to_json(&self) -> Result<String, NavError> {
        self.stack.to_json()
    }

    pub fn restore_json(&self, json: &str) -> Result<usize, NavError> {
        self.stack.restore_json(json)
    }
}
