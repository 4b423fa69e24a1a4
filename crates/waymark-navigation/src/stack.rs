//! The back stack itself.
//!
//! One mutex guards the frames together with their result slots, so a push
//! and the latching of its waiter happen in the same critical section: no pop
//! can slip in between. Observers run after the lock is released, against a
//! snapshot taken inside it.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::NavigatorConfig;
use crate::deep_link::DeepLinkResolver;
use crate::entry::{BackStackEntry, EntryId};
use crate::error::{NavError, RouteError};
use crate::event::{Listener, NavEvent, Observers, StackChange, SubscriptionId, TransitionDir};
use crate::navigator::Navigator;
use crate::options::{LaunchFlags, NavOptions};
use crate::result::{NavResult, PendingResult, ResultSlot};
use crate::scene::{AuthorizationGuard, SceneBinding, SceneScope};
use crate::snapshot::{SnapshotEntry, StackSnapshot};
use crate::table::{Resolved, RouteTable};

/// What a navigation call did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavOutcome {
    Pushed(EntryId),
    /// The destination already was the top entry; nothing was pushed.
    AlreadyOnTop(EntryId),
    NotFound,
    /// Pushing would exceed [`NavigatorConfig::max_depth`].
    DepthLimited,
}

struct Frame<V: 'static> {
    entry: Arc<BackStackEntry>,
    binding: Arc<SceneBinding<V>>,
    result: Option<ResultSlot>,
}

impl<V: 'static> Frame<V> {
    /// Latches a fresh waiter, refusing if a live one is already attached.
    fn attach_waiter(&mut self) -> Result<PendingResult, NavError> {
        let id = self.entry.id();
        if let Some(slot) = &self.result
            && !slot.is_released()
        {
            log::error!(
                "entry {id} (`{}`) is already awaited; refusing second waiter",
                self.entry.route()
            );
            return Err(NavError::DuplicateResultWaiter(id));
        }
        let (slot, pending) = ResultSlot::open(id);
        self.result = Some(slot);
        Ok(pending)
    }
}

struct StackState<V: 'static> {
    frames: Vec<Frame<V>>,
    next_id: u64,
    last_dir: TransitionDir,
}

impl<V: 'static> StackState<V> {
    fn frame(&mut self, resolved: Resolved<V>, route: &str) -> Frame<V> {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        let entry = BackStackEntry::new(
            id,
            resolved.binding.id(),
            route,
            resolved.binding.template().pattern(),
            resolved.params,
        );
        Frame {
            entry: Arc::new(entry),
            binding: resolved.binding,
            result: None,
        }
    }

    fn change(&self) -> Option<StackChange> {
        self.frames.last().map(|top| StackChange {
            dir: self.last_dir,
            top: top.entry.clone(),
            depth: self.frames.len(),
        })
    }
}

pub struct RouteStackManager<V: 'static> {
    table: Arc<RouteTable<V>>,
    config: NavigatorConfig,
    state: Mutex<StackState<V>>,
    observers: Mutex<Observers>,
    guard: RwLock<Option<Arc<dyn AuthorizationGuard<V>>>>,
}

impl<V: 'static> RouteStackManager<V> {
    /// Builds a stack holding `initial_route`. An initial route that matches
    /// nothing is a configuration error and fails construction.
    pub fn new(
        table: Arc<RouteTable<V>>,
        initial_route: &str,
        config: NavigatorConfig,
    ) -> Result<Self, NavError> {
        let resolved = table.resolve(initial_route)?;
        let mut state = StackState {
            frames: Vec::new(),
            next_id: 1,
            last_dir: TransitionDir::None,
        };
        let root = state.frame(resolved, initial_route);
        state.frames.push(root);
        Ok(Self {
            table,
            config,
            state: Mutex::new(state),
            observers: Mutex::new(Observers::default()),
            guard: RwLock::new(None),
        })
    }

    pub fn table(&self) -> &Arc<RouteTable<V>> {
        &self.table
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn set_authorization_guard(&self, guard: impl AuthorizationGuard<V> + 'static) {
        *self.guard.write() = Some(Arc::new(guard));
    }

    pub fn subscribe(&self, listener: impl Fn(&NavEvent) + Send + Sync + 'static) -> SubscriptionId {
        let listener: Listener = Arc::new(listener);
        self.observers.lock().add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.lock().remove(id)
    }

    fn emit(&self, event: NavEvent) {
        let listeners = self.observers.lock().snapshot();
        for listener in listeners {
            listener(&event);
        }
    }

    fn not_found(&self, route: &str, err: &RouteError) {
        log::warn!("navigation ignored: {err}");
        self.emit(NavEvent::RouteNotFound {
            route: route.to_string(),
        });
    }

    pub fn current_entry(&self) -> Option<Arc<BackStackEntry>> {
        self.state.lock().frames.last().map(|f| f.entry.clone())
    }

    pub fn can_go_back(&self) -> bool {
        self.state.lock().frames.len() > 1
    }

    pub fn depth(&self) -> usize {
        self.state.lock().frames.len()
    }

    pub fn last_dir(&self) -> TransitionDir {
        self.state.lock().last_dir
    }

    /// Bottom first.
    pub fn entries(&self) -> Vec<Arc<BackStackEntry>> {
        self.state
            .lock()
            .frames
            .iter()
            .map(|f| f.entry.clone())
            .collect()
    }

    pub fn navigate(&self, route: &str, options: &NavOptions) -> NavOutcome {
        match self.transition(route, options, false) {
            Ok((outcome, _)) => outcome,
            // Only result waiters can fail.
            Err(_) => NavOutcome::NotFound,
        }
    }

    /// Navigates like [`navigate`](Self::navigate) and latches a waiter onto
    /// the resulting top entry inside the same critical section.
    ///
    /// When the route resolves to the current top entry, the waiter attaches
    /// to that entry; if it is already awaited this is
    /// [`NavError::DuplicateResultWaiter`]. Unmatched or refused navigations
    /// return a waiter that resolves to `None` immediately.
    pub fn navigate_for_result(
        &self,
        route: &str,
        options: &NavOptions,
    ) -> Result<PendingResult, NavError> {
        let (_, pending) = self.transition(route, options, true)?;
        Ok(pending.unwrap_or_else(PendingResult::ready))
    }

    fn transition(
        &self,
        route: &str,
        options: &NavOptions,
        await_result: bool,
    ) -> Result<(NavOutcome, Option<PendingResult>), NavError> {
        let resolved = match self.table.resolve(route) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.not_found(route, &err);
                return Ok((NavOutcome::NotFound, None));
            }
        };
        let route_id = resolved.binding.id();

        let mut discarded: Vec<Frame<V>> = Vec::new();
        let (outcome, pending, change) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;

            let mut keep = options.retained(state.frames.iter().map(|f| f.entry.pattern()));

            // Re-navigating to the current top is a no-op unless the options
            // truncate the stack below it.
            if keep == state.frames.len()
                && let Some(top) = state.frames.last_mut()
                && top.entry.same_destination(route_id, &resolved.params)
            {
                let pending = if await_result {
                    Some(top.attach_waiter()?)
                } else {
                    None
                };
                log::trace!("`{route}` is already on top");
                return Ok((NavOutcome::AlreadyOnTop(top.entry.id()), pending));
            }

            if options.flags.contains(LaunchFlags::SINGLE_TOP)
                && keep > 0
                && state.frames[keep - 1].entry.route_id() == route_id
            {
                keep -= 1;
            }

            if keep > 0 && state.frames[keep - 1].entry.same_destination(route_id, &resolved.params)
            {
                // Popping back down exposes the destination itself.
                let pending = if await_result {
                    Some(state.frames[keep - 1].attach_waiter()?)
                } else {
                    None
                };
                discarded.extend(state.frames.drain(keep..));
                state.last_dir = TransitionDir::Pop;
                let id = state.frames[keep - 1].entry.id();
                (NavOutcome::AlreadyOnTop(id), pending, state.change())
            } else if let Some(limit) = self.config.depth_limit()
                && keep + 1 > limit
            {
                log::warn!("navigation to `{route}` refused: depth limit {limit} reached");
                (NavOutcome::DepthLimited, None, None)
            } else {
                discarded.extend(state.frames.drain(keep..));
                let mut frame = state.frame(resolved, route);
                let pending = if await_result {
                    Some(frame.attach_waiter()?)
                } else {
                    None
                };
                let id = frame.entry.id();
                log::debug!(
                    "push {id} `{route}` (depth {} -> {})",
                    keep + discarded.len(),
                    keep + 1
                );
                state.frames.push(frame);
                state.last_dir = TransitionDir::Push;
                (NavOutcome::Pushed(id), pending, state.change())
            }
        };

        // Waiters of discarded entries resolve to `None` here.
        drop(discarded);
        if let Some(change) = change {
            self.emit(NavEvent::StackChanged(change));
        }
        Ok((outcome, pending))
    }

    /// Pops the top entry and hands `result` to its waiter, if any. The root
    /// entry is never popped; calling this at depth 1 does nothing.
    pub fn go_back(&self, result: Option<NavResult>) -> bool {
        let (popped, change) = {
            let mut state = self.state.lock();
            if state.frames.len() <= 1 {
                log::debug!("go_back ignored at the root entry");
                return false;
            }
            let Some(popped) = state.frames.pop() else {
                return false;
            };
            state.last_dir = TransitionDir::Pop;
            (popped, state.change())
        };

        let id = popped.entry.id();
        log::debug!("pop {id} `{}`", popped.entry.route());
        match popped.result {
            Some(slot) => slot.fulfill(id, result),
            None if result.is_some() => {
                log::debug!("entry {id} had no waiter; result discarded")
            }
            None => {}
        }
        if let Some(change) = change {
            self.emit(NavEvent::StackChanged(change));
        }
        true
    }

    pub fn open_deep_link(&self, uri: &str, options: &NavOptions) -> NavOutcome {
        match DeepLinkResolver::new(self.table.clone()).resolve(uri) {
            Ok(route) => self.navigate(&route, options),
            Err(err) => {
                self.not_found(uri, &err);
                NavOutcome::NotFound
            }
        }
    }

    /// Runs the top entry's scene factory, through the authorization guard
    /// when the scene was registered as authorized.
    pub fn render_top(&self, nav: &Navigator<V>) -> Option<V> {
        let (entry, binding) = {
            let state = self.state.lock();
            let top = state.frames.last()?;
            (top.entry.clone(), top.binding.clone())
        };
        let guard = self.guard.read().clone();
        let scope = SceneScope::new(entry, nav.clone());
        Some(binding.render(&scope, guard.as_deref()))
    }

    pub fn snapshot(&self) -> StackSnapshot {
        let state = self.state.lock();
        StackSnapshot {
            entries: state
                .frames
                .iter()
                .map(|f| SnapshotEntry {
                    route: f.entry.route().to_string(),
                    params: f.entry.params().clone(),
                })
                .collect(),
        }
    }

    /// Replaces the stack with the snapshot's routes, bottom first. Routes
    /// that no longer resolve are skipped; if none resolve the current stack
    /// is kept and [`NavError::EmptySnapshot`] is returned.
    pub fn restore(&self, snapshot: &StackSnapshot) -> Result<usize, NavError> {
        let mut resolved = Vec::with_capacity(snapshot.entries.len());
        for saved in &snapshot.entries {
            match self.table.resolve(&saved.route) {
                Ok(r) => resolved.push((saved.route.as_str(), r)),
                Err(err) => log::warn!("restore skipped entry: {err}"),
            }
        }
        if resolved.is_empty() {
            return Err(NavError::EmptySnapshot);
        }

        let (old, change) = {
            let mut state = self.state.lock();
            let old = std::mem::take(&mut state.frames);
            for (route, r) in resolved {
                if let Some(top) = state.frames.last()
                    && top.entry.same_destination(r.binding.id(), &r.params)
                {
                    continue;
                }
                if let Some(limit) = self.config.depth_limit()
                    && state.frames.len() >= limit
                {
                    log::warn!("restore truncated at depth limit {limit}");
                    break;
                }
                let frame = state.frame(r, route);
                state.frames.push(frame);
            }
            state.last_dir = TransitionDir::None;
            (old, state.change())
        };
        drop(old);

        let depth = change.as_ref().map_or(0, |c| c.depth);
        log::debug!("restored stack with {depth} entries");
        if let Some(change) = change {
            self.emit(NavEvent::StackChanged(change));
        }
        Ok(depth)
    }

    pub fn to_json(&self) -> Result<String, NavError> {
        self.snapshot().to_json()
    }

    pub fn restore_json(&self, json: &str) -> Result<usize, NavError> {
        self.restore(&StackSnapshot::from_json(json)?)
    }
}
