use std::sync::Arc;

use crate::entry::BackStackEntry;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionDir {
    None,
    Push,
    Pop,
}

/// Snapshot of the stack taken at the moment it changed.
#[derive(Debug, Clone)]
pub struct StackChange {
    pub dir: TransitionDir,
    pub top: Arc<BackStackEntry>,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub enum NavEvent {
    StackChanged(StackChange),
    /// A navigation or deep link matched nothing; the stack is unchanged.
    RouteNotFound { route: String },
}

pub type Listener = Arc<dyn Fn(&NavEvent) + Send + Sync>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Listeners are called outside the registry lock, so they may navigate
    /// or (un)subscribe re-entrantly.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.listeners.iter().map(|(_, l)| l.clone()).collect()
    }
}
