//! The value side of navigate-for-result.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::entry::EntryId;

/// Value handed back by `go_back_with`. Type-erased; the waiter downcasts.
pub struct NavResult(Box<dyn Any + Send>);

impl NavResult {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Box::new(value))
    }
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        self.0.downcast::<T>().map(|b| *b).map_err(Self)
    }
    /// `downcast`, dropping the value on a type mismatch.
    pub fn take<T: Any>(self) -> Option<T> {
        self.downcast().ok()
    }
}

impl fmt::Debug for NavResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavResult").finish_non_exhaustive()
    }
}

pub(crate) type ResultSender = oneshot::Sender<Option<NavResult>>;

/// Single-assignment slot latched onto a stack entry.
pub(crate) struct ResultSlot {
    tx: ResultSender,
}

impl ResultSlot {
    pub(crate) fn open(entry: EntryId) -> (Self, PendingResult) {
        let (tx, rx) = oneshot::channel();
        (
            Self { tx },
            PendingResult {
                entry: Some(entry),
                rx: Some(rx),
            },
        )
    }

    /// True once the waiter has gone away; the slot can be replaced.
    pub(crate) fn is_released(&self) -> bool {
        self.tx.is_canceled()
    }

    pub(crate) fn fulfill(self, entry: EntryId, result: Option<NavResult>) {
        if self.tx.send(result).is_err() {
            log::debug!("result for entry {entry} dropped; waiter is gone");
        }
    }
}

/// Resolves when the awaited entry is popped.
///
/// Yields the value given to `go_back_with`, `None` for a plain `go_back`,
/// and `None` when the entry is discarded without being popped (stack cleared,
/// navigator torn down) or when the navigation never pushed anything.
#[must_use = "dropping the waiter releases the result binding"]
pub struct PendingResult {
    entry: Option<EntryId>,
    rx: Option<oneshot::Receiver<Option<NavResult>>>,
}

impl PendingResult {
    pub(crate) fn ready() -> Self {
        Self {
            entry: None,
            rx: None,
        }
    }

    /// Entry the waiter is latched to; `None` if nothing was awaited.
    pub fn entry(&self) -> Option<EntryId> {
        self.entry
    }
}

impl Future for PendingResult {
    type Output = Option<NavResult>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(None);
        };
        match Pin::new(rx).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(outcome) => {
                this.rx = None;
                match outcome {
                    Ok(result) => Poll::Ready(result),
                    Err(oneshot::Canceled) => {
                        if let Some(entry) = this.entry {
                            log::debug!("entry {entry} discarded before it was popped");
                        }
                        Poll::Ready(None)
                    }
                }
            }
        }
    }
}

impl fmt::Debug for PendingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResult")
            .field("entry", &self.entry)
            .field("done", &self.rx.is_none())
            .finish()
    }
}
