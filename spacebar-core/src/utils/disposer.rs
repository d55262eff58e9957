//! Scoped subscriptions.
//!
//! Every `connect`-style API in spacebar returns a [`Disposer`] that undoes the
//! connection. Components collect them in a [`DisposerList`] and release them
//! all from their `destroy()`.

use parking_lot::Mutex;
use std::fmt;

/// Undoes one subscription. Runs at most once; dropping without calling
/// [`Disposer::dispose`] leaves the subscription in place.
pub struct Disposer {
    action: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Disposer {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { action: Some(Box::new(action)) }
    }

    /// A disposer with nothing to undo.
    pub fn noop() -> Self {
        Self { action: None }
    }

    pub fn dispose(mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("pending", &self.action.is_some())
            .finish()
    }
}

/// A set of disposers released together.
#[derive(Default)]
pub struct DisposerList {
    disposers: Mutex<Vec<Disposer>>,
}

impl DisposerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, disposer: Disposer) {
        self.disposers.lock().push(disposer);
    }

    pub fn len(&self) -> usize {
        self.disposers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every disposer in reverse registration order. Calling it again is a no-op.
    pub fn dispose_all(&self) {
        // Take the list first: a disposer may re-enter this list.
        let drained: Vec<Disposer> = std::mem::take(&mut *self.disposers.lock());
        for disposer in drained.into_iter().rev() {
            disposer.dispose();
        }
    }
}

impl fmt::Debug for DisposerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposerList").field("len", &self.len()).finish()
    }
}
