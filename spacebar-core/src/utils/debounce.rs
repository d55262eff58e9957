//! Coalescing of change signals.
//!
//! [`DebouncingNotifier`] turns any number of [`notify`](DebouncingNotifier::notify)
//! calls made before the next scheduler turn into a single subscriber callback.
//! Flushes run as tasks on the ambient `tokio` runtime, so subscribers never run
//! inside `notify()` itself.
//!
//! With a zero delay, "the next scheduler turn" is only well defined on a
//! current-thread runtime: the flush task cannot start until the caller yields.
//! On a multi-thread runtime a worker may pick the flush up while the caller is
//! still issuing `notify()` calls, so one burst can produce more than one flush.
//! Give the notifier a non-zero delay when it is driven from a multi-thread
//! runtime.
//!
//! ```rust,ignore
//! let notifier = DebouncingNotifier::new(Duration::ZERO);
//! notifier.subscribe(|| tracing::info!("workspaces changed"));
//! notifier.notify();
//! notifier.notify(); // no-op, a flush is already pending
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type Subscriber = Arc<dyn Fn() + Send + Sync + 'static>;

struct NotifierInner {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl NotifierInner {
    fn flush(&self) {
        self.pending.lock().take();
        let subscribers: Vec<Subscriber> = self.subscribers.lock().clone();
        for subscriber in subscribers {
            subscriber();
        }
    }
}

/// Coalesces bursts of `notify()` calls into one deferred notification.
pub struct DebouncingNotifier {
    inner: Arc<NotifierInner>,
}

impl DebouncingNotifier {
    /// Creates a notifier that waits `delay` after the first pending `notify()`
    /// before flushing. A zero delay flushes on the next scheduler turn.
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                delay,
                pending: Mutex::new(None),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Schedules a flush unless one is already pending.
    ///
    /// Calls coalesce until the flush task starts; see the module docs for
    /// how that interacts with the runtime flavor.
    pub fn notify(&self) {
        let mut pending = self.inner.pending.lock();
        if pending.is_some() {
            return;
        }
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("DebouncingNotifier::notify called outside a tokio runtime; dropping notification.");
                return;
            }
        };
        let weak: Weak<NotifierInner> = Arc::downgrade(&self.inner);
        let delay = self.inner.delay;
        // `pending` stays locked until the handle is stored, so the task's flush
        // cannot clear the slot before it is filled.
        *pending = Some(handle.spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            if let Some(inner) = weak.upgrade() {
                inner.flush();
            }
        }));
    }

    /// Registers a listener invoked on every flush, in registration order.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.subscribers.lock().push(Arc::new(callback));
    }

    /// Whether a flush is scheduled but has not run yet.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.lock().is_some()
    }

    /// Cancels a pending flush and drops all listeners. Idempotent.
    pub fn destroy(&self) {
        if let Some(handle) = self.inner.pending.lock().take() {
            handle.abort();
        }
        self.inner.subscribers.lock().clear();
    }
}

impl Default for DebouncingNotifier {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Drop for DebouncingNotifier {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.pending.lock().take() {
            handle.abort();
        }
    }
}

impl fmt::Debug for DebouncingNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncingNotifier")
            .field("delay", &self.inner.delay)
            .field("pending", &self.is_pending())
            .field("subscribers", &self.inner.subscribers.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn next_turns() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    fn counting(notifier: &DebouncingNotifier) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        notifier.subscribe(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_three_notifies_yield_one_flush() {
        let notifier = DebouncingNotifier::default();
        let count = counting(&notifier);

        notifier.notify();
        notifier.notify();
        notifier.notify();
        assert_eq!(count.load(Ordering::SeqCst), 0, "listeners must not run inside notify()");
        assert!(notifier.is_pending());

        next_turns().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!notifier.is_pending());
    }

    #[tokio::test]
    async fn test_notify_after_flush_schedules_again() {
        let notifier = DebouncingNotifier::default();
        let count = counting(&notifier);

        notifier.notify();
        next_turns().await;
        notifier.notify();
        next_turns().await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_subscribers_run_in_registration_order() {
        let notifier = DebouncingNotifier::default();
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in 0..3 {
            let order = order.clone();
            notifier.subscribe(move || order.lock().push(id));
        }

        notifier.notify();
        next_turns().await;

        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_destroy_cancels_pending_flush() {
        let notifier = DebouncingNotifier::new(Duration::from_millis(5));
        let count = counting(&notifier);

        notifier.notify();
        notifier.destroy();
        notifier.destroy();
        next_turns().await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!notifier.is_pending());
    }

    #[tokio::test]
    async fn test_delay_is_respected() {
        let notifier = DebouncingNotifier::new(Duration::from_millis(50));
        let count = counting(&notifier);

        notifier.notify();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_delayed_notifier_coalesces_on_multi_thread_runtime() {
        let notifier = DebouncingNotifier::new(Duration::from_millis(30));
        let count = counting(&notifier);

        notifier.notify();
        notifier.notify();
        notifier.notify();
        assert!(notifier.is_pending());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!notifier.is_pending());
    }

    #[test]
    fn test_notify_without_runtime_is_dropped() {
        let notifier = DebouncingNotifier::default();
        let count = counting(&notifier);
        notifier.notify();
        assert!(!notifier.is_pending());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
