//! Connectivity monitor port - single source of truth for "is the
//! network currently usable".
//!
//! The subscriber contract is an explicit observer abstraction rather
//! than ambient event dispatch: listeners are invoked in registration
//! order on every state transition, and disposal is deterministic and
//! idempotent.

use std::sync::Mutex;

use crate::connectivity::ConnectivityState;

/// Callback invoked on every connectivity transition.
///
/// Listeners must not block: schedule work (e.g. an unbounded channel
/// send), do not perform it inside the callback.
pub type ConnectivityListener = Box<dyn Fn(ConnectivityState) + Send + Sync>;

/// Handle returned by [`ConnectivityMonitorPort::subscribe`].
///
/// Dropping the handle unsubscribes; [`Subscription::cancel`] does the
/// same explicitly and is safe to call any number of times.
pub struct Subscription {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    pub fn cancel(&self) {
        let cancel = self.cancel.lock().ok().and_then(|mut slot| slot.take());
        if let Some(cancel) = cancel {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self
            .cancel
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false);
        f.debug_struct("Subscription").field("active", &active).finish()
    }
}

/// Single source of truth for network usability, exposed to any number
/// of subscribers.
pub trait ConnectivityMonitorPort: Send + Sync {
    /// Last known state; lock-free, never blocks.
    fn is_online(&self) -> bool;

    /// Register a listener invoked on every state transition, in
    /// registration order. Transitions are delivered in the order they
    /// occurred, never reordered or dropped by the monitor.
    fn subscribe(&self, listener: ConnectivityListener) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::Subscription;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn cancel_runs_the_disposer_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_disposer = calls.clone();
        let subscription = Subscription::new(move || {
            calls_in_disposer.fetch_add(1, Ordering::SeqCst);
        });

        subscription.cancel();
        subscription.cancel();
        drop(subscription);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_runs_the_disposer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_disposer = calls.clone();
        drop(Subscription::new(move || {
            calls_in_disposer.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
