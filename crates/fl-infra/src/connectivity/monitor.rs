//! Connectivity monitor with an explicit, ordered subscriber registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use fl_core::connectivity::ConnectivityState;
use fl_core::ports::{ConnectivityListener, ConnectivityMonitorPort, Subscription};

#[derive(Default)]
struct SubscriberRegistry {
    next_handle: u64,
    /// Insertion-ordered; notification order equals registration order.
    listeners: Vec<(u64, Arc<ConnectivityListener>)>,
}

/// Single source of truth for network usability.
///
/// State changes come in through [`ConnectivityMonitor::report`], fed
/// either by a platform event source or by the polling
/// [`ReachabilityProbeTask`](crate::connectivity::ReachabilityProbeTask)
/// fallback. `report` deduplicates non-transitions and notifies
/// subscribers while holding the state lock, so rapid transitions reach
/// every listener in the order they occurred.
pub struct ConnectivityMonitor {
    /// Authoritative state; the lock serializes transition delivery.
    state: Mutex<ConnectivityState>,
    /// Lock-free mirror of `state` for `is_online`.
    online: AtomicBool,
    registry: Arc<Mutex<SubscriberRegistry>>,
}

impl ConnectivityMonitor {
    pub fn new(initial: ConnectivityState) -> Self {
        Self {
            state: Mutex::new(initial),
            online: AtomicBool::new(initial.is_online()),
            registry: Arc::new(Mutex::new(SubscriberRegistry::default())),
        }
    }

    /// Feed an observed state. No-op unless it is a transition.
    ///
    /// Listeners run synchronously on the reporting thread and must not
    /// block; they schedule work, they do not perform it.
    pub fn report(&self, observed: ConnectivityState) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if *state == observed {
            return;
        }
        *state = observed;
        self.online.store(observed.is_online(), Ordering::Release);
        debug!(state = ?observed, "connectivity transition");

        let listeners: Vec<Arc<ConnectivityListener>> = match self.registry.lock() {
            Ok(registry) => registry
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(observed);
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(ConnectivityState::Offline)
    }
}

impl ConnectivityMonitorPort for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    fn subscribe(&self, listener: ConnectivityListener) -> Subscription {
        let handle = {
            let Ok(mut registry) = self.registry.lock() else {
                return Subscription::new(|| {});
            };
            let handle = registry.next_handle;
            registry.next_handle += 1;
            registry.listeners.push((handle, Arc::new(listener)));
            handle
        };

        let registry = Arc::clone(&self.registry);
        Subscription::new(move || {
            if let Ok(mut registry) = registry.lock() {
                registry.listeners.retain(|(id, _)| *id != handle);
            }
        })
    }
}
