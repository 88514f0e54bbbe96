use std::sync::{Arc, Mutex};

use serde::Serialize;

use fl_core::connectivity::ConnectivityState;
use fl_core::ports::{ConnectivityMonitorPort, Subscription};

/// What the sync badge shows. Purely presentational: connectivity in,
/// label out, no business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncBadge {
    Online,
    OfflinePendingSync,
}

impl SyncBadge {
    fn from_state(state: ConnectivityState) -> Self {
        match state {
            ConnectivityState::Online => Self::Online,
            ConnectivityState::Offline => Self::OfflinePendingSync,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::OfflinePendingSync => "Offline — pending sync",
        }
    }
}

/// Connectivity indicator model for a UI shell.
///
/// Subscribes to the monitor on attach and renders only the last
/// reported state; dropping the indicator unsubscribes.
pub struct SyncIndicator {
    badge: Arc<Mutex<SyncBadge>>,
    _subscription: Subscription,
}

impl SyncIndicator {
    pub fn attach(monitor: &dyn ConnectivityMonitorPort) -> Self {
        let initial = ConnectivityState::from_reachable(monitor.is_online());
        let badge = Arc::new(Mutex::new(SyncBadge::from_state(initial)));

        let badge_in_listener = badge.clone();
        let subscription = monitor.subscribe(Box::new(move |state| {
            if let Ok(mut badge) = badge_in_listener.lock() {
                *badge = SyncBadge::from_state(state);
            }
        }));

        Self {
            badge,
            _subscription: subscription,
        }
    }

    pub fn badge(&self) -> SyncBadge {
        self.badge
            .lock()
            .map(|badge| *badge)
            .unwrap_or(SyncBadge::OfflinePendingSync)
    }

    pub fn label(&self) -> &'static str {
        self.badge().label()
    }
}
