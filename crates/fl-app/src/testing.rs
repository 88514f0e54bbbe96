//! Test doubles for the fl-core ports, shared by use-case unit tests and
//! the end-to-end suites.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fl_core::connectivity::ConnectivityState;
use fl_core::ids::UploadId;
use fl_core::ports::{
    ClockPort, ConnectivityListener, ConnectivityMonitorPort, QueueCounts, QueueError,
    Subscription, UploadEndpointPort, UploadError, UploadPatch, UploadQueuePort,
};
use fl_core::upload::{UploadItem, UploadStatus};

/// In-memory upload queue. A `Vec` in enqueue order keeps the FIFO
/// contract observable without a database.
#[derive(Default)]
pub struct MemoryUploadQueue {
    records: Mutex<Vec<UploadItem>>,
}

impl MemoryUploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut Vec<UploadItem>) -> T) -> T {
        let mut records = self.records.lock().expect("records lock");
        f(&mut records)
    }
}

#[async_trait]
impl UploadQueuePort for MemoryUploadQueue {
    async fn enqueue(&self, item: UploadItem) -> Result<(), QueueError> {
        self.with_records(|records| {
            if records.iter().any(|existing| existing.id == item.id) {
                return Err(QueueError::DuplicateId(item.id.clone()));
            }
            records.push(item);
            Ok(())
        })
    }

    async fn get(&self, id: &UploadId) -> Result<Option<UploadItem>, QueueError> {
        Ok(self.with_records(|records| {
            records.iter().find(|item| &item.id == id).cloned()
        }))
    }

    async fn list_pending(&self) -> Result<Vec<UploadItem>, QueueError> {
        Ok(self.with_records(|records| {
            records
                .iter()
                .filter(|item| item.status == UploadStatus::Pending)
                .cloned()
                .collect()
        }))
    }

    async fn list_failed(&self) -> Result<Vec<UploadItem>, QueueError> {
        Ok(self.with_records(|records| {
            records
                .iter()
                .filter(|item| item.status == UploadStatus::Failed)
                .cloned()
                .collect()
        }))
    }

    async fn delete(&self, id: &UploadId) -> Result<(), QueueError> {
        self.with_records(|records| records.retain(|item| &item.id != id));
        Ok(())
    }

    async fn update(&self, id: &UploadId, patch: UploadPatch) -> Result<(), QueueError> {
        self.with_records(|records| {
            let Some(item) = records.iter_mut().find(|item| &item.id == id) else {
                return Err(QueueError::NotFound(id.clone()));
            };
            if let Some(status) = patch.status {
                item.status = status;
            }
            if let Some(attempts) = patch.attempts {
                item.attempts = attempts;
            }
            if let Some(last_error) = patch.last_error {
                item.last_error = last_error;
            }
            Ok(())
        })
    }

    async fn counts(&self) -> Result<QueueCounts, QueueError> {
        Ok(self.with_records(|records| {
            let mut counts = QueueCounts::default();
            for item in records.iter() {
                match item.status {
                    UploadStatus::Pending => counts.pending += 1,
                    UploadStatus::Uploading => counts.uploading += 1,
                    UploadStatus::Failed => counts.failed += 1,
                    UploadStatus::Done => {}
                }
            }
            counts
        }))
    }
}

type AttemptHook = Box<dyn Fn(&UploadItem) + Send + Sync>;

/// Scripted upload endpoint: pops one result per attempt and falls back
/// to success once the script is exhausted. Records every attempted id.
///
/// An optional gate parks each attempt until the test releases it,
/// which makes "a pass is currently in flight" observable.
#[derive(Default)]
pub struct ScriptedEndpoint {
    script: Mutex<VecDeque<Result<(), UploadError>>>,
    attempts: Mutex<Vec<UploadId>>,
    on_attempt: Mutex<Option<AttemptHook>>,
    gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
}

impl ScriptedEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_result(&self, result: Result<(), UploadError>) {
        self.script.lock().expect("script lock").push_back(result);
    }

    /// Hook invoked at the start of every attempt, before the scripted
    /// result is returned. Used to flip connectivity mid-attempt.
    pub fn set_attempt_hook(&self, hook: impl Fn(&UploadItem) + Send + Sync + 'static) {
        *self.on_attempt.lock().expect("hook lock") = Some(Box::new(hook));
    }

    /// Park every attempt until the returned handle is notified.
    pub fn set_gate(&self, gate: Arc<tokio::sync::Notify>) {
        *self.gate.lock().expect("gate lock") = Some(gate);
    }

    pub fn clear_gate(&self) {
        *self.gate.lock().expect("gate lock") = None;
    }

    pub fn attempted_ids(&self) -> Vec<UploadId> {
        self.attempts.lock().expect("attempts lock").clone()
    }
}

#[async_trait]
impl UploadEndpointPort for ScriptedEndpoint {
    async fn upload(&self, item: &UploadItem) -> Result<(), UploadError> {
        self.attempts
            .lock()
            .expect("attempts lock")
            .push(item.id.clone());
        if let Some(hook) = self.on_attempt.lock().expect("hook lock").as_ref() {
            hook(item);
        }
        let gate = self.gate.lock().expect("gate lock").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

type ListenerSlot = (u64, Arc<ConnectivityListener>);

/// Minimal connectivity monitor double with the full subscriber
/// contract, flipped from tests via [`ToggleMonitor::set_online`].
pub struct ToggleMonitor {
    online: AtomicBool,
    listeners: Arc<Mutex<Vec<ListenerSlot>>>,
    next_handle: Mutex<u64>,
}

impl ToggleMonitor {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_handle: Mutex::new(0),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().expect("listeners lock").len()
    }

    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return;
        }
        let state = ConnectivityState::from_reachable(online);
        let listeners: Vec<Arc<ConnectivityListener>> = self
            .listeners
            .lock()
            .expect("listeners lock")
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }
}

impl ConnectivityMonitorPort for ToggleMonitor {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn subscribe(&self, listener: ConnectivityListener) -> Subscription {
        let handle = {
            let mut next_handle = self.next_handle.lock().expect("handle lock");
            let handle = *next_handle;
            *next_handle += 1;
            handle
        };
        self.listeners
            .lock()
            .expect("listeners lock")
            .push((handle, Arc::new(listener)));

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners
                .lock()
                .expect("listeners lock")
                .retain(|(id, _)| *id != handle);
        })
    }
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}
