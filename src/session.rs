//! The session: one explicit state container for everything mutable.
//!
//! All mutable workspace state (the file store, the terminal log, the
//! specialist indicator, the single "processing" flag) lives here behind
//! controlled entry points instead of scattered module-level variables. Handlers lock the state for synchronous mutation only; the two
//! backend calls happen outside the lock, serialized by the in-flight guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, broadcast};
use uuid::Uuid;

use crate::runner::{TerminalEntry, TerminalLog};
use crate::workspace::{VirtualFile, WorkspaceStore};

/// Capacity of the event broadcast channel.
const EVENT_CAPACITY: usize = 256;

/// A mutation observed by connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    FileCreated { file: VirtualFile },
    FileUpdated { id: Uuid },
    TabOpened { id: Uuid },
    TabClosed { id: Uuid, active: Option<Uuid> },
    SpecialistChanged { specialist: Option<String> },
    TerminalAppended { entry: TerminalEntry },
    TerminalCleared,
}

/// Mutable session state. Only ever touched through [`SessionHandle::lock`].
#[derive(Debug, Default)]
pub struct Session {
    pub store: WorkspaceStore,
    pub terminal: TerminalLog,
    /// Label of the specialist the model last spoke as.
    pub specialist: Option<String>,
}

/// Shared handle to the session: async mutex over the state, the in-flight
/// guard, and the event broadcast.
pub struct SessionHandle {
    state: Mutex<Session>,
    busy: AtomicBool,
    events: broadcast::Sender<WorkspaceEvent>,
}

impl SessionHandle {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            state: Mutex::new(Session::default()),
            busy: AtomicBool::new(false),
            events,
        })
    }

    /// Lock the session state for synchronous mutation.
    ///
    /// Never hold the guard across a backend call.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().await
    }

    /// Try to claim the single in-flight request slot.
    ///
    /// Returns `None` when another backend request (chat send or code run)
    /// is outstanding. The slot is released when the returned guard drops,
    /// on every exit path.
    pub fn try_begin_request(&self) -> Option<RequestGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RequestGuard { busy: &self.busy })
    }

    /// Whether a backend request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Broadcast an event to all subscribers. Lossy when nobody listens.
    pub fn emit(&self, event: WorkspaceEvent) {
        let _ = self.events.send(event);
    }

    /// Subscribe to the event broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }
}

/// RAII claim on the in-flight request slot.
pub struct RequestGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
