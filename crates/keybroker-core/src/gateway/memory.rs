use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::events::KeyringEvent;
use super::traits::{EventEmitter, StateStore};
use crate::error::{Error, Result};
use crate::state::KeyringState;

/// In-memory state store.
///
/// Holds the last persisted snapshot and can be switched into a failing
/// mode to exercise storage error paths.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    snapshot: Mutex<Option<KeyringState>>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStateStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a document
    #[must_use]
    pub fn with_state(state: KeyringState) -> Self {
        Self {
            snapshot: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Last persisted document
    #[must_use]
    pub fn snapshot(&self) -> Option<KeyringState> {
        self.snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Number of successful persists
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Storage("memory store is failing".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<KeyringState> {
        self.check()?;
        Ok(self.snapshot().unwrap_or_default())
    }

    async fn persist(&self, state: &KeyringState) -> Result<()> {
        self.check()?;
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|_| Error::Storage("memory store poisoned".to_string()))?;
        *snapshot = Some(state.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Emitter that keeps every delivered event.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<KeyringEvent>>,
    failing: AtomicBool,
}

impl RecordingEmitter {
    /// Create an emitter that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent event (or accept again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Events delivered so far
    #[must_use]
    pub fn events(&self) -> Vec<KeyringEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Most recently delivered event
    #[must_use]
    pub fn last(&self) -> Option<KeyringEvent> {
        self.events().pop()
    }
}

#[async_trait]
impl EventEmitter for RecordingEmitter {
    async fn emit(&self, event: KeyringEvent) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Notification(format!(
                "host rejected {}",
                event.kind()
            )));
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
        Ok(())
    }
}
