//! In-process semaphore namespace.
//!
//! A `Mutex`/`Condvar` implementation of the named-semaphore capability whose
//! namespace is a shared map instead of the kernel table. Threads stand in for the
//! two processes of a trial. The namespace also records every create, collision and
//! removal so callers can audit the acquisition protocol after the fact.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::semaphore::{NamedBinarySemaphore, SemOptions, SemaphoreNamespace, SyncKey};
use crate::common::error::SemError;

/// One entry in the namespace audit log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamespaceEvent {
    /// A semaphore was created under the key.
    Created(SyncKey),
    /// A create-exclusive attempt found the key taken.
    Collided(SyncKey),
    /// The semaphore under the key was removed.
    Removed(SyncKey),
}

#[derive(Debug, Default)]
struct SlotState {
    value: u32,
    removed: bool,
}

#[derive(Debug, Default)]
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
struct Table {
    slots: HashMap<SyncKey, Arc<Slot>>,
    events: Vec<NamespaceEvent>,
}

/// A process-local semaphore namespace. Clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct LocalNamespace {
    table: Arc<Mutex<Table>>,
}

impl LocalNamespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `key` as taken by some other party, without returning a handle.
    ///
    /// Does not log an event. Returns `false` if the key was already taken.
    pub fn occupy(&self, key: SyncKey) -> bool {
        let mut table = self.lock();
        if table.slots.contains_key(&key) {
            return false;
        }
        let _ = table.slots.insert(key, Arc::new(Slot::default()));
        true
    }

    /// Returns the keys currently alive, sorted.
    pub fn alive(&self) -> Vec<SyncKey> {
        let mut keys: Vec<SyncKey> = self.lock().slots.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Returns whether a semaphore exists under `key`.
    pub fn contains(&self, key: SyncKey) -> bool {
        self.lock().slots.contains_key(&key)
    }

    /// Returns a copy of the audit log.
    pub fn events(&self) -> Vec<NamespaceEvent> {
        self.lock().events.clone()
    }

    /// Reads the value of the semaphore under `key`.
    pub fn value(&self, key: SyncKey) -> Option<u32> {
        let slot = self.lock().slots.get(&key).cloned()?;
        let value = slot.lock().value;
        Some(value)
    }
}

/// Handle to a semaphore in a `LocalNamespace`.
#[derive(Debug)]
pub struct LocalSemaphore {
    key: SyncKey,
    slot: Arc<Slot>,
    namespace: LocalNamespace,
}

impl NamedBinarySemaphore for LocalSemaphore {
    fn key(&self) -> SyncKey {
        self.key
    }

    fn wait(&self) -> Result<(), SemError> {
        let mut state = self.slot.lock();
        while state.value == 0 && !state.removed {
            state = self
                .slot
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.removed {
            return Err(SemError::Removed { key: self.key });
        }
        state.value -= 1;
        Ok(())
    }

    fn signal(&self) -> Result<(), SemError> {
        let mut state = self.slot.lock();
        if state.removed {
            return Err(SemError::Removed { key: self.key });
        }
        state.value = state.value.saturating_add(1);
        self.slot.ready.notify_one();
        Ok(())
    }

    fn remove(&self) -> Result<(), SemError> {
        let mut table = self.namespace.lock();
        match table.slots.get(&self.key) {
            Some(slot) if Arc::ptr_eq(slot, &self.slot) => {
                let _ = table.slots.remove(&self.key);
                table.events.push(NamespaceEvent::Removed(self.key));
            }
            _ => return Err(SemError::NotFound { key: self.key }),
        }
        drop(table);

        self.slot.lock().removed = true;
        self.slot.ready.notify_all();
        Ok(())
    }
}

impl SemaphoreNamespace for LocalNamespace {
    type Semaphore = LocalSemaphore;

    fn create_exclusive(
        &self,
        key: SyncKey,
        options: &SemOptions,
    ) -> Result<LocalSemaphore, SemError> {
        let mut table = self.lock();
        if table.slots.contains_key(&key) {
            table.events.push(NamespaceEvent::Collided(key));
            return Err(SemError::AlreadyExists { key });
        }

        let slot = Arc::new(Slot {
            state: Mutex::new(SlotState {
                value: u32::from(options.initial),
                removed: false,
            }),
            ready: Condvar::new(),
        });
        let _ = table.slots.insert(key, Arc::clone(&slot));
        table.events.push(NamespaceEvent::Created(key));

        Ok(LocalSemaphore {
            key,
            slot,
            namespace: self.clone(),
        })
    }

    fn open(&self, key: SyncKey) -> Result<LocalSemaphore, SemError> {
        let slot = self
            .lock()
            .slots
            .get(&key)
            .cloned()
            .ok_or(SemError::NotFound { key })?;
        Ok(LocalSemaphore {
            key,
            slot,
            namespace: self.clone(),
        })
    }
}
