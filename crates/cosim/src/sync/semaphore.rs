//! Named semaphore capability.
//!
//! The handoff coordinator never touches an operating-system primitive directly.
//! It relies on the four operations defined here:
//! 1. **Create-exclusive:** Make a new semaphore under a key, failing with
//!    `SemError::AlreadyExists` if the key is taken.
//! 2. **Wait:** Block until the value is positive, then decrement it.
//! 3. **Signal:** Increment the value, waking one waiter.
//! 4. **Remove:** Destroy the semaphore system-wide.
//!
//! Opening an existing semaphore is a fifth, optional operation used by the peer
//! process that attaches to a pair it did not create.

use std::fmt;

use crate::common::error::SemError;

/// A system-wide semaphore key.
///
/// A coordinator draws one key per trial and uses `key` and `key + 1` for the two
/// slots of its pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncKey(pub i32);

impl SyncKey {
    /// Returns the key of slot `slot` of the pair based at this key.
    ///
    /// Wraps on overflow; the configured key range keeps real keys clear of it.
    #[inline]
    pub const fn slot(self, slot: i32) -> Self {
        Self(self.0.wrapping_add(slot))
    }

    /// Returns the raw key value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SyncKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<i32> for SyncKey {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Per-call creation parameters.
///
/// Passed explicitly to every create call instead of living in a shared control
/// block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SemOptions {
    /// Access permission bits (e.g. `0o664`).
    pub permissions: u32,
    /// Initial semaphore value.
    pub initial: u16,
}

impl Default for SemOptions {
    fn default() -> Self {
        Self {
            permissions: 0o664,
            initial: 0,
        }
    }
}

/// A handle to one named semaphore.
pub trait NamedBinarySemaphore {
    /// Key this semaphore was created or opened under.
    fn key(&self) -> SyncKey;

    /// Blocks until the value is positive, then decrements it.
    fn wait(&self) -> Result<(), SemError>;

    /// Increments the value, waking one waiter if any.
    fn signal(&self) -> Result<(), SemError>;

    /// Destroys the semaphore system-wide. Blocked waiters observe `SemError::Removed`.
    ///
    /// The handle is stale afterwards; every further operation on it fails.
    fn remove(&self) -> Result<(), SemError>;
}

/// A namespace of named semaphores (the kernel's System V table, or an in-process map).
pub trait SemaphoreNamespace {
    /// Handle type produced by this namespace.
    type Semaphore: NamedBinarySemaphore;

    /// Creates a semaphore under `key`, failing with `SemError::AlreadyExists` if taken.
    fn create_exclusive(
        &self,
        key: SyncKey,
        options: &SemOptions,
    ) -> Result<Self::Semaphore, SemError>;

    /// Opens an existing semaphore, failing with `SemError::NotFound` if absent.
    fn open(&self, key: SyncKey) -> Result<Self::Semaphore, SemError>;
}
