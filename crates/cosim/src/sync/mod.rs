//! Cross-process handoff between the RTL simulator and the ISA reference simulator.
//!
//! This module implements the baton-passing protocol of a trial. It provides:
//! 1. **Capability:** The `NamedBinarySemaphore` and `SemaphoreNamespace` traits.
//! 2. **Backends:** System V semaphores (`SysV`) and an in-process namespace (`LocalNamespace`).
//! 3. **Coordination:** `SyncCoordinator`, which negotiates a collision-free pair and
//!    alternates control between exactly two parties.
//! 4. **Paths:** `TrialPaths`, the fixed artifact names under a trial's output directory.

/// The `SyncCoordinator` and its `Role`.
pub mod coordinator;

/// In-process semaphore namespace with an audit log.
pub mod local;

/// Trial artifact paths.
pub mod paths;

/// The named semaphore capability.
pub mod semaphore;

/// System V semaphore backend.
pub mod sysv;

pub use coordinator::{Role, SyncCoordinator};
pub use local::{LocalNamespace, LocalSemaphore, NamespaceEvent};
pub use paths::TrialPaths;
pub use semaphore::{NamedBinarySemaphore, SemOptions, SemaphoreNamespace, SyncKey};
pub use sysv::{SysV, SysVSemaphore};
