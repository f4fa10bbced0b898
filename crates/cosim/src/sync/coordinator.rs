//! Two-party handoff coordinator.
//!
//! A `SyncCoordinator` owns (or attaches to) a pair of named semaphores identifying
//! one fuzzing trial. It performs the following:
//! 1. **Acquisition:** Draws random keys until both slots of a pair can be created
//!    exclusively, rolling back slot 0 whenever slot 1 collides.
//! 2. **Handoff:** `yield_control` signals the peer's slot and blocks on its own.
//! 3. **Teardown:** The owning side removes both slots when it is dropped or closed.
//!
//! The protocol assumes both parties strictly alternate `yield_control`. There is no
//! timeout and no deadlock detection; a mismatched call sequence hangs.

use std::fmt;
use std::path::Path;

use rand::Rng;
use tracing::{debug, error, info};

use super::paths::TrialPaths;
use super::semaphore::{NamedBinarySemaphore, SemaphoreNamespace, SyncKey};
use super::sysv::SysV;
use crate::common::constants::{REFERENCE_SLOT, RTL_SLOT};
use crate::common::error::SyncError;
use crate::config::SyncConfig;

/// Which side of the handoff a coordinator acts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The hardware-backed simulator. Waits on slot 1, signals slot 0.
    Rtl,
    /// The ISA reference simulator. Waits on slot 0, signals slot 1.
    Reference,
}

impl Role {
    /// Slot this side blocks on.
    pub const fn own_slot(self) -> i32 {
        match self {
            Self::Rtl => RTL_SLOT,
            Self::Reference => REFERENCE_SLOT,
        }
    }

    /// Slot this side signals to wake the peer.
    pub const fn peer_slot(self) -> i32 {
        self.peer().own_slot()
    }

    /// The other side.
    pub const fn peer(self) -> Self {
        match self {
            Self::Rtl => Self::Reference,
            Self::Reference => Self::Rtl,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rtl => write!(f, "rtl"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Coordinator for one trial's semaphore pair.
pub struct SyncCoordinator<N: SemaphoreNamespace = SysV> {
    key: SyncKey,
    role: Role,
    paths: TrialPaths,
    reference: N::Semaphore,
    rtl: N::Semaphore,
    owner: bool,
}

impl SyncCoordinator<SysV> {
    /// Creates a System V pair for a trial rooted at `output_dir`, acting as the RTL side.
    ///
    /// # Arguments
    ///
    /// * `output_dir` - The trial's working directory. Must be non-empty.
    ///
    /// # Returns
    ///
    /// The owning coordinator, or a `SyncError` on a configuration or OS failure.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, SyncError> {
        let paths = TrialPaths::new(output_dir)?;
        Self::create(&SysV, paths, &SyncConfig::default())
    }
}

impl<N: SemaphoreNamespace> SyncCoordinator<N> {
    /// Creates a new pair in `namespace` under a randomly drawn key.
    ///
    /// Keys are drawn uniformly from `config.key_min..=config.key_max`. The draw is
    /// repeated until a pair is acquired; there is no attempt limit.
    pub fn create(namespace: &N, paths: TrialPaths, config: &SyncConfig) -> Result<Self, SyncError> {
        config.validate()?;
        let mut rng = rand::thread_rng();
        let (min, max) = (config.key_min, config.key_max);
        Self::create_with_keys(namespace, paths, config, || SyncKey(rng.gen_range(min..=max)))
    }

    /// Creates a new pair in `namespace`, drawing candidate keys from `next_key`.
    ///
    /// For each candidate: create slot 0 exclusively (collision: draw again), then
    /// slot 1 exclusively (collision: remove slot 0, draw again). Any other failure
    /// aborts acquisition. On return no single slot of a rejected candidate is left
    /// alive.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Where the semaphores live.
    /// * `paths` - The trial's artifact paths.
    /// * `config` - Permission bits for the created semaphores.
    /// * `next_key` - Candidate key source. Called once per attempt.
    pub fn create_with_keys(
        namespace: &N,
        paths: TrialPaths,
        config: &SyncConfig,
        mut next_key: impl FnMut() -> SyncKey,
    ) -> Result<Self, SyncError> {
        let options = config.sem_options();
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;
            let key = next_key();

            let reference = match namespace.create_exclusive(key.slot(REFERENCE_SLOT), &options) {
                Ok(sem) => sem,
                Err(err) if err.is_collision() => {
                    debug!(%key, attempts, "slot 0 taken, redrawing");
                    continue;
                }
                Err(err) => return Err(SyncError::Acquire(err)),
            };

            let rtl = match namespace.create_exclusive(key.slot(RTL_SLOT), &options) {
                Ok(sem) => sem,
                Err(err) if err.is_collision() => {
                    debug!(%key, attempts, "slot 1 taken, releasing slot 0 and redrawing");
                    reference.remove().map_err(SyncError::Acquire)?;
                    continue;
                }
                Err(err) => {
                    if let Err(rollback) = reference.remove() {
                        error!(%key, %rollback, "slot 0 rollback failed, slot left orphaned");
                    }
                    return Err(SyncError::Acquire(err));
                }
            };

            info!(
                %key,
                attempts,
                output = %paths.output_dir().display(),
                "semaphore pair acquired"
            );
            return Ok(Self {
                key,
                role: Role::Rtl,
                paths,
                reference,
                rtl,
                owner: true,
            });
        }
    }

    /// Opens an existing pair created by the other side.
    ///
    /// The attached coordinator never removes the pair; its owner does.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Where the semaphores live.
    /// * `key` - Base key announced by the owner.
    /// * `role` - Which side this process plays.
    /// * `paths` - The trial's artifact paths.
    pub fn attach(
        namespace: &N,
        key: SyncKey,
        role: Role,
        paths: TrialPaths,
    ) -> Result<Self, SyncError> {
        let open = |slot| {
            namespace
                .open(key.slot(slot))
                .map_err(|source| SyncError::Attach { key, source })
        };
        let reference = open(REFERENCE_SLOT)?;
        let rtl = open(RTL_SLOT)?;

        info!(%key, %role, "attached to semaphore pair");
        Ok(Self {
            key,
            role,
            paths,
            reference,
            rtl,
            owner: false,
        })
    }

    /// Hands control to the peer and blocks until it hands control back.
    ///
    /// Signals the peer's slot, then waits on this side's own slot. Both sides must
    /// call this in strict alternation; calling it twice in a row without a matching
    /// call from the peer blocks forever.
    pub fn yield_control(&self) -> Result<(), SyncError> {
        let (own, peer) = match self.role {
            Role::Rtl => (&self.rtl, &self.reference),
            Role::Reference => (&self.reference, &self.rtl),
        };
        peer.signal().map_err(SyncError::Handoff)?;
        own.wait().map_err(SyncError::Handoff)
    }

    /// Blocks until the peer hands control over, without signaling first.
    ///
    /// The side that does not run first calls this once before entering the
    /// `yield_control` loop.
    pub fn wait_turn(&self) -> Result<(), SyncError> {
        let own = match self.role {
            Role::Rtl => &self.rtl,
            Role::Reference => &self.reference,
        };
        own.wait().map_err(SyncError::Handoff)
    }

    /// Wakes the peer without blocking. Used for the final turn of a session.
    pub fn release(&self) -> Result<(), SyncError> {
        let peer = match self.role {
            Role::Rtl => &self.reference,
            Role::Reference => &self.rtl,
        };
        peer.signal().map_err(SyncError::Handoff)
    }

    /// Base key of the pair. Slot 1 lives at `key + 1`.
    pub const fn key(&self) -> SyncKey {
        self.key
    }

    /// Side this coordinator acts for.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether this coordinator created the pair and will remove it.
    pub const fn is_owner(&self) -> bool {
        self.owner
    }

    /// The trial's artifact paths.
    pub const fn paths(&self) -> &TrialPaths {
        &self.paths
    }

    /// `<output_dir>/.input_0.elf`.
    pub fn target_program_path(&self) -> &Path {
        self.paths.target_program()
    }

    /// `<output_dir>/.rtl_sig_0.txt`.
    pub fn signature_file_path(&self) -> &Path {
        self.paths.signature_file()
    }

    /// Removes the pair (if owned) and reports the outcome instead of terminating.
    pub fn close(mut self) -> Result<(), SyncError> {
        let result = self.teardown();
        self.owner = false;
        result
    }

    fn teardown(&self) -> Result<(), SyncError> {
        if !self.owner {
            return Ok(());
        }
        let reference = self.reference.remove();
        let rtl = self.rtl.remove();
        reference.and(rtl).map_err(SyncError::Teardown)?;
        debug!(key = %self.key, "semaphore pair removed");
        Ok(())
    }
}

impl<N: SemaphoreNamespace> Drop for SyncCoordinator<N> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            error!(key = %self.key, %err, "semaphore pair teardown failed");
            eprintln!("[!] FATAL: {err}");
            std::process::exit(1);
        }
    }
}

impl<N: SemaphoreNamespace> fmt::Debug for SyncCoordinator<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("key", &self.key)
            .field("role", &self.role)
            .field("owner", &self.owner)
            .field("paths", &self.paths)
            .finish()
    }
}
