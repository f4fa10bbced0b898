//! Error definitions.
//!
//! Every fallible operation in the crate returns one of the enums below. The
//! split follows the failure taxonomy of the handoff subsystem:
//! 1. **Collisions:** `SemError::AlreadyExists`, recovered locally by redrawing a key.
//! 2. **Acquisition failures:** any other `SemError`, fatal to the caller.
//! 3. **Configuration errors:** `ConfigError`, fatal at startup.
//! 4. **Input errors:** `ScheduleError` and `ImageError` for mutator-produced artifacts.
//!
//! Protocol-ordering violations in `yield_control` have no error type: they show up
//! as a hang.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::sync::SyncKey;

/// Failure of a single named-semaphore operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemError {
    /// Create-exclusive found an existing semaphore under this key.
    #[error("semaphore {key} already exists")]
    AlreadyExists {
        /// The contended key.
        key: SyncKey,
    },

    /// No semaphore exists under this key.
    #[error("semaphore {key} does not exist")]
    NotFound {
        /// The missing key.
        key: SyncKey,
    },

    /// The semaphore was removed while the operation was in progress.
    #[error("semaphore {key} was removed")]
    Removed {
        /// The removed key.
        key: SyncKey,
    },

    /// Any other operating-system failure.
    #[error("{op} on semaphore {key} failed: {}", os_message(.errno))]
    Os {
        /// Name of the failing system call.
        op: &'static str,
        /// Key of the semaphore involved.
        key: SyncKey,
        /// Raw `errno` value.
        errno: i32,
    },
}

fn os_message(errno: &i32) -> io::Error {
    io::Error::from_raw_os_error(*errno)
}

impl SemError {
    /// Returns `true` for the one recoverable case, a key collision.
    pub const fn is_collision(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Failure of the handoff coordinator.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The coordinator was misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Creating the semaphore pair failed for a reason other than a collision.
    #[error("failed to acquire semaphore pair: {0}")]
    Acquire(#[source] SemError),

    /// Opening an existing pair failed.
    #[error("failed to attach to semaphore pair {key}: {source}")]
    Attach {
        /// Base key of the pair.
        key: SyncKey,
        /// Underlying semaphore failure.
        #[source]
        source: SemError,
    },

    /// Signal or wait failed during `yield_control`.
    #[error("handoff failed: {0}")]
    Handoff(#[source] SemError),

    /// Removing the pair at teardown failed.
    #[error("failed to remove semaphore pair: {0}")]
    Teardown(#[source] SemError),
}

/// Invalid or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The output directory argument was missing or empty.
    #[error("output directory must not be empty")]
    EmptyOutputDir,

    /// The key range is empty, includes `IPC_PRIVATE`, or leaves no room for slot 1.
    #[error("invalid semaphore key range {min}..={max}")]
    InvalidKeyRange {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// A configuration document failed to parse.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Malformed interrupt schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A line lacked the `<pc>:<bits>` shape.
    #[error("line {line}: expected `<pc>:<bits>`, found `{text}`")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// The PC field was not a hexadecimal number.
    #[error("line {line}: invalid program counter `{text}`")]
    InvalidPc {
        /// One-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// The value field was not a binary number.
    #[error("line {line}: invalid interrupt bits `{text}`")]
    InvalidValue {
        /// One-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// The value does not fit in the four-bit assertion field.
    #[error("interrupt value {value:#b} does not fit in 4 bits")]
    ValueTooWide {
        /// The rejected value.
        value: u64,
    },

    /// Two entries named the same PC.
    #[error("duplicate schedule entry for pc {pc:#x}")]
    DuplicatePc {
        /// The repeated PC.
        pc: u64,
    },

    /// The schedule file could not be read.
    #[error("failed to read schedule {}: {source}", .path.display())]
    Io {
        /// Schedule path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Unreadable or malformed program image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("failed to read program image {}: {source}", .path.display())]
    Io {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file is not a parseable ELF object.
    #[error("program image {} is not a valid ELF file: {reason}", .path.display())]
    Parse {
        /// Image path.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Failure of one fuzzing trial.
#[derive(Debug, Error)]
pub enum TrialError {
    /// The program image could not be loaded.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The simulation host reported a failure.
    #[error("harness failure: {0}")]
    Harness(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Persisting the trial result failed.
    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Encoding the trial result failed.
    #[error("failed to encode trial result: {0}")]
    Encode(#[from] serde_json::Error),
}
