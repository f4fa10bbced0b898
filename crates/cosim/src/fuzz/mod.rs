//! Trial loop.
//!
//! Drives the coverage bridge and the simulation host through one
//! reset, reload, run, collect, persist cycle per trial. It provides:
//! 1. **Host Seam:** The `Harness` trait for the hardware-backed simulator.
//! 2. **State Machine:** `TrialState` and the transitions `TrialDriver` walks.
//! 3. **Results:** `TrialResult`, persisted for the external mutator.

/// The `TrialDriver`.
pub mod driver;

/// The simulation host seam.
pub mod harness;

pub use driver::TrialDriver;
pub use harness::{Harness, RunOutcome};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the trial loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrialState {
    /// Between trials.
    #[default]
    Idle,
    /// Domain reset line held high.
    Reset,
    /// Domain reset line released.
    ResetDone,
    /// Program image being loaded into the design.
    Reload,
    /// Design executing; the two simulators alternate.
    Running,
    /// Reading the coverage accumulator.
    Collect,
    /// Writing the trial result.
    Persist,
}

impl TrialState {
    /// The state that follows this one.
    pub const fn next(self) -> Self {
        match self {
            Self::Idle => Self::Reset,
            Self::Reset => Self::ResetDone,
            Self::ResetDone => Self::Reload,
            Self::Reload => Self::Running,
            Self::Running => Self::Collect,
            Self::Collect => Self::Persist,
            Self::Persist => Self::Idle,
        }
    }
}

impl fmt::Display for TrialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Reset => "RESET",
            Self::ResetDone => "RESET_DONE",
            Self::Reload => "RELOAD",
            Self::Running => "RUNNING",
            Self::Collect => "COLLECT",
            Self::Persist => "PERSIST",
        };
        f.write_str(name)
    }
}

/// Outcome of one trial, handed to the mutator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Exit code reported by the design.
    pub exit_code: i32,
    /// Coverage accumulator value at the end of the run.
    pub coverage: u32,
    /// Cycles the run took.
    pub cycles: u64,
}
