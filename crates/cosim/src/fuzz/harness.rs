//! Simulation host seam.

use crate::image::ProgramImage;

/// How a run ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code reported by the design (or the host on hang-timeout).
    pub exit_code: i32,
    /// Cycles executed.
    pub cycles: u64,
}

/// The hardware-backed simulator hosting the design and its bridges.
///
/// `run` returns once the program completes or the host's hang timeout fires. While
/// it runs, the host alternates with the reference simulator through a
/// `SyncCoordinator`.
pub trait Harness {
    /// Host failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advances the design by `cycles` target cycles.
    fn step(&mut self, cycles: u64) -> Result<(), Self::Error>;

    /// Loads `image` into the design's memory.
    fn reload(&mut self, image: &ProgramImage) -> Result<(), Self::Error>;

    /// Runs the loaded program to completion or timeout.
    fn run(&mut self) -> Result<RunOutcome, Self::Error>;
}
