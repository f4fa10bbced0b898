//! Trial driver.
//!
//! One `TrialDriver` per simulation instance. `init` enables the accumulator once;
//! each `run_trial` then walks:
//!
//! `IDLE -> RESET -> RESET_DONE -> RELOAD -> RUNNING -> COLLECT -> PERSIST -> IDLE`
//!
//! A failure at any step abandons the trial and returns the driver to `IDLE`.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::harness::Harness;
use super::{TrialResult, TrialState};
use crate::bridge::{BridgeMmio, CoverageBridge};
use crate::common::error::TrialError;
use crate::config::{BridgeConfig, Config, FuzzConfig};
use crate::image::ProgramImage;
use crate::sync::TrialPaths;

/// Runs fuzzing trials against one design instance.
#[derive(Debug)]
pub struct TrialDriver<M, H> {
    bridge: CoverageBridge<M>,
    harness: H,
    paths: TrialPaths,
    bridge_config: BridgeConfig,
    fuzz_config: FuzzConfig,
    state: TrialState,
    trials: u64,
}

impl<M: BridgeMmio, H: Harness> TrialDriver<M, H> {
    /// Creates a driver.
    ///
    /// # Arguments
    ///
    /// * `mmio` - Register transport to the coverage bridge.
    /// * `harness` - The simulation host.
    /// * `paths` - The trial's artifact paths; the image is read from `target_program`.
    /// * `config` - Bridge register map and timing, and result destinations.
    pub fn new(mmio: M, harness: H, paths: TrialPaths, config: &Config) -> Self {
        Self {
            bridge: CoverageBridge::new(mmio, config.bridge.registers),
            harness,
            paths,
            bridge_config: config.bridge.clone(),
            fuzz_config: config.fuzz.clone(),
            state: TrialState::Idle,
            trials: 0,
        }
    }

    /// Enables coverage accumulation. Call once before the first trial.
    pub fn init(&mut self) {
        self.bridge.cov_init(self.bridge_config.cov_init_value);
    }

    /// Pulses the meta-state reset line for one cycle.
    ///
    /// Clears mutator-visible meta-state at the start of a campaign. The accumulator
    /// is unaffected.
    pub fn reset_meta(&mut self) -> Result<(), TrialError> {
        self.bridge.meta_reset(true);
        let stepped = self.harness.step(1).map_err(harness_error);
        self.bridge.meta_reset(false);
        stepped
    }

    /// Runs one trial and persists its result.
    ///
    /// # Returns
    ///
    /// The trial's `TrialResult`, or the `TrialError` that abandoned it.
    pub fn run_trial(&mut self) -> Result<TrialResult, TrialError> {
        let result = self.walk();
        if let Err(err) = &result {
            warn!(state = %self.state, %err, "trial abandoned");
            self.state = TrialState::Idle;
        }
        result
    }

    /// Runs `count` trials back to back, stopping at the first failure.
    pub fn run_trials(&mut self, count: u64) -> Result<Vec<TrialResult>, TrialError> {
        (0..count).map(|_| self.run_trial()).collect()
    }

    fn walk(&mut self) -> Result<TrialResult, TrialError> {
        self.advance(TrialState::Reset);
        self.bridge.bridge_reset(true);
        if let Err(err) = self.harness.step(self.bridge_config.reset_cycles) {
            self.bridge.bridge_reset(false);
            return Err(harness_error(err));
        }

        self.advance(TrialState::ResetDone);
        self.bridge.bridge_reset(false);

        self.advance(TrialState::Reload);
        let image = ProgramImage::load(self.paths.target_program())?;
        self.harness.reload(&image).map_err(harness_error)?;

        self.advance(TrialState::Running);
        let outcome = self.harness.run().map_err(harness_error)?;

        self.advance(TrialState::Collect);
        let coverage = self.bridge.read_covsum();
        let result = TrialResult {
            exit_code: outcome.exit_code,
            coverage,
            cycles: outcome.cycles,
        };

        self.advance(TrialState::Persist);
        self.persist(&result)?;

        self.advance(TrialState::Idle);
        self.trials += 1;
        info!(
            trial = self.trials,
            exit_code = result.exit_code,
            coverage = result.coverage,
            cycles = result.cycles,
            "trial complete"
        );
        Ok(result)
    }

    fn advance(&mut self, to: TrialState) {
        debug_assert_eq!(self.state.next(), to);
        debug!(from = %self.state, %to, "trial state");
        self.state = to;
    }

    fn persist(&self, result: &TrialResult) -> Result<(), TrialError> {
        write_file(&self.fuzz_config.covsum_path, &result.coverage.to_string())?;
        if let Some(path) = &self.fuzz_config.result_path {
            write_file(path, &serde_json::to_string(result)?)?;
        }
        Ok(())
    }

    /// Current phase.
    pub const fn state(&self) -> TrialState {
        self.state
    }

    /// Trials completed so far.
    pub const fn trials(&self) -> u64 {
        self.trials
    }

    /// The coverage bridge.
    pub const fn bridge(&self) -> &CoverageBridge<M> {
        &self.bridge
    }

    /// Mutable access to the coverage bridge.
    pub const fn bridge_mut(&mut self) -> &mut CoverageBridge<M> {
        &mut self.bridge
    }

    /// The simulation host.
    pub const fn harness(&self) -> &H {
        &self.harness
    }

    /// Mutable access to the simulation host.
    pub const fn harness_mut(&mut self) -> &mut H {
        &mut self.harness
    }

    /// The trial's artifact paths.
    pub const fn paths(&self) -> &TrialPaths {
        &self.paths
    }
}

fn harness_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> TrialError {
    TrialError::Harness(Box::new(err))
}

fn write_file(path: &Path, contents: &str) -> Result<(), TrialError> {
    fs::write(path, contents).map_err(|source| TrialError::Persist {
        path: path.to_path_buf(),
        source,
    })
}
