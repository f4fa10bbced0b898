//! Configuration for the co-simulation plumbing.
//!
//! This module defines the configuration structures used to parameterize the
//! handoff, the coverage bridge, and the trial driver. It provides:
//! 1. **Defaults:** Baseline constants (key range, permissions, register offsets, reset timing).
//! 2. **Structures:** Hierarchical config for general, sync, bridge, and fuzz settings.
//! 3. **Validation:** Range checks that must hold before any semaphore is created.
//!
//! Configuration is supplied as JSON (from the Python mutator or a file) or built
//! with `Config::default()`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::sync::SemOptions;

/// Default configuration constants.
mod defaults {
    /// Smallest key a coordinator draws. Zero is `IPC_PRIVATE` and never a shared key.
    pub const KEY_MIN: i32 = 1;

    /// Largest key a coordinator draws; leaves room for slot 1 at `key + 1`.
    pub const KEY_MAX: i32 = i32::MAX - 1;

    /// Semaphore permission bits (`rw-rw-r--`).
    pub const PERMISSIONS: u32 = 0o664;

    /// Offset of the coverage enable register.
    pub const COV_INIT_REG: u64 = 0x00;

    /// Offset of the domain reset register.
    pub const BRIDGE_RESET_REG: u64 = 0x04;

    /// Offset of the meta reset register.
    pub const META_RESET_REG: u64 = 0x08;

    /// Offset of the coverage sum register.
    pub const COV_SUM_REG: u64 = 0x0C;

    /// Cycles the domain reset line is held high at the start of a trial.
    pub const RESET_CYCLES: u64 = 5;

    /// Value written to the coverage enable register by `TrialDriver::init`.
    pub const COV_INIT_VALUE: u32 = 1_048_576;
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Semaphore pair negotiation.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Coverage bridge register map and timing.
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Trial driver output.
    #[serde(default)]
    pub fuzz: FuzzConfig,
}

impl Config {
    /// Parses a JSON configuration document and validates it.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON text. Missing sections and fields take their defaults.
    ///
    /// # Returns
    ///
    /// The validated `Config`, or a `ConfigError`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sync.validate()?;
        match &self.general.output_dir {
            Some(dir) if dir.as_os_str().is_empty() => Err(ConfigError::EmptyOutputDir),
            _ => Ok(()),
        }
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Trial output directory. Usually supplied as `+output=<dir>` instead.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Log every schedule entry at construction and every interrupt assertion.
    #[serde(default)]
    pub debug_interrupts: bool,
}

/// Semaphore pair negotiation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Permission bits for created semaphores.
    #[serde(default = "SyncConfig::default_permissions")]
    pub permissions: u32,

    /// Smallest key drawn (inclusive).
    #[serde(default = "SyncConfig::default_key_min")]
    pub key_min: i32,

    /// Largest key drawn (inclusive).
    #[serde(default = "SyncConfig::default_key_max")]
    pub key_max: i32,
}

impl SyncConfig {
    const fn default_permissions() -> u32 {
        defaults::PERMISSIONS
    }

    const fn default_key_min() -> i32 {
        defaults::KEY_MIN
    }

    const fn default_key_max() -> i32 {
        defaults::KEY_MAX
    }

    /// Rejects ranges that are empty, include zero or negatives, or would overflow slot 1.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.key_min < 1 || self.key_min > self.key_max || self.key_max == i32::MAX {
            return Err(ConfigError::InvalidKeyRange {
                min: self.key_min,
                max: self.key_max,
            });
        }
        Ok(())
    }

    /// Creation options for each semaphore of the pair. Both start at zero.
    pub const fn sem_options(&self) -> SemOptions {
        SemOptions {
            permissions: self.permissions,
            initial: 0,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            permissions: defaults::PERMISSIONS,
            key_min: defaults::KEY_MIN,
            key_max: defaults::KEY_MAX,
        }
    }
}

/// Register offsets of the coverage bridge, relative to the bridge's MMIO base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BridgeRegisterMap {
    /// Coverage accumulator enable.
    #[serde(default = "BridgeRegisterMap::default_cov_init")]
    pub cov_init: u64,
    /// Design-under-test domain reset line.
    #[serde(default = "BridgeRegisterMap::default_bridge_reset")]
    pub bridge_reset: u64,
    /// Meta-state reset line.
    #[serde(default = "BridgeRegisterMap::default_meta_reset")]
    pub meta_reset: u64,
    /// Coverage accumulator value (read-only).
    #[serde(default = "BridgeRegisterMap::default_cov_sum")]
    pub cov_sum: u64,
}

impl BridgeRegisterMap {
    const fn default_cov_init() -> u64 {
        defaults::COV_INIT_REG
    }

    const fn default_bridge_reset() -> u64 {
        defaults::BRIDGE_RESET_REG
    }

    const fn default_meta_reset() -> u64 {
        defaults::META_RESET_REG
    }

    const fn default_cov_sum() -> u64 {
        defaults::COV_SUM_REG
    }
}

impl Default for BridgeRegisterMap {
    fn default() -> Self {
        Self {
            cov_init: defaults::COV_INIT_REG,
            bridge_reset: defaults::BRIDGE_RESET_REG,
            meta_reset: defaults::META_RESET_REG,
            cov_sum: defaults::COV_SUM_REG,
        }
    }
}

/// Coverage bridge settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Register offsets.
    #[serde(default)]
    pub registers: BridgeRegisterMap,

    /// Cycles to hold the domain reset line high.
    #[serde(default = "BridgeConfig::default_reset_cycles")]
    pub reset_cycles: u64,

    /// Value written to the enable register once before the first trial.
    #[serde(default = "BridgeConfig::default_cov_init_value")]
    pub cov_init_value: u32,
}

impl BridgeConfig {
    const fn default_reset_cycles() -> u64 {
        defaults::RESET_CYCLES
    }

    const fn default_cov_init_value() -> u32 {
        defaults::COV_INIT_VALUE
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            registers: BridgeRegisterMap::default(),
            reset_cycles: defaults::RESET_CYCLES,
            cov_init_value: defaults::COV_INIT_VALUE,
        }
    }
}

/// Trial driver output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FuzzConfig {
    /// File receiving the decimal coverage sum after every trial.
    #[serde(default = "FuzzConfig::default_covsum_path")]
    pub covsum_path: PathBuf,

    /// Optional file receiving the full trial result as JSON.
    #[serde(default)]
    pub result_path: Option<PathBuf>,
}

impl FuzzConfig {
    fn default_covsum_path() -> PathBuf {
        PathBuf::from(crate::common::constants::DEFAULT_COVSUM_PATH)
    }
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            covsum_path: Self::default_covsum_path(),
            result_path: None,
        }
    }
}
