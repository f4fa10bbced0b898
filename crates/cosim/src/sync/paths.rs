//! Trial artifact paths.
//!
//! Both simulators and the signature comparator agree on two fixed file names
//! under a per-trial output directory.

use std::path::{Path, PathBuf};

use crate::common::constants::{OUTPUT_PLUSARG, SIGNATURE_FILE_NAME, TARGET_PROGRAM_NAME};
use crate::common::error::ConfigError;
use crate::config::GeneralConfig;

/// Paths derived from a trial's output directory. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialPaths {
    output_dir: PathBuf,
    target_program: PathBuf,
    signature_file: PathBuf,
}

impl TrialPaths {
    /// Derives the trial paths from `output_dir`.
    ///
    /// # Arguments
    ///
    /// * `output_dir` - The trial's working directory. Must be non-empty.
    ///
    /// # Returns
    ///
    /// The derived paths, or `ConfigError::EmptyOutputDir`.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let output_dir = output_dir.as_ref();
        if output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            target_program: output_dir.join(TARGET_PROGRAM_NAME),
            signature_file: output_dir.join(SIGNATURE_FILE_NAME),
        })
    }

    /// Derives the trial paths from a host argument list containing `+output=<dir>`.
    ///
    /// The last `+output=` argument wins. A missing or empty value is a
    /// configuration error.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let output = args
            .into_iter()
            .filter_map(|arg| arg.as_ref().strip_prefix(OUTPUT_PLUSARG).map(str::to_owned))
            .last()
            .ok_or(ConfigError::EmptyOutputDir)?;
        Self::new(output)
    }

    /// Derives the trial paths from an explicit directory, falling back to
    /// `general.output_dir`.
    ///
    /// # Returns
    ///
    /// The derived paths, or `ConfigError::EmptyOutputDir` when neither source
    /// names a directory.
    pub fn resolve(explicit: Option<&Path>, general: &GeneralConfig) -> Result<Self, ConfigError> {
        explicit
            .or(general.output_dir.as_deref())
            .ok_or(ConfigError::EmptyOutputDir)
            .and_then(Self::new)
    }

    /// The trial's output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output_dir>/.input_0.elf`, the program image both simulators run.
    pub fn target_program(&self) -> &Path {
        &self.target_program
    }

    /// `<output_dir>/.rtl_sig_0.txt`, the signature dump written by the RTL side.
    pub fn signature_file(&self) -> &Path {
        &self.signature_file
    }
}
