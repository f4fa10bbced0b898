//! Utility functions exposed to Python.

use cosim_core::sync::TrialPaths;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::conversion::config_error;

/// Installs a stderr `tracing` subscriber honoring `RUST_LOG`. Later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the package version string.
#[pyfunction]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Derives the program image and signature file paths of a trial.
///
/// # Arguments
///
/// * `output` - The trial's output directory.
///
/// # Returns
///
/// `(target_program, signature_file)`, or `ValueError` for an empty directory.
#[pyfunction]
pub fn trial_paths(output: &str) -> PyResult<(String, String)> {
    let paths = TrialPaths::new(output).map_err(config_error)?;
    Ok((
        paths.target_program().display().to_string(),
        paths.signature_file().display().to_string(),
    ))
}
