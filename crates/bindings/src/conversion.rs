//! Python to Rust conversion.
//!
//! Converts Python dicts into the core `Config` via JSON, so the same schema is used
//! from Python and from configuration files, and maps core errors onto Python
//! exception types.

use cosim_core::common::error::{ConfigError, ScheduleError, SyncError};
use cosim_core::config::Config;
use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Converts a Python dict to a validated `Config`.
///
/// # Arguments
///
/// * `py` - Python interpreter handle.
/// * `dict` - A dict shaped like the JSON config (`general`, `sync`, `bridge`, `fuzz`).
///
/// # Returns
///
/// The `Config`, or a `ValueError` if the dict is invalid.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<Config> {
    let json = py.import("json")?;
    let json_str: String = json.getattr("dumps")?.call1((dict,))?.extract()?;
    Config::from_json(&json_str).map_err(config_error)
}

/// Maps a configuration error to `ValueError`.
pub fn config_error(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Maps a schedule error to `OSError` for I/O failures and `ValueError` otherwise.
pub fn schedule_error(err: ScheduleError) -> PyErr {
    match err {
        ScheduleError::Io { .. } => PyOSError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Maps a coordinator error to `ValueError` for configuration problems and
/// `RuntimeError` otherwise.
pub fn sync_error(err: SyncError) -> PyErr {
    match err {
        SyncError::Config(inner) => config_error(inner),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}
