//! Python bindings for the co-simulation plumbing.
//!
//! The mutator and the ISA reference side are driven from Python. This crate exposes
//! the pieces they need via PyO3. It provides:
//! 1. **Scheduler:** `Scheduler`, the handoff coordinator for either side of a trial.
//! 2. **Schedules:** `InterruptSchedule` for building, parsing, and writing schedules.
//! 3. **Utilities:** Trial path derivation and the version string.

use pyo3::prelude::*;

/// Python dict to Rust `Config` conversion and error mapping.
pub mod conversion;
/// Interrupt schedule binding (`PyInterruptSchedule`).
pub mod schedule;
/// Handoff coordinator binding (`PyScheduler`).
pub mod scheduler;
/// Utility functions (version, trial paths).
pub mod utils;

/// Registers all classes and functions onto the given Python module.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_cosim_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<scheduler::PyScheduler>()?;
    m.add_class::<schedule::PyInterruptSchedule>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::trial_paths, m)?)?;

    Ok(())
}

#[pymodule]
fn difuzz_cosim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    utils::init_logging();
    register_cosim_module(m)
}
