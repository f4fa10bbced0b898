//! Handoff coordinator Python binding.
//!
//! The reference simulator attaches to the pair the RTL host announced and calls
//! `yield_control` at each handoff point. Blocking calls release the GIL.

use cosim_core::config::Config;
use cosim_core::sync::{Role, SyncCoordinator, SyncKey, SysV, TrialPaths};
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::conversion::{config_error, py_dict_to_config, sync_error};

/// Python-exposed coordinator over a System V semaphore pair.
#[pyclass(name = "Scheduler")]
#[derive(Debug)]
pub struct PyScheduler {
    inner: Option<SyncCoordinator<SysV>>,
}

impl PyScheduler {
    fn coordinator(&self) -> PyResult<&SyncCoordinator<SysV>> {
        self.inner
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("Scheduler has already been closed"))
    }
}

#[pymethods]
impl PyScheduler {
    /// Attaches to an existing pair as the reference side.
    ///
    /// # Arguments
    ///
    /// * `key` - Base key announced by the RTL host.
    /// * `output` - The trial's output directory.
    #[new]
    fn new(key: i32, output: &str) -> PyResult<Self> {
        let paths = TrialPaths::new(output).map_err(config_error)?;
        let inner = SyncCoordinator::attach(&SysV, SyncKey(key), Role::Reference, paths)
            .map_err(sync_error)?;
        Ok(Self { inner: Some(inner) })
    }

    /// Creates a new pair as the RTL side. The returned scheduler owns the pair.
    ///
    /// # Arguments
    ///
    /// * `output` - The trial's output directory.
    /// * `config` - Optional config dict; only the `sync` section is used.
    #[staticmethod]
    #[pyo3(signature = (output, config=None))]
    fn create(py: Python<'_>, output: &str, config: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => py_dict_to_config(py, dict)?,
            None => Config::default(),
        };
        let paths = TrialPaths::new(output).map_err(config_error)?;
        let inner = SyncCoordinator::create(&SysV, paths, &config.sync).map_err(sync_error)?;
        Ok(Self { inner: Some(inner) })
    }

    /// Signals the peer, then blocks until the peer yields back.
    fn yield_control(&self, py: Python<'_>) -> PyResult<()> {
        let coordinator = self.coordinator()?;
        py.allow_threads(|| coordinator.yield_control())
            .map_err(sync_error)
    }

    /// Blocks until the peer yields, without signaling first.
    fn wait_turn(&self, py: Python<'_>) -> PyResult<()> {
        let coordinator = self.coordinator()?;
        py.allow_threads(|| coordinator.wait_turn())
            .map_err(sync_error)
    }

    /// Wakes the peer without blocking.
    fn release(&self) -> PyResult<()> {
        self.coordinator()?.release().map_err(sync_error)
    }

    /// Base key of the pair.
    #[getter]
    fn key(&self) -> PyResult<i32> {
        Ok(self.coordinator()?.key().raw())
    }

    /// Whether this scheduler created the pair and will remove it.
    #[getter]
    fn is_owner(&self) -> PyResult<bool> {
        Ok(self.coordinator()?.is_owner())
    }

    /// `<output>/.input_0.elf`.
    fn get_target_program_path(&self) -> PyResult<String> {
        Ok(self
            .coordinator()?
            .target_program_path()
            .display()
            .to_string())
    }

    /// `<output>/.rtl_sig_0.txt`.
    fn get_signature_file_path(&self) -> PyResult<String> {
        Ok(self
            .coordinator()?
            .signature_file_path()
            .display()
            .to_string())
    }

    /// Removes the pair if owned. Further calls fail with `RuntimeError`.
    fn close(&mut self) -> PyResult<()> {
        match self.inner.take() {
            Some(coordinator) => coordinator.close().map_err(sync_error),
            None => Ok(()),
        }
    }

    fn __repr__(&self) -> String {
        match &self.inner {
            Some(c) => format!(
                "Scheduler(key={}, role={}, owner={})",
                c.key(),
                c.role(),
                c.is_owner()
            ),
            None => "Scheduler(closed)".to_owned(),
        }
    }
}
