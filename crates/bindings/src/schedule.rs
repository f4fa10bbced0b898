//! Interrupt schedule Python binding.
//!
//! The mutator builds schedules from per-instruction slots relative to `_fuzz_main`
//! and writes them in the text form the reference side loads.

use cosim_core::interrupt::{InterruptAssertion, InterruptSchedule};
use pyo3::prelude::*;

use crate::conversion::schedule_error;

/// Python-exposed immutable PC to interrupt-bits schedule.
#[pyclass(name = "InterruptSchedule", frozen)]
#[derive(Debug)]
pub struct PyInterruptSchedule {
    inner: InterruptSchedule,
}

#[pymethods]
impl PyInterruptSchedule {
    /// Builds a schedule from `(pc, bits)` pairs. Empty if omitted.
    #[new]
    #[pyo3(signature = (entries=None))]
    fn new(entries: Option<Vec<(u64, u8)>>) -> PyResult<Self> {
        let mut parsed = Vec::new();
        for (pc, bits) in entries.unwrap_or_default() {
            parsed.push((pc, InterruptAssertion::new(bits).map_err(schedule_error)?));
        }
        let inner = InterruptSchedule::from_entries(parsed).map_err(schedule_error)?;
        Ok(Self { inner })
    }

    /// Parses the text form (`<pc hex>:<bits binary>` per line).
    #[staticmethod]
    fn parse(text: &str) -> PyResult<Self> {
        let inner = InterruptSchedule::parse(text).map_err(schedule_error)?;
        Ok(Self { inner })
    }

    /// Reads and parses a schedule file.
    #[staticmethod]
    fn load(path: &str) -> PyResult<Self> {
        let inner = InterruptSchedule::load(path).map_err(schedule_error)?;
        Ok(Self { inner })
    }

    /// Places slot `i` at `base + 4 * i`, skipping zero slots.
    #[staticmethod]
    fn from_slots(base: u64, slots: Vec<u8>) -> PyResult<Self> {
        let inner = InterruptSchedule::from_slots(base, &slots).map_err(schedule_error)?;
        Ok(Self { inner })
    }

    /// Returns the text form.
    fn to_text(&self) -> String {
        self.inner.to_string()
    }

    /// Returns the bits scheduled at `pc`, or `None`.
    fn get(&self, pc: u64) -> Option<u8> {
        self.inner.get(pc).map(|assertion| assertion.bits())
    }

    /// Returns `(pc, bits)` pairs in ascending PC order.
    fn entries(&self) -> Vec<(u64, u8)> {
        self.inner
            .iter()
            .map(|(pc, assertion)| (pc, assertion.bits()))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, pc: u64) -> bool {
        self.inner.get(pc).is_some()
    }

    fn __repr__(&self) -> String {
        format!("InterruptSchedule(len={})", self.inner.len())
    }
}
