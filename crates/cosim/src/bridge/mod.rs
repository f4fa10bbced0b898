//! Coverage bridge control.
//!
//! The hardware coverage accumulator lives behind a small register block on the
//! simulation host's MMIO transport. This module provides:
//! 1. **Transport:** The `BridgeMmio` trait, implemented by the host's bridge driver.
//! 2. **Control:** `CoverageBridge`, the reset/enable/read operations of one trial.
//! 3. **Model:** `SoftBridge`, an in-memory register block for lock-step runs and tests.
//!
//! Register accesses are synchronous and unpipelined. The bridge is owned by the
//! single thread driving the trial loop.

/// In-memory bridge model.
pub mod soft;

pub use soft::SoftBridge;

use tracing::{debug, trace};

use crate::config::BridgeRegisterMap;

/// Register transport to the coverage bridge.
///
/// Addresses are offsets into the bridge's register block.
pub trait BridgeMmio {
    /// Reads a 32-bit register.
    fn read(&mut self, addr: u64) -> u32;

    /// Writes a 32-bit register.
    fn write(&mut self, addr: u64, value: u32);
}

impl<T: BridgeMmio + ?Sized> BridgeMmio for &mut T {
    fn read(&mut self, addr: u64) -> u32 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u64, value: u32) {
        (**self).write(addr, value);
    }
}

impl<T: BridgeMmio + ?Sized> BridgeMmio for Box<T> {
    fn read(&mut self, addr: u64) -> u32 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u64, value: u32) {
        (**self).write(addr, value);
    }
}

/// Driver for the coverage accumulator's control registers.
#[derive(Debug)]
pub struct CoverageBridge<M> {
    mmio: M,
    registers: BridgeRegisterMap,
    last_covsum: Option<u32>,
}

impl<M: BridgeMmio> CoverageBridge<M> {
    /// Creates a bridge driver over `mmio` using the register offsets in `registers`.
    pub const fn new(mmio: M, registers: BridgeRegisterMap) -> Self {
        Self {
            mmio,
            registers,
            last_covsum: None,
        }
    }

    /// Writes the accumulator enable register. Zero disables accumulation.
    pub fn cov_init(&mut self, value: u32) {
        debug!(value, "coverage enable");
        self.mmio.write(self.registers.cov_init, value);
    }

    /// Drives the design-under-test domain reset line.
    ///
    /// Holding the line high re-arms the design and clears the accumulator without
    /// resetting the whole simulation.
    pub fn bridge_reset(&mut self, on: bool) {
        debug!(on, "bridge reset");
        self.mmio.write(self.registers.bridge_reset, u32::from(on));
    }

    /// Drives the meta-state reset line.
    pub fn meta_reset(&mut self, on: bool) {
        debug!(on, "meta reset");
        self.mmio.write(self.registers.meta_reset, u32::from(on));
    }

    /// Reads the accumulator.
    ///
    /// The read does not reset the accumulator; the value is non-decreasing until the
    /// next `bridge_reset`.
    pub fn read_covsum(&mut self) -> u32 {
        let covsum = self.mmio.read(self.registers.cov_sum);
        debug!(covsum, "coverage read");
        self.last_covsum = Some(covsum);
        covsum
    }

    /// The value returned by the most recent `read_covsum`, if any.
    pub const fn last_covsum(&self) -> Option<u32> {
        self.last_covsum
    }

    /// Per-cycle hook. Coverage is polled, so there is nothing to do.
    #[inline]
    pub fn tick(&mut self) {
        trace!("bridge tick");
    }

    /// Register offsets in use.
    pub const fn registers(&self) -> &BridgeRegisterMap {
        &self.registers
    }

    /// The underlying transport.
    pub const fn mmio(&self) -> &M {
        &self.mmio
    }

    /// Mutable access to the underlying transport.
    pub const fn mmio_mut(&mut self) -> &mut M {
        &mut self.mmio
    }

    /// Releases the transport.
    pub fn into_inner(self) -> M {
        self.mmio
    }
}
