//! Software model of the coverage bridge register block.
//!
//! # Registers
//!
//! Offsets come from `BridgeRegisterMap`:
//!
//! * `cov_init`: Accumulator enable (read/write). Non-zero enables accumulation.
//! * `bridge_reset`: Domain reset line (read/write). While high the accumulator is held at zero.
//! * `meta_reset`: Meta-state reset line (read/write). While high the meta counter is held at zero.
//! * `cov_sum`: Accumulator value (read only).

use tracing::warn;

use super::BridgeMmio;
use crate::config::BridgeRegisterMap;

/// In-memory coverage bridge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoftBridge {
    registers: BridgeRegisterMap,
    enable: u32,
    bridge_reset: bool,
    meta_reset: bool,
    covsum: u32,
    meta: u32,
}

impl SoftBridge {
    /// Creates a disabled bridge with both reset lines low and a zero accumulator.
    pub fn new(registers: BridgeRegisterMap) -> Self {
        Self {
            registers,
            ..Self::default()
        }
    }

    /// Adds `points` of coverage, as the design would while running.
    ///
    /// Ignored unless accumulation is enabled and the domain reset line is low. The
    /// accumulator saturates instead of wrapping.
    pub const fn record(&mut self, points: u32) {
        if self.enable == 0 || self.bridge_reset {
            return;
        }
        self.covsum = self.covsum.saturating_add(points);
        if !self.meta_reset {
            self.meta = self.meta.saturating_add(1);
        }
    }

    /// Current accumulator value.
    pub const fn covsum(&self) -> u32 {
        self.covsum
    }

    /// Number of coverage events since the last meta reset.
    pub const fn meta_state(&self) -> u32 {
        self.meta
    }

    /// Whether accumulation is enabled.
    pub const fn enabled(&self) -> bool {
        self.enable != 0
    }

    /// Whether the domain reset line is high.
    pub const fn in_reset(&self) -> bool {
        self.bridge_reset
    }
}

impl BridgeMmio for SoftBridge {
    fn read(&mut self, addr: u64) -> u32 {
        let regs = self.registers;
        if addr == regs.cov_sum {
            self.covsum
        } else if addr == regs.cov_init {
            self.enable
        } else if addr == regs.bridge_reset {
            u32::from(self.bridge_reset)
        } else if addr == regs.meta_reset {
            u32::from(self.meta_reset)
        } else {
            warn!(addr = format_args!("{addr:#x}"), "read from unmapped bridge register");
            0
        }
    }

    fn write(&mut self, addr: u64, value: u32) {
        let regs = self.registers;
        if addr == regs.cov_init {
            self.enable = value;
        } else if addr == regs.bridge_reset {
            self.bridge_reset = value != 0;
            if self.bridge_reset {
                self.covsum = 0;
            }
        } else if addr == regs.meta_reset {
            self.meta_reset = value != 0;
            if self.meta_reset {
                self.meta = 0;
            }
        } else if addr == regs.cov_sum {
            warn!(value, "write to read-only coverage sum ignored");
        } else {
            warn!(addr = format_args!("{addr:#x}"), value, "write to unmapped bridge register");
        }
    }
}
