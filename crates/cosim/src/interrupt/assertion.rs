//! Interrupt assertion field.
//!
//! A schedule entry carries four bits, each naming one pending bit to raise:
//!
//! | bit | source                        | `mip` bit |
//! |-----|-------------------------------|-----------|
//! | 0   | machine timer                 | `MTIP`    |
//! | 1   | machine software              | `MSIP`    |
//! | 2   | machine external              | `MEIP`    |
//! | 3   | supervisor external           | `SEIP`    |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::constants::ASSERTION_BITS;
use crate::common::error::ScheduleError;
use crate::hart::csr;

/// A validated four-bit interrupt assertion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct InterruptAssertion(u8);

impl InterruptAssertion {
    /// Assert machine-timer-pending.
    pub const MACHINE_TIMER: Self = Self(0b0001);
    /// Assert machine-software-pending.
    pub const MACHINE_SOFTWARE: Self = Self(0b0010);
    /// Assert machine-external-pending.
    pub const MACHINE_EXTERNAL: Self = Self(0b0100);
    /// Assert supervisor-external-pending.
    pub const SUPERVISOR_EXTERNAL: Self = Self(0b1000);

    const FIELD_MASK: u8 = (1 << ASSERTION_BITS) - 1;

    /// Validates a raw field value.
    ///
    /// # Returns
    ///
    /// The assertion, or `ScheduleError::ValueTooWide` if any bit above bit 3 is set.
    pub fn new(bits: u8) -> Result<Self, ScheduleError> {
        if bits & !Self::FIELD_MASK != 0 {
            return Err(ScheduleError::ValueTooWide {
                value: u64::from(bits),
            });
        }
        Ok(Self(bits))
    }

    /// Raw field value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether no bit is asserted.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is also set here.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The `mip` bits this assertion raises.
    pub const fn mip_mask(self) -> u64 {
        let mut mask = 0;
        if self.contains(Self::MACHINE_TIMER) {
            mask |= csr::MIP_MTIP;
        }
        if self.contains(Self::MACHINE_SOFTWARE) {
            mask |= csr::MIP_MSIP;
        }
        if self.contains(Self::MACHINE_EXTERNAL) {
            mask |= csr::MIP_MEIP;
        }
        if self.contains(Self::SUPERVISOR_EXTERNAL) {
            mask |= csr::MIP_SEIP;
        }
        mask
    }
}

impl TryFrom<u8> for InterruptAssertion {
    type Error = ScheduleError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<InterruptAssertion> for u8 {
    fn from(assertion: InterruptAssertion) -> Self {
        assertion.0
    }
}

impl fmt::Display for InterruptAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}
