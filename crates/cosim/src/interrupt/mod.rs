//! PC-indexed interrupt injection.
//!
//! The reference simulator has no hardware interrupt sources of its own. To keep its
//! architectural state comparable with the RTL model, interrupts observed on the
//! hardware side are replayed at the same program counter. This module provides:
//! 1. **Assertions:** The 4-bit `InterruptAssertion` field and its `mip` mapping.
//! 2. **Schedules:** The immutable PC to assertion map and its text format.
//! 3. **Injection:** `InterruptInjector`, which OR-merges assertions into a processor's
//!    pending register and requests interrupt evaluation.

/// The four-bit assertion field.
pub mod assertion;

/// The `InterruptInjector` and its processor seam.
pub mod injector;

/// The PC to assertion schedule.
pub mod schedule;

pub use assertion::InterruptAssertion;
pub use injector::{InterruptInjector, InterruptTarget};
pub use schedule::InterruptSchedule;
