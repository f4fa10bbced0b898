//! Lock-step co-simulation plumbing for processor fuzzing.
//!
//! This crate couples a hardware-backed RTL simulator with an ISA reference simulator
//! so both execute the same test program in lock-step. It provides:
//! 1. **Sync:** A collision-free semaphore pair and the strict two-party handoff.
//! 2. **Interrupts:** PC-indexed interrupt schedules replayed on the reference hart.
//! 3. **Bridge:** Reset, enable, and read control of the hardware coverage accumulator.
//! 4. **Fuzz:** The per-trial reset, reload, run, collect, persist loop.
//! 5. **Support:** Configuration, ELF image loading, and a minimal reference hart model.

/// Common constants and error types.
pub mod common;
/// Configuration (defaults, hierarchical structures, validation).
pub mod config;
/// Cross-process handoff (semaphore capability, backends, coordinator, paths).
pub mod sync;
/// Interrupt assertions, schedules, and the injector.
pub mod interrupt;
/// Coverage bridge transport, driver, and software model.
pub mod bridge;
/// Trial state machine and driver.
pub mod fuzz;
/// Reference hart interrupt model (CSR fields, privilege modes, trap entry).
pub mod hart;
/// ELF program image loading.
pub mod image;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Coverage accumulator driver; construct over any `BridgeMmio`.
pub use crate::bridge::{BridgeMmio, CoverageBridge, SoftBridge};
/// Trial loop types.
pub use crate::fuzz::{Harness, RunOutcome, TrialDriver, TrialResult, TrialState};
/// Minimal reference hart.
pub use crate::hart::ReferenceHart;
/// Parsed ELF image.
pub use crate::image::ProgramImage;
/// Interrupt injection types.
pub use crate::interrupt::{InterruptAssertion, InterruptInjector, InterruptSchedule, InterruptTarget};
/// Handoff types; `SyncCoordinator::new(output_dir)` is the usual entry point.
pub use crate::sync::{Role, SyncCoordinator, SyncKey, TrialPaths};
